use std::{fmt, fs, io, path::PathBuf};

use tracing::debug;

use crate::{kubeconfig::KubeConfig, Error, Result};

/// Where the exported document goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Destination::Stdout, Destination::File)
    }

    /// Write `config` out. The file is only created here, after the document
    /// exists, and is closed again before returning.
    pub fn write(&self, config: &KubeConfig) -> Result<()> {
        match self {
            Destination::Stdout => config.write_to(io::stdout().lock()),
            Destination::File(path) => {
                let file = fs::File::create(path).map_err(Error::Write)?;
                let mut out = io::BufWriter::new(file);
                config.write_to(&mut out)?;
                out.into_inner()
                    .map_err(|err| Error::Write(err.into_error()))?
                    .sync_all()
                    .map_err(Error::Write)?;
                debug!(path = %path.display(), "wrote kubeconfig");
                Ok(())
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("standard output"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}
