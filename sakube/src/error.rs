use std::{fmt, io};

/// Boxed cause attached to configuration failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Kinds of cluster object the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    ServiceAccount,
    Secret,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::ServiceAccount => f.write_str("service account"),
            ObjectKind::Secret => f.write_str("secret"),
        }
    }
}

/// Everything that can stop an export. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: ObjectKind,
        namespace: String,
        name: String,
    },

    #[error("service account {namespace}/{name} has no associated secrets")]
    EmptySecretList { namespace: String, name: String },

    #[error("secret {namespace}/{name} has no `{key}` entry")]
    MissingField {
        namespace: String,
        name: String,
        key: &'static str,
    },

    #[error("rendering kubeconfig: {reason}")]
    Render {
        reason: &'static str,
        #[source]
        source: Option<BoxError>,
    },

    #[error("writing kubeconfig")]
    Write(#[source] io::Error),

    #[error("cluster request failed")]
    Cluster(#[from] kube::Error),
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn configuration_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
