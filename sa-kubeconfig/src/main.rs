use std::path::PathBuf;

use anyhow::Context as _;
use clap::{builder::NonEmptyStringValueParser, Parser};
use sakube::{
    connect, default_kubeconfig_path, export, Destination, ServiceAccountRef, DEFAULT_NAMESPACE,
};
use tracing_subscriber::{fmt::Subscriber, prelude::*, EnvFilter};

/// Export a service account's credentials as a standalone kubeconfig.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Opt {
    /// Path to the kubeconfig used to reach the cluster [default: ~/.kube/config]
    #[clap(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of its current-context
    #[clap(long)]
    context: Option<String>,

    /// Service account name
    #[clap(long, value_parser = NonEmptyStringValueParser::new())]
    name: String,

    /// Namespace of the service account
    #[clap(
        long,
        short = 'n',
        default_value = DEFAULT_NAMESPACE,
        value_parser = NonEmptyStringValueParser::new()
    )]
    namespace: String,

    /// Write to this file instead of stdout
    #[clap(long, short = 'o', value_name = "PATH")]
    out: Option<PathBuf>,
}

/// Log to stderr so stdout stays clean for the kubeconfig itself.
fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .finish()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    initialize_tracing();

    let account = ServiceAccountRef::new(opt.namespace, opt.name)?;
    let kubeconfig = match opt.kubeconfig {
        Some(path) => path,
        None => default_kubeconfig_path()?,
    };

    let (cluster, endpoint) = connect(&kubeconfig, opt.context.as_deref())
        .await
        .with_context(|| format!("connecting with {}", kubeconfig.display()))?;

    let config = export(&cluster, &endpoint, &account)
        .await
        .with_context(|| format!("exporting {}/{}", account.namespace, account.name))?;

    let destination = Destination::from_path(opt.out);
    destination
        .write(&config)
        .with_context(|| format!("writing kubeconfig to {destination}"))?;

    Ok(())
}
