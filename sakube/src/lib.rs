//! Turn a Kubernetes service account into a standalone kubeconfig.
//!
//! The pipeline is [`resolve`](resolve::resolve) → [`extract`](extract::extract)
//! → [`KubeConfig::new`](kubeconfig::KubeConfig::new), tied together by
//! [`export`]. [`cluster::connect`] provides the live cluster reader and
//! [`output::Destination`] writes the result.

pub mod cluster;
pub mod error;
pub mod extract;
pub mod kubeconfig;
pub mod output;
pub mod pipeline;
pub mod resolve;

use std::path::{Path, PathBuf};

pub use cluster::{connect, ClusterEndpoint, ClusterReader, KubeCluster};
pub use error::{Error, Result};
pub use extract::CredentialMaterial;
pub use kubeconfig::KubeConfig;
pub use output::Destination;
pub use pipeline::export;
pub use resolve::{SecretRef, ServiceAccountRef};

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "default";

/// `$HOME/.kube`, if `HOME` is set.
pub fn kube_dir() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").filter(|home| !home.is_empty())?;
    Some(Path::new(&home).join(".kube"))
}

/// The kubeconfig `kubectl` reads by default.
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    kube_dir()
        .map(|dir| dir.join("config"))
        .ok_or_else(|| Error::configuration("HOME is not set; pass --kubeconfig explicitly"))
}
