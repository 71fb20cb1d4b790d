//! Connecting to a cluster and reading the objects an export needs.

use std::path::Path;

use k8s_openapi::api::core::v1::{Secret, ServiceAccount};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config,
};
use tracing::debug;

use crate::{Error, Result};

/// The address clients should use to reach the cluster's API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEndpoint {
    pub server_url: String,
}

/// Read access to the two object kinds the pipeline looks at.
///
/// Both lookups return `Ok(None)` when the object does not exist, so the
/// caller decides how a missing object is reported.
#[allow(async_fn_in_trait)]
pub trait ClusterReader {
    async fn service_account(&self, namespace: &str, name: &str)
        -> Result<Option<ServiceAccount>>;

    async fn secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;
}

/// A [`ClusterReader`] backed by a live API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ClusterReader for KubeCluster {
    async fn service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ServiceAccount>> {
        let api: Api<ServiceAccount> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }
}

/// Build a client from the kubeconfig at `kubeconfig_path`.
///
/// `context` overrides the file's `current-context`. The returned endpoint is
/// the `server` of the selected cluster entry, verbatim.
pub async fn connect(
    kubeconfig_path: &Path,
    context: Option<&str>,
) -> Result<(KubeCluster, ClusterEndpoint)> {
    let kubeconfig = Kubeconfig::read_from(kubeconfig_path).map_err(|err| {
        Error::configuration_caused_by(
            format!("reading kubeconfig {}", kubeconfig_path.display()),
            err,
        )
    })?;
    let server_url = server_url(&kubeconfig, context)?;

    let options = KubeConfigOptions {
        context: context.map(str::to_owned),
        ..Default::default()
    };
    let config = Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|err| Error::configuration_caused_by("loading cluster configuration", err))?;
    let client = Client::try_from(config)
        .map_err(|err| Error::configuration_caused_by("creating cluster client", err))?;

    debug!(server = %server_url, "connected to cluster");
    Ok((KubeCluster::new(client), ClusterEndpoint { server_url }))
}

/// Find the `server` of the cluster the chosen context points at.
pub fn server_url(kubeconfig: &Kubeconfig, context: Option<&str>) -> Result<String> {
    let context_name = context
        .or(kubeconfig.current_context.as_deref())
        .ok_or_else(|| Error::configuration("kubeconfig has no current-context"))?;

    let cluster_name = kubeconfig
        .contexts
        .iter()
        .find(|named| named.name == context_name)
        .and_then(|named| named.context.as_ref())
        .map(|ctx| ctx.cluster.as_str())
        .ok_or_else(|| Error::configuration(format!("context {context_name} not found")))?;

    kubeconfig
        .clusters
        .iter()
        .find(|named| named.name == cluster_name)
        .and_then(|named| named.cluster.as_ref())
        .and_then(|cluster| cluster.server.clone())
        .ok_or_else(|| {
            Error::configuration(format!("cluster {cluster_name} has no server address"))
        })
}
