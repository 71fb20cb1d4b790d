use tracing::info;

use crate::{
    cluster::{ClusterEndpoint, ClusterReader},
    extract::extract,
    kubeconfig::KubeConfig,
    resolve::{resolve, ServiceAccountRef},
    Result,
};

/// Resolve `account` to its secret, read the credentials, and build the
/// kubeconfig. Nothing is written anywhere; the caller owns the output.
pub async fn export<C: ClusterReader>(
    cluster: &C,
    endpoint: &ClusterEndpoint,
    account: &ServiceAccountRef,
) -> Result<KubeConfig> {
    let secret_ref = resolve(cluster, account).await?;
    let material = extract(cluster, &secret_ref).await?;
    let config = KubeConfig::new(&material, &endpoint.server_url, account)?;

    info!(
        namespace = %account.namespace,
        service_account = %account.name,
        secret = %secret_ref.name,
        "built kubeconfig"
    );
    Ok(config)
}
