use tracing::{debug, instrument};

use crate::{cluster::ClusterReader, error::ObjectKind, Error, Result};

/// The service account being exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountRef {
    pub namespace: String,
    pub name: String,
}

impl ServiceAccountRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let name = name.into();
        if name.is_empty() {
            return Err(Error::configuration("service account name must not be empty"));
        }
        if namespace.is_empty() {
            return Err(Error::configuration("namespace must not be empty"));
        }
        Ok(Self { namespace, name })
    }
}

/// The secret holding a service account's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub namespace: String,
    pub name: String,
}

/// Look up `account` and pick the first secret it lists.
#[instrument(skip_all, fields(namespace = %account.namespace, name = %account.name))]
pub async fn resolve<C: ClusterReader>(
    cluster: &C,
    account: &ServiceAccountRef,
) -> Result<SecretRef> {
    let service_account = cluster
        .service_account(&account.namespace, &account.name)
        .await?
        .ok_or_else(|| Error::NotFound {
            kind: ObjectKind::ServiceAccount,
            namespace: account.namespace.clone(),
            name: account.name.clone(),
        })?;

    // Only the first listed secret is considered, whatever its type.
    let secret_name = service_account
        .secrets
        .as_deref()
        .and_then(|secrets| secrets.first())
        .and_then(|secret| secret.name.clone())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::EmptySecretList {
            namespace: account.namespace.clone(),
            name: account.name.clone(),
        })?;

    debug!(secret = %secret_name, "resolved service account secret");
    Ok(SecretRef {
        namespace: account.namespace.clone(),
        name: secret_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::testing::FakeCluster;

    fn deployer() -> ServiceAccountRef {
        ServiceAccountRef::new("default", "deployer").unwrap()
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = ServiceAccountRef::new("default", "").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let err = ServiceAccountRef::new("", "deployer").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn picks_first_listed_secret() {
        let cluster = FakeCluster::default().with_service_account(
            "default",
            "deployer",
            &["deployer-token-abc", "deployer-dockercfg-xyz"],
        );

        let secret = resolve(&cluster, &deployer()).await.unwrap();
        assert_eq!(
            secret,
            SecretRef {
                namespace: "default".to_owned(),
                name: "deployer-token-abc".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let cluster = FakeCluster::default().with_service_account("other", "deployer", &["x"]);

        let err = resolve(&cluster, &deployer()).await.unwrap_err();
        assert!(
            matches!(
                err,
                Error::NotFound {
                    kind: ObjectKind::ServiceAccount,
                    ..
                }
            ),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn account_without_secrets_fails() {
        let cluster = FakeCluster::default().with_service_account("default", "deployer", &[]);

        let err = resolve(&cluster, &deployer()).await.unwrap_err();
        assert!(matches!(err, Error::EmptySecretList { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn account_with_no_secrets_field_fails() {
        let mut cluster = FakeCluster::default().with_service_account("default", "deployer", &[]);
        for account in cluster.service_accounts.values_mut() {
            account.secrets = None;
        }

        let err = resolve(&cluster, &deployer()).await.unwrap_err();
        assert!(matches!(err, Error::EmptySecretList { .. }), "{err:?}");
    }
}
