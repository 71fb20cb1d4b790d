use tracing::{debug, instrument};

use crate::{cluster::ClusterReader, error::ObjectKind, resolve::SecretRef, Error, Result};

/// Secret key holding the cluster CA bundle.
pub const CA_CERT_KEY: &str = "ca.crt";

/// Secret key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// The raw credential bytes read from a service account secret.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialMaterial {
    pub ca_certificate: Vec<u8>,
    pub bearer_token: Vec<u8>,
}

// Keep credentials out of logs and panic messages.
impl std::fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialMaterial")
            .field("ca_certificate", &format_args!("{} bytes", self.ca_certificate.len()))
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Fetch the secret and pull out `ca.crt` and `token`. Both must be present.
#[instrument(skip_all, fields(namespace = %secret_ref.namespace, name = %secret_ref.name))]
pub async fn extract<C: ClusterReader>(
    cluster: &C,
    secret_ref: &SecretRef,
) -> Result<CredentialMaterial> {
    let secret = cluster
        .secret(&secret_ref.namespace, &secret_ref.name)
        .await?
        .ok_or_else(|| Error::NotFound {
            kind: ObjectKind::Secret,
            namespace: secret_ref.namespace.clone(),
            name: secret_ref.name.clone(),
        })?;

    let mut data = secret.data.unwrap_or_default();
    let mut take = |key: &'static str| {
        data.remove(key)
            .map(|value| value.0)
            .ok_or_else(|| Error::MissingField {
                namespace: secret_ref.namespace.clone(),
                name: secret_ref.name.clone(),
                key,
            })
    };
    let ca_certificate = take(CA_CERT_KEY)?;
    let bearer_token = take(TOKEN_KEY)?;

    debug!(ca_bytes = ca_certificate.len(), "extracted service account credentials");
    Ok(CredentialMaterial {
        ca_certificate,
        bearer_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::testing::FakeCluster;

    fn secret_ref() -> SecretRef {
        SecretRef {
            namespace: "default".to_owned(),
            name: "deployer-token-abc".to_owned(),
        }
    }

    #[tokio::test]
    async fn reads_both_fields_unmodified() {
        let cluster = FakeCluster::default().with_secret(
            "default",
            "deployer-token-abc",
            &[
                ("ca.crt", "MIIB..."),
                ("token", "eyJhbGc..."),
                ("namespace", "default"),
            ],
        );

        let material = extract(&cluster, &secret_ref()).await.unwrap();
        assert_eq!(material.ca_certificate, b"MIIB...");
        assert_eq!(material.bearer_token, b"eyJhbGc...");
    }

    #[tokio::test]
    async fn missing_secret_is_not_found() {
        let cluster = FakeCluster::default();

        let err = extract(&cluster, &secret_ref()).await.unwrap_err();
        assert!(
            matches!(
                err,
                Error::NotFound {
                    kind: ObjectKind::Secret,
                    ..
                }
            ),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn missing_token_fails() {
        let cluster = FakeCluster::default().with_secret(
            "default",
            "deployer-token-abc",
            &[("ca.crt", "MIIB...")],
        );

        let err = extract(&cluster, &secret_ref()).await.unwrap_err();
        assert!(matches!(err, Error::MissingField { key: "token", .. }), "{err:?}");
    }

    #[tokio::test]
    async fn missing_ca_fails() {
        let cluster = FakeCluster::default().with_secret(
            "default",
            "deployer-token-abc",
            &[("token", "eyJhbGc...")],
        );

        let err = extract(&cluster, &secret_ref()).await.unwrap_err();
        assert!(matches!(err, Error::MissingField { key: "ca.crt", .. }), "{err:?}");
    }

    #[tokio::test]
    async fn secret_without_data_fails() {
        let mut cluster = FakeCluster::default().with_secret("default", "deployer-token-abc", &[]);
        for secret in cluster.secrets.values_mut() {
            secret.data = None;
        }

        let err = extract(&cluster, &secret_ref()).await.unwrap_err();
        assert!(matches!(err, Error::MissingField { key: "ca.crt", .. }), "{err:?}");
    }

    #[test]
    fn debug_output_hides_token() {
        let material = CredentialMaterial {
            ca_certificate: b"MIIB".to_vec(),
            bearer_token: b"very-secret".to_vec(),
        };
        let rendered = format!("{material:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("4 bytes"));
    }
}
