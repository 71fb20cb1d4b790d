//! The exported kubeconfig document.
//!
//! The layout is fixed: one cluster named `kubernetes`, one token user named
//! after the service account, and a single context tying the two together in
//! the account's namespace.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::*;

use crate::{extract::CredentialMaterial, resolve::ServiceAccountRef, Error, Result};

/// Name of the only cluster entry in an exported config.
pub const CLUSTER_NAME: &str = "kubernetes";

// region: Context
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContextSpec {
    pub cluster: String,
    pub namespace: String,
    pub user: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Context {
    pub name: String,
    pub context: ContextSpec,
}
// endregion

// region: Cluster
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClusterSpec {
    pub certificate_authority_data: String,
    pub server: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Cluster {
    pub name: String,
    pub cluster: ClusterSpec,
}
// endregion

// region: User
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserSpec {
    pub token: String,
}

impl std::fmt::Debug for UserSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSpec")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub name: String,
    pub user: UserSpec,
}
// endregion

// region: Common
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    #[serde(rename = "v1")]
    V1,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Config,
}

/// A complete, self-contained kubeconfig for one service account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct KubeConfig {
    #[serde(rename = "apiVersion")]
    pub api_version: ApiVersion,
    pub kind: Kind,
    pub clusters: Vec<Cluster>,
    pub contexts: Vec<Context>,
    pub users: Vec<User>,
    pub current_context: String,
}

impl KubeConfig {
    /// Assemble the document. The CA bundle is base64-encoded, the token is
    /// embedded as-is and therefore has to be UTF-8.
    pub fn new(
        material: &CredentialMaterial,
        server_url: &str,
        account: &ServiceAccountRef,
    ) -> Result<Self> {
        let token = std::str::from_utf8(&material.bearer_token).map_err(|err| Error::Render {
            reason: "bearer token is not valid UTF-8",
            source: Some(err.into()),
        })?;
        let context_name = format!("{}@{CLUSTER_NAME}", account.name);

        Ok(Self {
            api_version: ApiVersion::V1,
            kind: Kind::Config,
            clusters: vec![Cluster {
                name: CLUSTER_NAME.to_owned(),
                cluster: ClusterSpec {
                    certificate_authority_data: STANDARD.encode(&material.ca_certificate),
                    server: server_url.to_owned(),
                },
            }],
            contexts: vec![Context {
                name: context_name.clone(),
                context: ContextSpec {
                    cluster: CLUSTER_NAME.to_owned(),
                    namespace: account.namespace.clone(),
                    user: account.name.clone(),
                },
            }],
            users: vec![User {
                name: account.name.clone(),
                user: UserSpec {
                    token: token.to_owned(),
                },
            }],
            current_context: context_name,
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|err| Error::Render {
            reason: "serializing document",
            source: Some(err.into()),
        })
    }

    /// Serialize the whole document, then hand it to `out` in one write.
    pub fn write_to(&self, mut out: impl Write) -> Result<()> {
        let yaml = self.to_yaml()?;
        out.write_all(yaml.as_bytes()).map_err(Error::Write)?;
        out.flush().map_err(Error::Write)
    }
}
// endregion
