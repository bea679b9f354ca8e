//! Vault client: one-shot authentication and KV v2 reads.

use crate::auth;
use crate::cache::SecretFetcher;
use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::response::{self, Operation};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Client holding an immutable bearer token for its whole life.
///
/// Construction authenticates exactly once; re-authentication means
/// constructing a new client.
pub struct VaultClient {
    config: VaultConfig,
    transport: HttpTransport,
    token: SecretString,
}

impl VaultClient {
    /// Authenticate with the configured method and build a client around
    /// the obtained token.
    ///
    /// # Errors
    ///
    /// Fails when the transport cannot be built or the authentication
    /// strategy does not yield a token.
    pub async fn new(config: VaultConfig) -> VaultResult<Self> {
        let transport = HttpTransport::for_config(&config)?;
        let authenticator = auth::authenticator_for(config.auth_method);
        let token = authenticator.authenticate(&config, &transport).await?;
        info!(method = ?config.auth_method, "Authenticated with Vault");

        Ok(Self {
            config,
            transport,
            token: SecretString::from(token),
        })
    }

    /// Read the secret at `path` from the KV v2 engine.
    ///
    /// # Errors
    ///
    /// Fails when the server rejects the request or is unreachable; an
    /// undecodable body yields an empty map instead of an error.
    #[instrument(skip(self), fields(path))]
    pub async fn get_secret(&self, path: &str) -> VaultResult<HashMap<String, String>> {
        let url = format!(
            "{}/v1/secret/data/{}",
            self.config.address,
            clean_path(path)
        );

        let mut headers = vec![
            (
                "X-Vault-Token".to_string(),
                self.token.expose_secret().to_string(),
            ),
            ("X-Vault-Request".to_string(), "true".to_string()),
        ];
        if let Some(namespace) = self.config.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            headers.push(("X-Vault-Namespace".to_string(), namespace.to_string()));
        }

        debug!(path, "Reading secret");
        let response = self
            .transport
            .get(&url, &headers)
            .await
            .map_err(|e| match e {
                VaultError::SecretNotFound(_) => VaultError::not_found(path),
                other => other,
            })?;

        Ok(response::decode(&response.body, Operation::ReadKvV2).data)
    }

    /// Read a single field of the secret at `path`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_secret`]; a present secret with
    /// an absent field is `Ok(None)`.
    pub async fn get_secret_value(&self, path: &str, key: &str) -> VaultResult<Option<String>> {
        Ok(self.get_secret(path).await?.get(key).cloned())
    }
}

#[async_trait]
impl SecretFetcher for VaultClient {
    async fn fetch(&self, path: &str) -> VaultResult<HashMap<String, String>> {
        self.get_secret(path).await
    }
}

fn clean_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_strips_one_leading_slash() {
        assert_eq!(clean_path("/myapp/config"), "myapp/config");
        assert_eq!(clean_path("myapp/config"), "myapp/config");
    }
}
