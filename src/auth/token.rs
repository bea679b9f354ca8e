//! Static token authentication: no API call, the configured token is the
//! bearer token.

use crate::auth::VaultAuthenticator;
use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::transport::HttpTransport;
use async_trait::async_trait;

/// Uses the token from the configuration directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenAuth;

#[async_trait]
impl VaultAuthenticator for TokenAuth {
    async fn authenticate(
        &self,
        config: &VaultConfig,
        _transport: &HttpTransport,
    ) -> VaultResult<String> {
        match config.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(VaultError::auth_failed(
                "no token provided in configuration",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthMethod;

    fn transport() -> HttpTransport {
        HttpTransport::new(
            std::time::Duration::from_secs(1),
            std::time::Duration::from_secs(1),
            true,
        )
        .expect("transport")
    }

    #[tokio::test]
    async fn test_configured_token_returned_verbatim() {
        let config =
            VaultConfig::new("http://127.0.0.1:8200", AuthMethod::Token).with_token("s.root");
        let token = TokenAuth
            .authenticate(&config, &transport())
            .await
            .expect("token");
        assert_eq!(token, "s.root");
    }

    #[tokio::test]
    async fn test_missing_token_fails() {
        let config = VaultConfig::new("http://127.0.0.1:8200", AuthMethod::Token);
        let result = TokenAuth.authenticate(&config, &transport()).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_token_fails() {
        let config = VaultConfig::new("http://127.0.0.1:8200", AuthMethod::Token).with_token("");
        let result = TokenAuth.authenticate(&config, &transport()).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed(_))));
    }
}
