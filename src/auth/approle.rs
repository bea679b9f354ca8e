//! AppRole authentication via `auth/approle/login`.

use crate::auth::{VaultAuthenticator, login_post};
use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Logs in with a role id and an optional secret id.
///
/// The secret id is omitted from the request body when absent, which
/// supports secret-id-less roles.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppRoleAuth;

#[derive(Serialize)]
struct AppRoleLoginRequest<'a> {
    role_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_id: Option<&'a str>,
}

#[async_trait]
impl VaultAuthenticator for AppRoleAuth {
    async fn authenticate(
        &self,
        config: &VaultConfig,
        transport: &HttpTransport,
    ) -> VaultResult<String> {
        let role_id = config
            .app_role_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| VaultError::auth_failed("AppRole authentication requires a role_id"))?;

        let body = AppRoleLoginRequest {
            role_id,
            secret_id: config
                .app_role_secret_id
                .as_deref()
                .filter(|id| !id.is_empty()),
        };

        let url = format!("{}/v1/auth/approle/login", config.address);
        debug!(url = %url, "Logging in with AppRole");
        login_post(transport, &url, &body).await
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
    async fn test_missing_role_id_fails_before_any_call() {
        let config = VaultConfig::new("http://127.0.0.1:8200", AuthMethod::AppRole);
        let result = AppRoleAuth.authenticate(&config, &transport()).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_role_id_fails_before_any_call() {
        let config = VaultConfig::new("http://127.0.0.1:8200", AuthMethod::AppRole)
            .with_app_role("", None);
        let result = AppRoleAuth.authenticate(&config, &transport()).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed(_))));
    }
}
