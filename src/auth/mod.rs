//! Pluggable authentication strategies.
//!
//! Each strategy is stateless and single-shot: a failed attempt surfaces
//! immediately and the caller decides whether to try again.

mod approle;
mod aws_iam;
mod token;

pub use approle::AppRoleAuth;
pub use aws_iam::AwsIamAuth;
pub use token::TokenAuth;

use crate::config::{AuthMethod, VaultConfig};
use crate::error::{VaultError, VaultResult};
use crate::response::{self, Operation};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use serde::Serialize;

/// Key under which login responses carry the issued token.
pub const CLIENT_TOKEN: &str = "client_token";

/// Strategy for obtaining a bearer token from Vault.
#[async_trait]
pub trait VaultAuthenticator: Send + Sync {
    /// Obtain a client token using the given configuration.
    ///
    /// # Errors
    ///
    /// Fails when required configuration fields are missing or the remote
    /// call does not yield a usable token.
    async fn authenticate(
        &self,
        config: &VaultConfig,
        transport: &HttpTransport,
    ) -> VaultResult<String>;
}

/// Select the authenticator matching a resolved method.
#[must_use]
pub fn authenticator_for(method: AuthMethod) -> Box<dyn VaultAuthenticator> {
    match method {
        AuthMethod::Token => Box::new(TokenAuth),
        AuthMethod::AppRole => Box::new(AppRoleAuth),
        AuthMethod::AwsIam => Box::new(AwsIamAuth::default()),
    }
}

/// POST a login body and extract the client token from the response.
///
/// A rejected login (non-2xx) is an authentication failure, not a
/// transport failure; connectivity errors pass through unchanged.
pub(crate) async fn login_post<T: Serialize + ?Sized>(
    transport: &HttpTransport,
    url: &str,
    body: &T,
) -> VaultResult<String> {
    let response = match transport.post_json(url, &[], body).await {
        Ok(response) => response,
        Err(VaultError::Status { status, body }) => {
            return Err(VaultError::auth_failed(format!("status {status}: {body}")));
        }
        Err(other) => return Err(other),
    };

    let payload = response::decode(&response.body, Operation::Login);
    match payload.data.get(CLIENT_TOKEN) {
        Some(token) if !token.is_empty() => Ok(token.clone()),
        _ => Err(VaultError::auth_failed(
            "login response contained no client token",
        )),
    }
}
