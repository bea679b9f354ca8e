//! AWS credential resolution.
//!
//! Static configuration wins; otherwise an ambient provider supplies the
//! credentials. Richer chains (instance metadata, shared credential files)
//! live outside this crate and plug in through [`CredentialProvider`].

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use secrecy::SecretString;
use std::env;
use std::fmt;

/// AWS credentials used for one signing operation; never persisted.
#[derive(Clone)]
pub struct AwsCredentials {
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: SecretString,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Source of ambient AWS credentials when none are configured statically.
pub trait CredentialProvider: Send + Sync {
    /// Produce credentials, or fail with the underlying cause.
    fn resolve(&self) -> VaultResult<AwsCredentials>;
}

/// Reads credentials from the standard AWS environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn resolve(&self) -> VaultResult<AwsCredentials> {
        let access_key = non_empty_env("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| VaultError::auth_failed("AWS_ACCESS_KEY_ID is not set"))?;
        let secret_key = non_empty_env("AWS_SECRET_ACCESS_KEY")
            .ok_or_else(|| VaultError::auth_failed("AWS_SECRET_ACCESS_KEY is not set"))?;

        Ok(AwsCredentials {
            access_key,
            secret_key: SecretString::from(secret_key),
            session_token: non_empty_env("AWS_SESSION_TOKEN"),
        })
    }
}

/// Resolve credentials for a signing operation.
///
/// # Errors
///
/// Fails with an authentication error when neither the configuration nor
/// the ambient provider can supply credentials.
pub fn resolve(
    config: &VaultConfig,
    provider: &dyn CredentialProvider,
) -> VaultResult<AwsCredentials> {
    match (config.aws_access_key.as_deref(), config.aws_secret_key.as_deref()) {
        (Some(access_key), Some(secret_key))
            if !access_key.is_empty() && !secret_key.is_empty() =>
        {
            Ok(AwsCredentials {
                access_key: access_key.to_string(),
                secret_key: SecretString::from(secret_key.to_string()),
                session_token: config.aws_session_token.clone(),
            })
        }
        _ => provider
            .resolve()
            .map_err(|e| VaultError::auth_failed(format!("no AWS credentials available: {e}"))),
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
