//! Client configuration loaded from the environment or an env file.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Value failed validation
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// Name of the offending setting
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Auth method name not recognized
    #[error("Unsupported auth method: {0}")]
    UnsupportedAuthMethod(String),
}

/// Supported authentication methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Static token supplied in configuration
    Token,
    /// AppRole login with role id and optional secret id
    AppRole,
    /// AWS IAM signed-identity login
    AwsIam,
}

impl FromStr for AuthMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "approle" => Ok(Self::AppRole),
            "awsiam" => Ok(Self::AwsIam),
            other => Err(ConfigError::UnsupportedAuthMethod(other.to_string())),
        }
    }
}

/// Vault client configuration.
///
/// Immutable once constructed; absent method-specific fields are detected
/// at authentication time, not at load time.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server address, no trailing slash
    pub address: String,
    /// Resolved authentication method
    pub auth_method: AuthMethod,
    /// Static token (required for token auth)
    pub token: Option<String>,
    /// AppRole role id
    pub app_role_id: Option<String>,
    /// AppRole secret id; omitted for secret-id-less roles
    pub app_role_secret_id: Option<String>,
    /// AWS auth role name
    pub aws_role: Option<String>,
    /// AWS region used in the credential scope
    pub aws_region: String,
    /// STS endpoint the signed identity request is addressed to
    pub aws_sts_endpoint: String,
    /// Static AWS access key
    pub aws_access_key: Option<String>,
    /// Static AWS secret key
    pub aws_secret_key: Option<String>,
    /// AWS session token for temporary credentials
    pub aws_session_token: Option<String>,
    /// Value for the `X-Vault-AWS-IAM-Server-Id` header
    pub aws_iam_server_id: Option<String>,
    /// Connect timeout
    pub open_timeout: Duration,
    /// Read timeout
    pub read_timeout: Duration,
    /// Verify TLS certificates
    pub ssl_verify: bool,
    /// Vault Enterprise namespace
    pub namespace: Option<String>,
}

const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8200";
const DEFAULT_STS_ENDPOINT: &str = "https://sts.amazonaws.com/";
const DEFAULT_AWS_REGION: &str = "us-east-1";

impl VaultConfig {
    /// Create a configuration with defaults for everything but the address
    /// and method.
    #[must_use]
    pub fn new(address: impl Into<String>, auth_method: AuthMethod) -> Self {
        Self {
            address: trim_address(address.into()),
            auth_method,
            token: None,
            app_role_id: None,
            app_role_secret_id: None,
            aws_role: None,
            aws_region: DEFAULT_AWS_REGION.to_string(),
            aws_sts_endpoint: DEFAULT_STS_ENDPOINT.to_string(),
            aws_access_key: None,
            aws_secret_key: None,
            aws_session_token: None,
            aws_iam_server_id: None,
            open_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            ssl_verify: true,
            namespace: None,
        }
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first if one exists (real environment variables win).
    ///
    /// # Errors
    ///
    /// Fails when the address is empty, when no method can be resolved, or
    /// when a numeric or boolean setting cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Load configuration from the given env file, with real environment
    /// variables taking precedence over file values.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, plus everything [`Self::from_env`]
    /// can fail with.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref()).map_err(|e| ConfigError::InvalidValue {
            name: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;
        Self::load()
    }

    fn load() -> Result<Self, ConfigError> {
        let address = match env::var("VAULT_ADDR") {
            Ok(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::MissingRequired("VAULT_ADDR".to_string()));
            }
            Ok(raw) => raw,
            Err(_) => DEFAULT_ADDRESS.to_string(),
        };
        let token = non_empty(env::var("VAULT_TOKEN").ok());
        let auth_method =
            resolve_method(non_empty(env::var("VAULT_AUTH_METHOD").ok()), token.as_deref())?;

        Ok(Self {
            address: trim_address(address),
            auth_method,
            token,
            app_role_id: non_empty(env::var("VAULT_AUTH_APPROLE_ROLE_ID").ok()),
            app_role_secret_id: non_empty(env::var("VAULT_AUTH_APPROLE_SECRET_ID").ok()),
            aws_role: non_empty(env::var("VAULT_AWS_ROLE").ok()),
            aws_region: non_empty(env::var("VAULT_AWS_REGION").ok())
                .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            aws_sts_endpoint: non_empty(env::var("VAULT_AWS_STS_ENDPOINT").ok())
                .unwrap_or_else(|| DEFAULT_STS_ENDPOINT.to_string()),
            aws_access_key: non_empty(env::var("VAULT_AWS_ACCESS_KEY").ok()),
            aws_secret_key: non_empty(env::var("VAULT_AWS_SECRET_KEY").ok()),
            aws_session_token: non_empty(env::var("VAULT_AWS_SESSION_TOKEN").ok()),
            aws_iam_server_id: non_empty(env::var("VAULT_AWS_HEADER_VALUE").ok()),
            open_timeout: parse_secs("VAULT_OPEN_TIMEOUT", 5)?,
            read_timeout: parse_secs("VAULT_READ_TIMEOUT", 30)?,
            ssl_verify: parse_bool("VAULT_SSL_VERIFY", true)?,
            namespace: non_empty(env::var("VAULT_NAMESPACE").ok()),
        })
    }

    /// Set the static token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the AppRole credentials.
    #[must_use]
    pub fn with_app_role(
        mut self,
        role_id: impl Into<String>,
        secret_id: Option<String>,
    ) -> Self {
        self.app_role_id = Some(role_id.into());
        self.app_role_secret_id = secret_id;
        self
    }

    /// Set the AWS IAM role name.
    #[must_use]
    pub fn with_aws_role(mut self, role: impl Into<String>) -> Self {
        self.aws_role = Some(role.into());
        self
    }

    /// Set connect and read timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, open: Duration, read: Duration) -> Self {
        self.open_timeout = open;
        self.read_timeout = read;
        self
    }

    /// Toggle TLS certificate verification.
    #[must_use]
    pub const fn with_ssl_verify(mut self, verify: bool) -> Self {
        self.ssl_verify = verify;
        self
    }

    /// Set a global namespace for every call made with this configuration.
    ///
    /// Namespace support requires Vault Enterprise.
    ///
    /// # Errors
    ///
    /// Fails when the namespace is empty.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Result<Self, ConfigError> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "namespace".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        self.namespace = Some(namespace);
        Ok(self)
    }
}

/// Explicit method wins; otherwise a non-empty token implies token auth;
/// otherwise the configuration is unusable.
fn resolve_method(
    explicit: Option<String>,
    token: Option<&str>,
) -> Result<AuthMethod, ConfigError> {
    match explicit {
        Some(name) => name.parse(),
        None if token.is_some_and(|t| !t.is_empty()) => Ok(AuthMethod::Token),
        None => Err(ConfigError::MissingRequired(
            "VAULT_AUTH_METHOD".to_string(),
        )),
    }
}

fn trim_address(address: String) -> String {
    address.trim().trim_end_matches('/').to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_secs(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match non_empty(env::var(name).ok()) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(Duration::from_secs(default)),
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match non_empty(env::var(name).ok()) {
        Some(raw) => raw.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("token".parse::<AuthMethod>().ok(), Some(AuthMethod::Token));
        assert_eq!(
            "AppRole".parse::<AuthMethod>().ok(),
            Some(AuthMethod::AppRole)
        );
        assert_eq!(
            "awsiam".parse::<AuthMethod>().ok(),
            Some(AuthMethod::AwsIam)
        );
        assert!(matches!(
            "kubernetes".parse::<AuthMethod>(),
            Err(ConfigError::UnsupportedAuthMethod(_))
        ));
    }

    #[test]
    fn test_method_resolution_explicit_wins() {
        let method = resolve_method(Some("approle".to_string()), Some("s.token"));
        assert_eq!(method.ok(), Some(AuthMethod::AppRole));
    }

    #[test]
    fn test_method_resolution_token_fallback() {
        let method = resolve_method(None, Some("s.token"));
        assert_eq!(method.ok(), Some(AuthMethod::Token));
    }

    #[test]
    fn test_method_resolution_requires_method_or_token() {
        assert!(matches!(
            resolve_method(None, None),
            Err(ConfigError::MissingRequired(_))
        ));
        assert!(matches!(
            resolve_method(None, Some("")),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_address_trailing_slash_trimmed() {
        let config = VaultConfig::new("http://127.0.0.1:8200/", AuthMethod::Token);
        assert_eq!(config.address, "http://127.0.0.1:8200");
    }

    #[test]
    fn test_defaults() {
        let config = VaultConfig::new(DEFAULT_ADDRESS, AuthMethod::AwsIam);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.aws_sts_endpoint, "https://sts.amazonaws.com/");
        assert_eq!(config.open_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert!(config.ssl_verify);
    }

    #[test]
    fn test_namespace_rejects_empty() {
        let result = VaultConfig::new(DEFAULT_ADDRESS, AuthMethod::Token).with_namespace("");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_builders() {
        let config = VaultConfig::new(DEFAULT_ADDRESS, AuthMethod::AppRole)
            .with_app_role("role-id", Some("secret-id".to_string()))
            .with_timeouts(Duration::from_secs(2), Duration::from_secs(10))
            .with_ssl_verify(false);
        assert_eq!(config.app_role_id.as_deref(), Some("role-id"));
        assert_eq!(config.app_role_secret_id.as_deref(), Some("secret-id"));
        assert_eq!(config.open_timeout, Duration::from_secs(2));
        assert!(!config.ssl_verify);
    }
}
