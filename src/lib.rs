//! HashiCorp Vault KV v2 client with pluggable authentication.
//!
//! Authenticates once against a Vault-compatible server using a static
//! token, AppRole, or an AWS IAM signed-identity request, then serves
//! key/value secrets through a cached `vault:<path>#<field>` lookup layer.
//!
//! ```no_run
//! use vault_kv_client::{PropertyLookup, VaultConfig};
//!
//! # async fn example() -> Result<(), vault_kv_client::VaultError> {
//! let config = VaultConfig::from_env()?;
//! let lookup = PropertyLookup::connect(config).await?;
//! let password = lookup.get_property("vault:myapp/config#db_password").await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod aws;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod props;
pub mod response;
pub mod transport;

pub use cache::{SecretCache, SecretFetcher};
pub use client::VaultClient;
pub use config::{AuthMethod, ConfigError, VaultConfig};
pub use error::{VaultError, VaultResult};
pub use props::PropertyLookup;
pub use transport::HttpTransport;
