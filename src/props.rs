//! `vault:<path>#<field>` placeholder lookup backed by the secret cache.
//!
//! This is the surface a host process wires into its property resolution:
//! failures never propagate, a bad placeholder or missing secret simply
//! resolves to nothing.

use crate::cache::{SecretCache, SecretFetcher};
use crate::client::VaultClient;
use crate::config::VaultConfig;
use crate::error::VaultResult;
use tracing::{error, warn};

/// Prefix marking a property key as a Vault placeholder.
pub const VAULT_PREFIX: &str = "vault:";

/// Split a placeholder into `(path, field)`.
///
/// Returns `None` for non-placeholder keys and malformed placeholders:
/// missing `#`, empty path, or empty field. The field may itself contain
/// `#`; only the first one separates.
#[must_use]
pub fn parse_placeholder(key: &str) -> Option<(&str, &str)> {
    let spec = key.strip_prefix(VAULT_PREFIX)?;
    let (path, field) = spec.split_once('#')?;
    if path.is_empty() || field.is_empty() {
        return None;
    }
    Some((path, field))
}

/// Resolves placeholder keys to secret values through a cache.
pub struct PropertyLookup<F> {
    cache: SecretCache<F>,
}

impl PropertyLookup<VaultClient> {
    /// Authenticate and build a lookup backed by a live Vault client.
    ///
    /// # Errors
    ///
    /// Fails when authentication fails; lookups themselves never error.
    pub async fn connect(config: VaultConfig) -> VaultResult<Self> {
        Ok(Self::new(VaultClient::new(config).await?))
    }
}

impl<F: SecretFetcher> PropertyLookup<F> {
    /// Build a lookup over the given fetcher.
    pub fn new(fetcher: F) -> Self {
        Self {
            cache: SecretCache::new(fetcher),
        }
    }

    /// Resolve a property key.
    ///
    /// Returns `None` unless `key` is a well-formed placeholder naming an
    /// existing field of a retrievable secret.
    pub async fn get_property(&self, key: &str) -> Option<String> {
        if !key.starts_with(VAULT_PREFIX) {
            return None;
        }
        let Some((path, field)) = parse_placeholder(key) else {
            warn!(key, "Invalid Vault placeholder");
            return None;
        };

        match self.cache.get(path).await {
            Ok(record) => {
                let value = record.get(field).cloned();
                if value.is_none() {
                    warn!(path, field, "Secret field not found");
                }
                value
            }
            Err(e) => {
                error!(path, error = %e, "Failed to retrieve secret");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_parse_valid_placeholder() {
        assert_eq!(
            parse_placeholder("vault:secret/app#password"),
            Some(("secret/app", "password"))
        );
    }

    #[test]
    fn test_parse_keeps_later_hashes_in_field() {
        assert_eq!(
            parse_placeholder("vault:secret/app#a#b"),
            Some(("secret/app", "a#b"))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_placeholder("vault:secret/app"), None);
        assert_eq!(parse_placeholder("vault:#"), None);
        assert_eq!(parse_placeholder("vault:#field"), None);
        assert_eq!(parse_placeholder("vault:secret/app#"), None);
        assert_eq!(parse_placeholder("java.version"), None);
    }

    struct MapFetcher {
        calls: Arc<AtomicUsize>,
        data: HashMap<String, HashMap<String, String>>,
    }

    impl MapFetcher {
        fn with_secret(path: &str, field: &str, value: &str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                data: HashMap::from([(
                    path.to_string(),
                    HashMap::from([(field.to_string(), value.to_string())]),
                )]),
            }
        }
    }

    #[async_trait]
    impl SecretFetcher for MapFetcher {
        async fn fetch(&self, path: &str) -> VaultResult<HashMap<String, String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.data
                .get(path)
                .cloned()
                .ok_or_else(|| VaultError::not_found(path))
        }
    }

    #[tokio::test]
    async fn test_valid_placeholder_resolves() {
        let lookup = PropertyLookup::new(MapFetcher::with_secret(
            "secret/app",
            "password",
            "topsecret",
        ));
        let value = lookup.get_property("vault:secret/app#password").await;
        assert_eq!(value.as_deref(), Some("topsecret"));
    }

    #[tokio::test]
    async fn test_malformed_placeholders_resolve_to_none() {
        let lookup = PropertyLookup::new(MapFetcher::with_secret(
            "secret/app",
            "password",
            "topsecret",
        ));
        assert_eq!(lookup.get_property("vault:secret/app").await, None);
        assert_eq!(lookup.get_property("vault:#").await, None);
        assert_eq!(lookup.get_property("java.version").await, None);
    }

    #[tokio::test]
    async fn test_unknown_field_resolves_to_none() {
        let lookup = PropertyLookup::new(MapFetcher::with_secret(
            "secret/app",
            "username",
            "admin",
        ));
        assert_eq!(lookup.get_property("vault:secret/app#password").await, None);
    }

    #[tokio::test]
    async fn test_fetch_failure_resolves_to_none() {
        let lookup = PropertyLookup::new(MapFetcher::with_secret(
            "secret/app",
            "password",
            "topsecret",
        ));
        assert_eq!(lookup.get_property("vault:secret/other#token").await, None);
    }

    #[tokio::test]
    async fn test_secret_is_cached_after_first_lookup() {
        let fetcher = MapFetcher::with_secret("secret/api", "token", "abc123");
        let calls = Arc::clone(&fetcher.calls);
        let lookup = PropertyLookup::new(fetcher);

        let first = lookup.get_property("vault:secret/api#token").await;
        let second = lookup.get_property("vault:secret/api#token").await;

        assert_eq!(first.as_deref(), Some("abc123"));
        assert_eq!(second.as_deref(), Some("abc123"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
