//! Minimal HTTP transport for Vault and STS calls.
//!
//! One attempt per call, no retries; the caller decides whether to
//! re-invoke a failed operation.

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

/// Status and body of a completed call.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

/// HTTP client with header injection and independent connect/read timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    read_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with the given timeouts and TLS verification flag.
    ///
    /// # Errors
    ///
    /// Fails when the underlying client cannot be built (e.g. TLS
    /// initialization fails).
    pub fn new(
        open_timeout: Duration,
        read_timeout: Duration,
        ssl_verify: bool,
    ) -> VaultResult<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(open_timeout)
            .danger_accept_invalid_certs(!ssl_verify)
            .use_rustls_tls()
            .build()
            .map_err(VaultError::Http)?;

        Ok(Self {
            client,
            read_timeout,
        })
    }

    /// Build a transport from the timeout and TLS settings of a config.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::new`].
    pub fn for_config(config: &VaultConfig) -> VaultResult<Self> {
        Self::new(config.open_timeout, config.read_timeout, config.ssl_verify)
    }

    /// Issue a GET request with the given headers.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, timeouts, and any non-2xx status.
    pub async fn get(&self, url: &str, headers: &[(String, String)]) -> VaultResult<HttpResponse> {
        let request = apply_headers(self.client.get(url).timeout(self.read_timeout), headers);
        execute(url, request).await
    }

    /// Issue a POST request carrying a JSON body.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, timeouts, and any non-2xx status.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &T,
    ) -> VaultResult<HttpResponse> {
        let request = apply_headers(
            self.client.post(url).timeout(self.read_timeout).json(body),
            headers,
        );
        execute(url, request).await
    }
}

fn apply_headers(mut request: RequestBuilder, headers: &[(String, String)]) -> RequestBuilder {
    for (name, value) in headers {
        if !value.is_empty() {
            request = request.header(name, value);
        }
    }
    request
}

async fn execute(url: &str, request: RequestBuilder) -> VaultResult<HttpResponse> {
    let response = request
        .send()
        .await
        .map_err(|e| VaultError::unavailable(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    match status {
        s if (200..300).contains(&s) => Ok(HttpResponse { status, body }),
        404 => Err(VaultError::not_found(url)),
        403 => Err(VaultError::PermissionDenied(url.to_string())),
        _ => Err(VaultError::Status { status, body }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthMethod;

    #[test]
    fn test_build_from_config() {
        let config = VaultConfig::new("http://127.0.0.1:8200", AuthMethod::Token);
        assert!(HttpTransport::for_config(&config).is_ok());
    }

    #[test]
    fn test_build_without_ssl_verify() {
        let result = HttpTransport::new(
            Duration::from_secs(1),
            Duration::from_secs(1),
            false,
        );
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let transport = HttpTransport::new(
            Duration::from_millis(200),
            Duration::from_millis(200),
            true,
        )
        .expect("transport");

        let result = transport.get("http://192.0.2.1:8200/v1/health", &[]).await;
        assert!(matches!(result, Err(VaultError::Unavailable(_))));
    }
}
