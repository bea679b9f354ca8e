//! AWS IAM authentication: a signed STS `GetCallerIdentity` request acts
//! as the proof of identity submitted to Vault's `auth/aws/login`.

use crate::auth::{VaultAuthenticator, login_post};
use crate::aws::credentials::{self, CredentialProvider, EnvCredentialProvider};
use crate::aws::sigv4::{SigningRequest, sign_post};
use crate::config::{ConfigError, VaultConfig};
use crate::error::{VaultError, VaultResult};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use url::Url;

const STS_BODY: &str = "Action=GetCallerIdentity&Version=2011-06-15";
const STS_SERVICE: &str = "sts";
const IAM_SERVER_ID_HEADER: &str = "X-Vault-AWS-IAM-Server-Id";

#[derive(Serialize)]
struct IamLoginRequest<'a> {
    role: &'a str,
    iam_http_request_method: &'static str,
    iam_request_url: String,
    iam_request_body: String,
    iam_request_headers: String,
}

/// Logs in by signing an STS identity request with resolved AWS
/// credentials.
pub struct AwsIamAuth {
    provider: Box<dyn CredentialProvider>,
}

impl AwsIamAuth {
    /// Use a custom ambient credential provider instead of the
    /// environment-variable one.
    #[must_use]
    pub fn with_provider(provider: Box<dyn CredentialProvider>) -> Self {
        Self { provider }
    }
}

impl Default for AwsIamAuth {
    fn default() -> Self {
        Self {
            provider: Box::new(EnvCredentialProvider),
        }
    }
}

#[async_trait]
impl VaultAuthenticator for AwsIamAuth {
    async fn authenticate(
        &self,
        config: &VaultConfig,
        transport: &HttpTransport,
    ) -> VaultResult<String> {
        let role = config
            .aws_role
            .as_deref()
            .filter(|role| !role.is_empty())
            .ok_or_else(|| {
                VaultError::auth_failed("AWS IAM authentication requires a role name")
            })?;

        let aws_credentials = credentials::resolve(config, self.provider.as_ref())?;

        let endpoint = Url::parse(&config.aws_sts_endpoint).map_err(|e| {
            VaultError::Config(ConfigError::InvalidValue {
                name: "VAULT_AWS_STS_ENDPOINT".to_string(),
                reason: e.to_string(),
            })
        })?;

        let extra_headers: Vec<(String, String)> = config
            .aws_iam_server_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| (IAM_SERVER_ID_HEADER.to_string(), id.to_string()))
            .into_iter()
            .collect();

        let signing = SigningRequest {
            service: STS_SERVICE,
            region: &config.aws_region,
            endpoint: &endpoint,
            body: STS_BODY,
            timestamp: Utc::now(),
            extra_headers: &extra_headers,
        };
        let signed_headers = sign_post(&signing, &aws_credentials);

        let body = IamLoginRequest {
            role,
            iam_http_request_method: "POST",
            iam_request_url: BASE64.encode(config.aws_sts_endpoint.as_bytes()),
            iam_request_body: BASE64.encode(STS_BODY.as_bytes()),
            iam_request_headers: BASE64.encode(header_json(&signed_headers).as_bytes()),
        };

        let url = format!("{}/v1/auth/aws/login", config.address);
        debug!(url = %url, role, "Logging in with AWS IAM");
        login_post(transport, &url, &body).await
    }
}

/// Serialize signed headers as name → single-element value array, with
/// `host` excluded: Vault reconstructs it from the request URL.
fn header_json(headers: &[(String, String)]) -> String {
    let mut object = serde_json::Map::new();
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("host") {
            continue;
        }
        object.insert(
            name.clone(),
            serde_json::Value::from(vec![value.clone()]),
        );
    }
    serde_json::Value::Object(object).to_string()
}
