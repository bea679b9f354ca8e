//! AWS identity plumbing for the IAM login flow.

pub mod credentials;
pub mod sigv4;

pub use credentials::{AwsCredentials, CredentialProvider, EnvCredentialProvider};
pub use sigv4::{SigningRequest, sign_post};
