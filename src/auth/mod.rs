//! Authentication strategies for API requests.
//!
//! Two strategies are supported side by side:
//!
//! - [`Credentials::Bearer`]: a static personal access token sent as
//!   `Authorization: Bearer <token>`
//! - [`Credentials::Signed`]: a key pair whose secret signs every request with
//!   a timestamped HMAC (see [`signature`])
//!
//! # Example
//!
//! ```rust
//! use digitalocean_api::{ApiToken, Credentials};
//! use digitalocean_api::clients::{HttpMethod, RequestTarget};
//!
//! let credentials = Credentials::bearer(ApiToken::new("dop_v1_abc").unwrap());
//! let target = RequestTarget::new("droplets");
//! let headers = credentials.auth_headers(HttpMethod::Get, &target, 0);
//! assert_eq!(headers[0], ("Authorization", "Bearer dop_v1_abc".to_string()));
//! ```

pub mod signature;

use crate::clients::{HttpMethod, RequestTarget};
use crate::config::{AccessKeyId, ApiToken, ClientLabel, SecretKey};

/// Key pair plus client label used for HMAC-signed requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningKey {
    /// Public access key id, sent in clear.
    pub access_key_id: AccessKeyId,
    /// Secret used to compute the signature. Never sent.
    pub secret_key: SecretKey,
    /// Label of the calling application, part of the signed string.
    pub client_label: ClientLabel,
}

/// Credentials attached to every outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Static bearer token.
    Bearer(ApiToken),
    /// Timestamped HMAC signature.
    Signed(SigningKey),
}

impl Credentials {
    /// Creates bearer-token credentials.
    #[must_use]
    pub const fn bearer(token: ApiToken) -> Self {
        Self::Bearer(token)
    }

    /// Creates key-pair credentials.
    #[must_use]
    pub const fn signed(
        access_key_id: AccessKeyId,
        secret_key: SecretKey,
        client_label: ClientLabel,
    ) -> Self {
        Self::Signed(SigningKey {
            access_key_id,
            secret_key,
            client_label,
        })
    }

    /// Returns the authentication headers for one request.
    ///
    /// `timestamp_ms` is only used by signed credentials; callers pass the
    /// current time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn auth_headers(
        &self,
        method: HttpMethod,
        target: &RequestTarget,
        timestamp_ms: i64,
    ) -> Vec<(&'static str, String)> {
        match self {
            Self::Bearer(token) => {
                vec![("Authorization", format!("Bearer {}", token.as_ref()))]
            }
            Self::Signed(key) => {
                let message = signature::string_to_sign(
                    key.access_key_id.as_ref(),
                    method,
                    &target.signing_path(),
                    target.identifier(),
                    timestamp_ms,
                    key.client_label.as_ref(),
                );
                let signed =
                    signature::compute_signature_base64(message.as_bytes(), key.secret_key.as_ref());
                vec![
                    (
                        signature::ACCESS_KEY_HEADER,
                        key.access_key_id.as_ref().to_string(),
                    ),
                    (signature::SIGNATURE_HEADER, signed),
                    (signature::TIMESTAMP_HEADER, timestamp_ms.to_string()),
                ]
            }
        }
    }
}
