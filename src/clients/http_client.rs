//! HTTP client for DigitalOcean API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the API with automatic retry handling.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::auth::Credentials;
use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{BaseEndpoint, DigitalOceanConfig};

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 512;

/// HTTP client for making requests to the DigitalOcean API.
///
/// The client handles:
/// - URL construction from the configured [`BaseEndpoint`]
/// - Default headers including User-Agent and Accept
/// - Per-request authentication headers (bearer or signed)
/// - Automatic retry logic for 429 and 5xx responses
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use digitalocean_api::clients::{HttpClient, HttpMethod, HttpRequest, RequestTarget};
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, RequestTarget::new("regions"))
///     .build()
///     .unwrap();
///
/// let response = client.request(&request).await?;
/// println!("{:?}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_endpoint: BaseEndpoint,
    credentials: Credentials,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &DigitalOceanConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}DigitalOcean API Library v{SDK_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_endpoint: config.base_endpoint().clone(),
            credentials: config.credentials().clone(),
            default_headers,
        })
    }

    /// Returns the API root URL for this client.
    #[must_use]
    pub const fn base_endpoint(&self) -> &BaseEndpoint {
        &self.base_endpoint
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the API.
    ///
    /// Authentication headers are recomputed for every attempt so that signed
    /// requests always carry a fresh timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Max retries exceeded (`MaxRetries`)
    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = request.target.url(&self.base_endpoint)?;

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(url.clone()),
                HttpMethod::Post => self.client.post(url.clone()),
                HttpMethod::Put => self.client.put(url.clone()),
                HttpMethod::Delete => self.client.delete(url.clone()),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            let timestamp_ms = Utc::now().timestamp_millis();
            for (key, value) in
                self.credentials
                    .auth_headers(request.http_method, &request.target, timestamp_ms)
            {
                req_builder = req_builder.header(key, value);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            debug!(method = %request.http_method, %url, attempt = tries, "sending request");

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let raw = res.bytes().await?.to_vec();
            let response = HttpResponse::new(code, res_headers, raw);

            debug!(
                method = %request.http_method,
                %url,
                status = code,
                request_id = response.request_id().unwrap_or("-"),
                body = truncate_for_log(&response.text()),
                "received response"
            );

            if response.is_ok() {
                return Ok(response);
            }

            let should_retry = code == 429 || code >= 500;
            if !should_retry || tries >= request.tries {
                if should_retry && request.tries > 1 {
                    return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                        code,
                        tries: request.tries,
                        body: response.text(),
                        error_reference: response.request_id().map(String::from),
                    }));
                }
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    reason: response.reason.clone(),
                    body: response.text(),
                    error_reference: response.request_id().map(String::from),
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            debug!(
                status = code,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> Duration {
        // 429 honours Retry-After; 5xx always waits the fixed delay
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after {
                if retry_after.is_finite() && retry_after >= 0.0 {
                    return Duration::from_secs_f64(retry_after);
                }
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }
}

/// Cuts `text` to at most [`LOG_BODY_LIMIT`] bytes on a character boundary.
fn truncate_for_log(text: &str) -> &str {
    if text.len() <= LOG_BODY_LIMIT {
        return text;
    }
    let mut end = LOG_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
