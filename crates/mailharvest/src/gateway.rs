//! Authenticated calls against the mail API.
//!
//! Every network operation of a run goes through [`ApiGateway`]. Transport
//! failures and non-2xx responses are logged and collapse into `Ok(None)`;
//! only a success body that is not valid JSON surfaces as an error.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Default connect timeout for mail API requests.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for mail API requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum length of an error body echoed to the log.
const MAX_ERROR_BODY_LENGTH: usize = 1000;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Bearer credential presented on every call.
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &body[..end])
    } else {
        body.to_string()
    }
}

/// Issues protected GET/DELETE calls over one shared HTTP client.
pub struct ApiGateway {
    client: Client,
}

impl ApiGateway {
    /// Creates a gateway with the default timeouts.
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a gateway whose client carries `Accept: application/json`
    /// as a default header, configured once for the client's lifetime.
    pub fn with_timeouts(connect: Duration, request: Duration) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(connect)
            .timeout(request)
            .build()
            .map_err(GatewayError::ClientBuild)?;

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, token: &AccessToken) -> Result<Option<Value>, GatewayError> {
        self.call(Method::GET, url, token).await
    }

    pub async fn delete(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<Option<Value>, GatewayError> {
        self.call(Method::DELETE, url, token).await
    }

    async fn call(
        &self,
        method: Method,
        url: &str,
        token: &AccessToken,
    ) -> Result<Option<Value>, GatewayError> {
        if token.is_empty() {
            warn!("Refusing {} {}: access token is empty", method, url);
            return Ok(None);
        }

        debug!("{} {}", method, url);

        // Authorization is set per request so a rotated token replaces the old one.
        let response = match self
            .client
            .request(method.clone(), url)
            .bearer_auth(token.expose())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to call the web API ({} {}): {}", method, url, e);
                return Ok(None);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(
                    "Failed to read the web API response ({} {}, {}): {}",
                    method, url, status, e
                );
                return Ok(None);
            }
        };

        if !status.is_success() {
            error!("Failed to call the web API: {}", status);
            error!("Content: {}", truncate_body(&body));
            return Ok(None);
        }

        if body.trim().is_empty() {
            return Ok(Some(Value::Object(serde_json::Map::new())));
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| GatewayError::Decode {
                url: url.to_string(),
                source,
            })
    }
}
