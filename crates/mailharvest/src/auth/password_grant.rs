//! OAuth2 resource-owner password credentials grant.
//!
//! Exchanges a username and password for a bearer token at the identity
//! platform's token endpoint. The token is used as-is for the whole run;
//! refresh is not attempted.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::AuthError;
use crate::gateway::AccessToken;

/// Maximum length for error bodies to prevent log flooding.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Default connect timeout for token requests.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for token requests.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Truncates an error body so token material does not end up in logs.
fn sanitize_error_body(body: &str) -> String {
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

/// Successful response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds of the access token.
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// Space-separated list of granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Error response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,

    #[serde(default)]
    pub error_description: Option<String>,
}

/// Token acquisition with the password grant.
pub struct PasswordGrantAuth {
    client: Client,
    token_url: String,
    client_id: String,
}

impl PasswordGrantAuth {
    pub fn new(token_url: impl Into<String>, client_id: impl Into<String>) -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Requests a token for `scopes` on behalf of `username`.
    pub async fn acquire_token(
        &self,
        scopes: &[String],
        username: &str,
        password: &SecretString,
    ) -> Result<AccessToken, AuthError> {
        let scope = scopes.join(" ");
        info!("Requesting access token for {} (scopes: {})", username, scope);

        let params = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("scope", scope.as_str()),
            ("username", username),
            ("password", password.expose_secret()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Request(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Request(format!("Failed to read token response: {}", e)))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => AuthError::Rejected {
                    error: err.error,
                    description: err
                        .error_description
                        .map(|d| sanitize_error_body(&d))
                        .unwrap_or_default(),
                },
                Err(_) => AuthError::Request(format!(
                    "Token request failed ({}): {}",
                    status,
                    sanitize_error_body(&body)
                )),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "Token response carried an empty access_token".to_string(),
            ));
        }

        debug!(
            "Token type {:?}, expires in {:?}s, granted scopes {:?}",
            token.token_type, token.expires_in, token.scope
        );
        info!("Successfully obtained access token");

        Ok(AccessToken::new(token.access_token))
    }
}
