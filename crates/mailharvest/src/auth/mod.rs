//! Bearer token acquisition against the Microsoft identity platform.

pub mod password_grant;

use thiserror::Error;

pub use password_grant::{PasswordGrantAuth, TokenErrorResponse, TokenResponse};

/// Errors that can occur while acquiring an access token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The token endpoint could not be reached or answered unreadably.
    #[error("{0}")]
    Request(String),

    /// The identity provider refused the credentials or the requested scopes.
    #[error("Token request rejected: {error}: {description}")]
    Rejected { error: String, description: String },

    /// The token endpoint answered 2xx with an unusable body.
    #[error("{0}")]
    InvalidResponse(String),
}
