//! Error types for the REST client.
//!
//! Everything the transport can go wrong with is folded into a single
//! [`ApiError`] whose `Display` form is the human-readable message shown
//! to users (inline on query pages, as a toast on failed mutations).

use thiserror::Error;

/// Errors produced by [`ApiClient`](crate::api::ApiClient) calls.
///
/// A failed call maps to exactly one variant: transport failures become
/// [`ApiError::Network`], non-success HTTP statuses become
/// [`ApiError::Request`], and undecodable bodies become
/// [`ApiError::Parse`]. No variant is ever retried automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response not received.
    #[error("network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    ///
    /// `message` is taken from the `{"message": ...}` error body when the
    /// server provides one, otherwise a generic text for the status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The response body was not valid JSON where JSON was expected.
    #[error("invalid response from server: {detail}")]
    Parse { detail: String },
}

impl ApiError {
    /// Build the fallback `Request` error used when the error body does
    /// not carry a usable `message` field.
    pub fn request_with_status(status: u16) -> Self {
        ApiError::Request {
            status,
            message: format!("request failed with status {status}"),
        }
    }

    /// HTTP status of the failed request, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Parse {
                detail: err.to_string(),
            };
        }
        ApiError::Network { source: err }
    }
}
