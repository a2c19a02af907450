//! Client error taxonomy
//!
//! Callers must be able to tell "my request was malformed" from "the server
//! rejected it" from "the network failed". Local errors (`InvalidArgument`,
//! `Validation`) are raised before any network call and never wrapped in
//! transport variants; remote errors keep the original status and raw body.

use domain::ProbeValidationError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by control-plane operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed local input; no network call was made
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Probe request failed structural validation; no network call was made
    #[error(transparent)]
    Validation(#[from] ProbeValidationError),

    /// Local encode/decode failure, distinct from transport failures
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The server answered with a non-success status or a GraphQL errors array
    #[error("remote call failed with status {status}: {body}")]
    Remote {
        /// HTTP status code as received
        status: u16,
        /// Raw response body (or serialized GraphQL errors) for diagnostics
        body: String,
    },

    /// The call could not be completed at the network level
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    /// True for errors raised before any network traffic
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::Validation(_) | Self::Serialization(_)
        )
    }
}

/// Reject empty identifiers before they reach the wire
pub(crate) fn require_non_empty(value: &str, what: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::InvalidArgument(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}
