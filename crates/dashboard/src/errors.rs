//! Error taxonomy for dashboard client operations.
//!
//! Not every unsuccessful call is an error. A resource that does not exist is
//! reported as absence (`None`, an empty list, or `false`) by the
//! [`crate::Client`] methods. The types here cover the conditions that are
//! always surfaced to the caller and never silently swallowed:
//!
//! - the bound API generation cannot perform the operation at all,
//! - the backend rejected the credential,
//! - manifest content failed validation (locally or remotely),
//! - the transport failed on a path where it is not downgraded to absence,
//! - the backend answered with something that cannot be decoded.
//!
//! No error in this module is retried by the client.

use thiserror::Error;

use crate::ApiVersion;

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

/// Failure of the transport primitive itself: no status code was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The dashboard host could not be reached (DNS, refused, reset).
    #[error("could not connect to {url}: {message}")]
    Connect {
        /// URL of the request that failed.
        url: String,
        /// Description reported by the transport.
        message: String,
    },

    /// The request did not complete within the transport's timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// URL of the request that timed out.
        url: String,
    },

    /// Any other failure while sending the request or reading the response.
    #[error("request to {url} failed: {message}")]
    Request {
        /// URL of the request that failed.
        url: String,
        /// Description reported by the transport.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Errors raised by [`crate::Client`] operations and driver implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// The bound API generation does not implement this operation.
    ///
    /// Identifies a caller or configuration bug; distinct from every failure
    /// of a call that was actually attempted.
    #[error("operation '{operation}' is not supported by the {api} API")]
    Unsupported {
        /// Name of the client operation, e.g. `"statuses"`.
        operation: &'static str,
        /// API generation of the bound driver.
        api: ApiVersion,
    },

    /// The backend reported a missing or invalid credential.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Message reported by the backend.
        message: String,
    },

    /// Manifest content was rejected, either before the write or by the
    /// backend.
    #[error("invalid manifest: {reason}")]
    Validation {
        /// Human-readable reason for the rejection.
        reason: String,
    },

    /// The backend rejected the request with a plain-text explanation.
    #[error("dashboard returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// The transport failed on a path where failures are not downgraded to
    /// absence.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A successful response carried a payload that could not be decoded.
    #[error("could not decode {context}: {message}")]
    Decode {
        /// What was being decoded, e.g. `"instance list"`.
        context: &'static str,
        /// Parser message.
        message: String,
    },

    /// The client could not be constructed from the supplied configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl DashboardError {
    /// Creates an [`DashboardError::Unsupported`] for `operation` on `api`.
    pub fn unsupported(operation: &'static str, api: ApiVersion) -> Self {
        Self::Unsupported { operation, api }
    }

    /// Creates a [`DashboardError::Validation`] from any displayable reason.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates a [`DashboardError::Decode`] from a parser error.
    pub fn decode(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            context,
            message: err.to_string(),
        }
    }

    /// Returns `true` if the bound driver cannot perform the operation.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns `true` if the backend rejected the credential.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if manifest content was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result alias used throughout the dashboard crates.
pub type DashboardResult<T> = Result<T, DashboardError>;
