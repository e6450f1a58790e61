use thiserror::Error;

use crate::server_error::ServerResponseError;
use crate::version::VersionParseError;

/// Failure raised by the transport before any status could be checked.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Request build error: {0}")]
    Build(String),

    #[error("Reqwest error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    /// Classify a reqwest failure the same way for every verb.
    #[must_use]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// The connected server is older than the operation requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("This endpoint is not available in API version {server_version}. Requires {minimum_version}")]
pub struct EndpointUnavailableError {
    pub server_version: String,
    pub minimum_version: String,
}

/// Everything a gateway call can fail with.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    ServerResponse(#[from] ServerResponseError),

    #[error(transparent)]
    EndpointUnavailable(#[from] EndpointUnavailableError),

    #[error("Invalid API version: {0}")]
    InvalidVersion(#[from] VersionParseError),

    #[error("Invalid value for header '{0}'")]
    InvalidHeader(&'static str),
}

impl GatewayError {
    /// The parsed server error, when the failure came from a non-success status.
    #[must_use]
    pub fn as_server_response(&self) -> Option<&ServerResponseError> {
        match self {
            Self::ServerResponse(err) => Some(err),
            _ => None,
        }
    }
}
