use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::error::TransportError;
use crate::options::TransportOptions;
use crate::response::RawResponse;

/// A fully assembled request, ready to go on the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub options: TransportOptions,
}

/// Injected HTTP client. Blocks until the server answers or the call fails.
///
/// Any status code is a successful send; status validation belongs to the
/// gateway.
pub trait Transport: Send + Sync {
    /// Send one request.
    ///
    /// # Errors
    /// Returns [`TransportError`] for connection, timeout and TLS failures.
    fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}
