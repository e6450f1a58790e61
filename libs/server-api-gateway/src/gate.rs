//! Minimum server version checks for individual operations.
//!
//! An operation declares its minimum once, where it is defined:
//!
//! ```no_run
//! use std::sync::LazyLock;
//! use server_api_gateway::{ApiGate, Endpoint, GatewayError, RawResponse};
//!
//! static POPULATE_PREVIEW: LazyLock<ApiGate> =
//!     LazyLock::new(|| ApiGate::new("2.5").unwrap_or_else(|e| panic!("{e}")));
//!
//! fn populate_preview(endpoint: &Endpoint, view_url: &str) -> Result<RawResponse, GatewayError> {
//!     POPULATE_PREVIEW.call(endpoint.server(), || {
//!         endpoint.get_request(&format!("{view_url}/previewImage"), None, None)
//!     })
//! }
//! ```

use crate::endpoint::Endpoint;
use crate::error::{EndpointUnavailableError, GatewayError};
use crate::session::ServerContext;
use crate::version::{ApiVersion, VersionParseError};

/// Rejects calls when the connected server is older than `minimum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGate {
    minimum: ApiVersion,
}

impl ApiGate {
    /// # Errors
    /// Returns [`VersionParseError`] when `minimum` is not a dotted version.
    pub fn new(minimum: &str) -> Result<Self, VersionParseError> {
        Ok(Self {
            minimum: ApiVersion::parse(minimum)?,
        })
    }

    #[must_use]
    pub fn minimum(&self) -> &ApiVersion {
        &self.minimum
    }

    /// Compare the server's current version against the minimum.
    ///
    /// # Errors
    /// [`GatewayError::EndpointUnavailable`] when the server is too old,
    /// [`GatewayError::InvalidVersion`] when its version does not parse.
    pub fn check(&self, server: &ServerContext) -> Result<(), GatewayError> {
        let server_version = ApiVersion::parse(&server.version())?;
        if server_version < self.minimum {
            return Err(EndpointUnavailableError {
                server_version: server_version.to_string(),
                minimum_version: self.minimum.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Run `op` once if the server is new enough; `op` is untouched otherwise.
    ///
    /// # Errors
    /// The gate's own error, or whatever `op` returns.
    pub fn call<T, E, F>(&self, server: &ServerContext, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<GatewayError>,
    {
        self.check(server)?;
        op()
    }

    /// Wrap an endpoint operation so every invocation is checked first.
    pub fn guard<A, T, E, F>(self, op: F) -> impl Fn(&Endpoint, A) -> Result<T, E>
    where
        F: Fn(&Endpoint, A) -> Result<T, E>,
        E: From<GatewayError>,
    {
        move |endpoint: &Endpoint, args: A| {
            self.check(endpoint.server())?;
            op(endpoint, args)
        }
    }
}

/// One-shot form of [`ApiGate::call`].
///
/// # Errors
/// [`GatewayError::InvalidVersion`] when `minimum` does not parse, otherwise
/// as [`ApiGate::call`].
pub fn api<T, E, F>(server: &ServerContext, minimum: &str, op: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<GatewayError>,
{
    let gate = ApiGate::new(minimum).map_err(GatewayError::from)?;
    gate.call(server, op)
}
