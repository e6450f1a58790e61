//! Authenticated request gateway for server REST API clients.
//!
//! Resource endpoints build URLs and payloads; this crate turns them into
//! transport calls with the session token and content type attached, checks
//! the status, converts server error documents into [`ServerResponseError`]
//! and gates operations behind a minimum server version.
//!
//! ```no_run
//! use std::sync::Arc;
//! use secrecy::SecretString;
//! use server_api_gateway::{
//!     Endpoint, ReqwestTransport, ServerConfig, ServerContext, api,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load(None)?;
//! let transport = Arc::new(ReqwestTransport::new(&config.transport_options())?);
//! let server = Arc::new(ServerContext::from_config(&config, transport));
//! server.sign_in(SecretString::from("token".to_owned()), "site-id", None);
//!
//! let endpoint = Endpoint::new(server.clone());
//! let site_url = server.site_url().unwrap_or_default();
//! let views = api(endpoint.server(), "2.3", || {
//!     endpoint.get_request(&format!("{site_url}/views"), None, None)
//! })?;
//! println!("{} bytes", views.body().len());
//! # Ok(())
//! # }
//! ```

mod config;
mod endpoint;
mod error;
mod gate;
mod headers;
mod options;
mod reqwest_transport;
mod request;
mod response;
mod server_error;
mod session;
mod transport;
mod version;

pub use config::{ConfigError, ENV_PREFIX, HttpOptionsConfig, ServerConfig};
pub use endpoint::{DEFAULT_CONTENT_TYPE, Endpoint, SUCCESS_CODES};
pub use error::{EndpointUnavailableError, GatewayError, TransportError};
pub use gate::{ApiGate, api};
pub use headers::{AUTH_HEADER, CONTENT_TYPE_HEADER, make_common_headers};
pub use options::TransportOptions;
pub use reqwest_transport::ReqwestTransport;
pub use request::{QueryParams, RequestSpec};
pub use response::RawResponse;
pub use server_error::ServerResponseError;
pub use session::{DEFAULT_API_VERSION, ServerContext};
pub use transport::{Transport, TransportRequest};
pub use version::{ApiVersion, VersionParseError};

// Re-export commonly used types from dependencies
pub use http::{Method, StatusCode};
