use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ServerConfig;
use crate::options::TransportOptions;
use crate::transport::Transport;

/// API version assumed until the server reports its own.
pub const DEFAULT_API_VERSION: &str = "2.3";

/// Session state shared by every endpoint of one client.
///
/// Token, site and version may change after construction (sign-in, version
/// negotiation). Each request takes a snapshot of them when it is
/// dispatched, so a concurrent sign-in is seen either fully or not at all.
pub struct ServerContext {
    server_address: String,
    version: RwLock<String>,
    auth: RwLock<AuthState>,
    http_options: TransportOptions,
    transport: Arc<dyn Transport>,
}

#[derive(Default)]
struct AuthState {
    token: Option<SecretString>,
    site_id: Option<String>,
    user_id: Option<String>,
}

impl ServerContext {
    pub fn new(server_address: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            server_address: server_address.into().trim_end_matches('/').to_owned(),
            version: RwLock::new(DEFAULT_API_VERSION.to_owned()),
            auth: RwLock::new(AuthState::default()),
            http_options: TransportOptions::default(),
            transport,
        }
    }

    /// Build a context from loaded configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig, transport: Arc<dyn Transport>) -> Self {
        let ctx = Self::new(config.server.clone(), transport)
            .with_http_options(config.transport_options());
        ctx.set_version(config.version.clone());
        ctx.auth.write().site_id.clone_from(&config.site_id);
        ctx
    }

    /// Replace the session-wide transport options.
    #[must_use]
    pub fn with_http_options(mut self, options: TransportOptions) -> Self {
        self.http_options = options;
        self
    }

    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    #[must_use]
    pub fn http_options(&self) -> &TransportOptions {
        &self.http_options
    }

    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// API version currently used for requests.
    #[must_use]
    pub fn version(&self) -> String {
        self.version.read().clone()
    }

    pub fn set_version(&self, version: impl Into<String>) {
        let version = version.into();
        tracing::debug!(%version, "API version set");
        *self.version.write() = version;
    }

    /// Snapshot of the current token, if signed in.
    #[must_use]
    pub fn auth_token(&self) -> Option<SecretString> {
        self.auth
            .read()
            .token
            .as_ref()
            .map(|token| SecretString::from(token.expose_secret().to_owned()))
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.auth.read().token.is_some()
    }

    #[must_use]
    pub fn site_id(&self) -> Option<String> {
        self.auth.read().site_id.clone()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.auth.read().user_id.clone()
    }

    /// Store the credentials returned by a successful sign-in.
    pub fn sign_in(&self, token: SecretString, site_id: impl Into<String>, user_id: Option<String>) {
        let site_id = site_id.into();
        tracing::info!(server = %self.server_address, %site_id, "Signed in");
        *self.auth.write() = AuthState {
            token: Some(token),
            site_id: Some(site_id),
            user_id,
        };
    }

    pub fn sign_out(&self) {
        tracing::info!(server = %self.server_address, "Signed out");
        *self.auth.write() = AuthState::default();
    }

    /// `{server}/api/{version}`
    #[must_use]
    pub fn baseurl(&self) -> String {
        format!("{}/api/{}", self.server_address, self.version.read())
    }

    /// `{baseurl}/sites/{site_id}`, once a site is known.
    #[must_use]
    pub fn site_url(&self) -> Option<String> {
        let site_id = self.site_id()?;
        Some(format!("{}/sites/{site_id}", self.baseurl()))
    }
}

impl fmt::Debug for ServerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = self.auth.read();
        f.debug_struct("ServerContext")
            .field("server_address", &self.server_address)
            .field("version", &*self.version.read())
            .field("signed_in", &auth.token.is_some())
            .field("site_id", &auth.site_id)
            .field("http_options", &self.http_options)
            .finish_non_exhaustive()
    }
}
