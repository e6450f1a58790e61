use std::time::Duration;

/// Transport-level parameters for a request.
///
/// The session carries one set shared by every call; a caller may pass
/// another set for a single call. [`TransportOptions::merged_with_session`]
/// combines the two.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Total request timeout.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Proxy URL applied to every scheme.
    pub proxy: Option<String>,
    /// `Some(false)` disables certificate verification.
    pub verify_tls: Option<bool>,
    /// Extra query pairs appended to the URL by the transport.
    pub query: Vec<(String, String)>,
}

impl TransportOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    #[must_use]
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Apply the session-wide options on top of these caller options.
    ///
    /// Session values win on collision. Caller values survive only for the
    /// fields the session leaves unset. Query pairs are merged by key: a
    /// session pair drops every caller pair with the same key, and the
    /// remaining caller pairs keep their order ahead of the session pairs.
    #[must_use]
    pub fn merged_with_session(self, session: &TransportOptions) -> TransportOptions {
        let mut query: Vec<(String, String)> = self
            .query
            .into_iter()
            .filter(|(key, _)| !session.query.iter().any(|(k, _)| k == key))
            .collect();
        query.extend(session.query.iter().cloned());

        TransportOptions {
            timeout: session.timeout.or(self.timeout),
            connect_timeout: session.connect_timeout.or(self.connect_timeout),
            proxy: session.proxy.clone().or(self.proxy),
            verify_tls: session.verify_tls.or(self.verify_tls),
            query,
        }
    }
}
