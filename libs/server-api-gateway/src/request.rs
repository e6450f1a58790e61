use bytes::Bytes;
use http::Method;
use secrecy::SecretString;

use crate::options::TransportOptions;

/// Rewrites a URL to carry its own query parameters (paging, filters, ...).
///
/// The gateway only invokes the rewrite and never looks at what was added.
pub trait QueryParams {
    fn apply_query_params(&self, url: &str) -> String;
}

/// One logical request, built per call and consumed by the dispatcher.
#[derive(Debug)]
pub struct RequestSpec<'a> {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) body: Option<Bytes>,
    pub(crate) content_type: Option<&'a str>,
    pub(crate) auth_token: Option<SecretString>,
    pub(crate) parameters: Option<TransportOptions>,
    pub(crate) request_object: Option<&'a dyn QueryParams>,
}

impl<'a> RequestSpec<'a> {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            content_type: None,
            auth_token: None,
            parameters: None,
            request_object: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: Option<SecretString>) -> Self {
        self.auth_token = token;
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Option<TransportOptions>) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_request_object(mut self, request_object: Option<&'a dyn QueryParams>) -> Self {
        self.request_object = request_object;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for dyn QueryParams + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QueryParams(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PageOptions {
        page_number: u32,
    }

    impl QueryParams for PageOptions {
        fn apply_query_params(&self, url: &str) -> String {
            format!("{url}?pageNumber={}", self.page_number)
        }
    }

    #[test]
    fn test_builder_keeps_inputs() {
        let paging = PageOptions { page_number: 3 };
        let spec = RequestSpec::new(Method::PUT, "http://srv/api/2.3/sites")
            .with_body("<tsRequest/>")
            .with_content_type("text/xml")
            .with_request_object(Some(&paging as &dyn QueryParams));

        assert_eq!(spec.method(), &Method::PUT);
        assert_eq!(spec.url(), "http://srv/api/2.3/sites");
        assert_eq!(spec.body.as_deref(), Some(b"<tsRequest/>".as_slice()));
        assert_eq!(spec.content_type, Some("text/xml"));
        assert!(spec.auth_token.is_none());
        let rewritten = spec
            .request_object
            .map(|q| q.apply_query_params(spec.url()));
        assert_eq!(
            rewritten.as_deref(),
            Some("http://srv/api/2.3/sites?pageNumber=3")
        );
    }
}
