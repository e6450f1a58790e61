use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use secrecy::ExposeSecret;

use crate::error::GatewayError;
use crate::headers::make_common_headers;
use crate::options::TransportOptions;
use crate::request::{QueryParams, RequestSpec};
use crate::response::RawResponse;
use crate::server_error::ServerResponseError;
use crate::session::ServerContext;
use crate::transport::TransportRequest;

/// Status codes treated as success, whatever the verb.
pub const SUCCESS_CODES: [u16; 3] = [200, 201, 204];

/// Content type of write requests unless the caller overrides it.
pub const DEFAULT_CONTENT_TYPE: &str = "text/xml";

/// Request gateway shared by all resource endpoints of one client.
///
/// Resource endpoints hold one of these and call the verb methods with
/// URLs built from [`ServerContext::baseurl`]. Responses come back raw;
/// payload parsing stays with the caller.
#[derive(Debug, Clone)]
pub struct Endpoint {
    parent_srv: Arc<ServerContext>,
}

impl Endpoint {
    pub fn new(parent_srv: Arc<ServerContext>) -> Self {
        Self { parent_srv }
    }

    #[must_use]
    pub fn server(&self) -> &ServerContext {
        &self.parent_srv
    }

    /// GET without the session token, for calls made before sign-in.
    ///
    /// # Errors
    /// Returns [`GatewayError`] on transport failure or a non-success status.
    pub fn get_unauthenticated_request(
        &self,
        url: &str,
        request_object: Option<&dyn QueryParams>,
    ) -> Result<RawResponse, GatewayError> {
        self.make_request(RequestSpec::new(Method::GET, url).with_request_object(request_object))
    }

    /// GET with the session token.
    ///
    /// # Errors
    /// Returns [`GatewayError`] on transport failure or a non-success status.
    pub fn get_request(
        &self,
        url: &str,
        request_object: Option<&dyn QueryParams>,
        parameters: Option<TransportOptions>,
    ) -> Result<RawResponse, GatewayError> {
        self.make_request(
            RequestSpec::new(Method::GET, url)
                .with_auth_token(self.parent_srv.auth_token())
                .with_request_object(request_object)
                .with_parameters(parameters),
        )
    }

    /// DELETE with the session token. Any response body is dropped.
    ///
    /// # Errors
    /// Returns [`GatewayError`] on transport failure or a non-success status.
    pub fn delete_request(&self, url: &str) -> Result<(), GatewayError> {
        self.make_request(
            RequestSpec::new(Method::DELETE, url).with_auth_token(self.parent_srv.auth_token()),
        )?;
        Ok(())
    }

    /// PUT a pre-serialized payload. `None` content type means `text/xml`.
    ///
    /// # Errors
    /// Returns [`GatewayError`] on transport failure or a non-success status.
    pub fn put_request(
        &self,
        url: &str,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> Result<RawResponse, GatewayError> {
        self.write_request(Method::PUT, url, body.into(), content_type)
    }

    /// POST a pre-serialized payload. `None` content type means `text/xml`.
    ///
    /// # Errors
    /// Returns [`GatewayError`] on transport failure or a non-success status.
    pub fn post_request(
        &self,
        url: &str,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> Result<RawResponse, GatewayError> {
        self.write_request(Method::POST, url, body.into(), content_type)
    }

    fn write_request(
        &self,
        method: Method,
        url: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<RawResponse, GatewayError> {
        self.make_request(
            RequestSpec::new(method, url)
                .with_body(body)
                .with_content_type(content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
                .with_auth_token(self.parent_srv.auth_token()),
        )
    }

    /// Dispatch a request built by the caller.
    ///
    /// The verb methods all go through here. Use it directly for verbs or
    /// header combinations they do not cover; the token is only attached if
    /// the spec carries one.
    ///
    /// # Errors
    /// Returns [`GatewayError`] on an invalid header value, transport failure
    /// or a non-success status.
    pub fn make_request(&self, spec: RequestSpec<'_>) -> Result<RawResponse, GatewayError> {
        let RequestSpec {
            method,
            url,
            body,
            content_type,
            auth_token,
            parameters,
            request_object,
        } = spec;

        let url = match request_object {
            Some(query) => query.apply_query_params(&url),
            None => url,
        };

        let options = parameters
            .unwrap_or_default()
            .merged_with_session(self.parent_srv.http_options());

        let headers = make_common_headers(
            auth_token.as_ref().map(ExposeSecret::expose_secret),
            content_type,
        )?;

        tracing::debug!(%method, %url, "Sending request");

        let response = self.parent_srv.transport().send(TransportRequest {
            method,
            url: url.clone(),
            headers,
            body,
            options,
        })?;

        check_status(&response)?;
        log_response(&url, &response);

        Ok(response)
    }
}

fn check_status(response: &RawResponse) -> Result<(), ServerResponseError> {
    if SUCCESS_CODES.contains(&response.status().as_u16()) {
        Ok(())
    } else {
        Err(ServerResponseError::from_response(
            response.status(),
            response.body(),
        ))
    }
}

// Binary payloads (images, exports) carry no encoding and are never decoded.
fn log_response(url: &str, response: &RawResponse) {
    if let Some(text) = response.text() {
        tracing::debug!("Server response from {url}: {text}");
    }
}
