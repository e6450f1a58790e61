use http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::GatewayError;

/// Header carrying the session token.
pub const AUTH_HEADER: &str = "x-tableau-auth";
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Build the headers shared by every request.
///
/// An empty token is treated as absent. With neither input the map is empty,
/// which is what sign-in and other pre-session calls send.
///
/// # Errors
/// Returns [`GatewayError::InvalidHeader`] when a value cannot be carried in
/// an HTTP header. The token itself is never part of the error.
pub fn make_common_headers(
    auth_token: Option<&str>,
    content_type: Option<&str>,
) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
        let mut value =
            HeaderValue::from_str(token).map_err(|_| GatewayError::InvalidHeader(AUTH_HEADER))?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(AUTH_HEADER), value);
    }

    if let Some(content_type) = content_type {
        let value = HeaderValue::from_str(content_type)
            .map_err(|_| GatewayError::InvalidHeader(CONTENT_TYPE_HEADER))?;
        headers.insert(HeaderName::from_static(CONTENT_TYPE_HEADER), value);
    }

    Ok(headers)
}
