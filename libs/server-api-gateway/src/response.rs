use std::borrow::Cow;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// Raw transport result handed back to the caller for payload parsing.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    encoding: Option<String>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            encoding: None,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Declare the text encoding of the body. `None` marks it as binary.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Option<String>) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Decode the body using the declared encoding.
    ///
    /// Returns `None` when no encoding was declared; the bytes are never
    /// guessed at. Latin-1 maps bytes to code points directly, anything else
    /// is decoded as UTF-8 with replacement characters.
    #[must_use]
    pub fn text(&self) -> Option<Cow<'_, str>> {
        let encoding = self.encoding.as_deref()?;
        if is_latin1(encoding) {
            Some(Cow::Owned(self.body.iter().map(|&b| char::from(b)).collect()))
        } else {
            Some(String::from_utf8_lossy(&self.body))
        }
    }
}

fn is_latin1(encoding: &str) -> bool {
    ["iso-8859-1", "latin1", "latin-1", "iso8859-1"]
        .iter()
        .any(|name| encoding.eq_ignore_ascii_case(name))
}
