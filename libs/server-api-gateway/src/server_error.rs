use http::StatusCode;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Error reported by the server in a non-success response.
///
/// Built from the `<error>` element of the response document:
///
/// ```xml
/// <tsResponse xmlns="http://tableau.com/api">
///   <error code="401002">
///     <summary>Unauthorized Access</summary>
///     <detail>Invalid authentication credentials were provided.</detail>
///   </error>
/// </tsResponse>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {summary}\n\t{detail}")]
pub struct ServerResponseError {
    pub status: StatusCode,
    pub code: String,
    pub summary: String,
    pub detail: String,
    fallback: bool,
}

impl ServerResponseError {
    pub fn new(
        status: StatusCode,
        code: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            summary: summary.into(),
            detail: detail.into(),
            fallback: false,
        }
    }

    /// Parse a failed response body. Never fails.
    ///
    /// When the body is not a readable error document the result carries the
    /// numeric status as code, its reason phrase as summary and the raw body
    /// as detail.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if let Some(parsed) = parse_error_document(body) {
            return Self::new(status, parsed.code, parsed.summary, parsed.detail);
        }

        tracing::warn!(
            status = status.as_u16(),
            "Server error response could not be parsed, using raw body"
        );
        Self {
            status,
            code: status.as_u16().to_string(),
            summary: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_owned(),
            detail: String::from_utf8_lossy(body).into_owned(),
            fallback: true,
        }
    }

    /// Whether the body could not be parsed and the error was synthesized.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

#[derive(Default)]
struct ParsedError {
    code: String,
    summary: String,
    detail: String,
}

#[derive(Clone, Copy)]
enum Field {
    Summary,
    Detail,
}

impl ParsedError {
    fn push(&mut self, field: Field, value: &str) {
        match field {
            Field::Summary => self.summary.push_str(value),
            Field::Detail => self.detail.push_str(value),
        }
    }

    fn trimmed(self) -> Self {
        Self {
            code: self.code,
            summary: self.summary.trim().to_owned(),
            detail: self.detail.trim().to_owned(),
        }
    }
}

fn parse_error_document(body: &[u8]) -> Option<ParsedError> {
    let text = std::str::from_utf8(body).ok()?;
    let mut reader = Reader::from_str(text);

    let mut parsed: Option<ParsedError> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event().ok()? {
            Event::Start(start) => match (local_name(&start), parsed.is_some()) {
                (b"error", false) => {
                    parsed = Some(ParsedError {
                        code: code_attribute(&start)?,
                        ..ParsedError::default()
                    });
                }
                (b"summary", true) => field = Some(Field::Summary),
                (b"detail", true) => field = Some(Field::Detail),
                _ => {}
            },
            Event::Empty(start) if local_name(&start) == b"error" && parsed.is_none() => {
                return Some(ParsedError {
                    code: code_attribute(&start)?,
                    ..ParsedError::default()
                });
            }
            Event::Text(text) => {
                if let (Some(field), Some(error)) = (field, parsed.as_mut()) {
                    error.push(field, &text.unescape().ok()?);
                }
            }
            Event::CData(cdata) => {
                if let (Some(field), Some(error)) = (field, parsed.as_mut()) {
                    error.push(field, std::str::from_utf8(&cdata).ok()?);
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"summary" | b"detail" => field = None,
                b"error" if parsed.is_some() => return parsed.map(ParsedError::trimmed),
                _ => {}
            },
            Event::Eof => return None,
            _ => {}
        }
    }
}

fn local_name<'a>(start: &'a BytesStart<'_>) -> &'a [u8] {
    start.local_name().into_inner()
}

fn code_attribute(start: &BytesStart<'_>) -> Option<String> {
    start
        .attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.local_name().as_ref() == b"code")
        .and_then(|attr| attr.unescape_value().ok())
        .map(std::borrow::Cow::into_owned)
}
