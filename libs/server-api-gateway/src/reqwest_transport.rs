use http::HeaderMap;
use http::header::CONTENT_TYPE;
use reqwest::blocking::Client;
use url::Url;

use crate::error::TransportError;
use crate::options::TransportOptions;
use crate::response::RawResponse;
use crate::transport::{Transport, TransportRequest};

/// Encoding assumed for `text/*` bodies that name no charset.
const DEFAULT_TEXT_ENCODING: &str = "ISO-8859-1";

/// Blocking [`Transport`] backed by `reqwest`.
///
/// The client is built once from the session options. A request whose merged
/// options change proxy, TLS verification or connect timeout gets a one-off
/// client; the total timeout is applied per request.
///
/// Must not be called from inside an async runtime worker thread.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    defaults: TransportOptions,
}

impl ReqwestTransport {
    /// # Errors
    /// Returns [`TransportError::Build`] for an invalid proxy URL or when the
    /// TLS backend cannot be initialised.
    pub fn new(options: &TransportOptions) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(options)?,
            defaults: options.clone(),
        })
    }

    fn client_for(&self, options: &TransportOptions) -> Result<Client, TransportError> {
        if options.proxy == self.defaults.proxy
            && options.verify_tls == self.defaults.verify_tls
            && options.connect_timeout == self.defaults.connect_timeout
        {
            Ok(self.client.clone())
        } else {
            build_client(options)
        }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
            options,
        } = request;

        let url = with_query(&url, &options.query)?;
        let client = self.client_for(&options)?;

        let mut builder = client.request(method, url).headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder.send().map_err(TransportError::from_reqwest)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let encoding = response_encoding(&headers);
        let body = resp.bytes().map_err(TransportError::from_reqwest)?;

        Ok(RawResponse::new(status, body)
            .with_headers(headers)
            .with_encoding(encoding))
    }
}

fn build_client(options: &TransportOptions) -> Result<Client, TransportError> {
    let mut builder = Client::builder();
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = options.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(proxy) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| TransportError::Build(format!("Invalid proxy '{proxy}': {e}")))?;
        builder = builder.proxy(proxy);
    }
    if options.verify_tls == Some(false) {
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder
        .build()
        .map_err(|e| TransportError::Build(e.to_string()))
}

fn with_query(url: &str, query: &[(String, String)]) -> Result<Url, TransportError> {
    let mut parsed =
        Url::parse(url).map_err(|e| TransportError::Build(format!("Invalid URL '{url}': {e}")))?;
    if !query.is_empty() {
        parsed
            .query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(parsed)
}

/// Text encoding declared by the response, if any.
///
/// The `charset` parameter wins; `text/*` without one falls back to Latin-1.
/// Everything else is treated as binary.
fn response_encoding(headers: &HeaderMap) -> Option<String> {
    let mime: mime::Mime = headers.get(CONTENT_TYPE)?.to_str().ok()?.parse().ok()?;
    if let Some(charset) = mime.get_param(mime::CHARSET) {
        return Some(charset.as_str().to_owned());
    }
    (mime.type_() == mime::TEXT).then(|| DEFAULT_TEXT_ENCODING.to_owned())
}
