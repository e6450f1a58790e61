#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use secrecy::SecretString;
use server_api_gateway::{
    ApiGate, Endpoint, GatewayError, Method, RequestSpec, ReqwestTransport, ServerContext,
    StatusCode, TransportError, TransportOptions, api,
};

fn signed_in_endpoint(base_url: &str, options: TransportOptions) -> Endpoint {
    let transport = Arc::new(ReqwestTransport::new(&options).unwrap());
    let server = ServerContext::new(base_url, transport).with_http_options(options);
    server.set_version("3.4");
    server.sign_in(SecretString::from("tok-abc|123".to_owned()), "site-1", None);
    Endpoint::new(Arc::new(server))
}

#[test]
fn test_get_sends_token_and_merged_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/3.4/sites/site-1/views")
            .header("x-tableau-auth", "tok-abc|123")
            .query_param("fields", "_all_")
            .query_param("pageSize", "50");
        then.status(200)
            .header("content-type", "application/xml;charset=UTF-8")
            .body("<tsResponse><views/></tsResponse>");
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let site_url = endpoint.server().site_url().unwrap();
    let parameters = TransportOptions::default()
        .with_query("fields", "_all_")
        .with_query("pageSize", "50");

    let response = endpoint
        .get_request(&format!("{site_url}/views"), None, Some(parameters))
        .unwrap();

    mock.assert();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.encoding().is_some());
    assert_eq!(
        response.text().as_deref(),
        Some("<tsResponse><views/></tsResponse>")
    );
}

#[test]
fn test_post_defaults_to_text_xml() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/3.4/sites/site-1/projects")
            .header("content-type", "text/xml")
            .header("x-tableau-auth", "tok-abc|123")
            .body("<tsRequest><project name=\"p\"/></tsRequest>");
        then.status(201).body("<tsResponse><project id=\"1\"/></tsResponse>");
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let site_url = endpoint.server().site_url().unwrap();

    let response = endpoint
        .post_request(
            &format!("{site_url}/projects"),
            "<tsRequest><project name=\"p\"/></tsRequest>",
            None,
        )
        .unwrap();

    mock.assert();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.encoding().is_none());
}

#[test]
fn test_delete_returns_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/3.4/sites/site-1/users/u1");
        then.status(204);
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let site_url = endpoint.server().site_url().unwrap();

    endpoint
        .delete_request(&format!("{site_url}/users/u1"))
        .unwrap();

    mock.assert();
}

#[test]
fn test_error_document_becomes_server_response_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/api/3.4/sites/site-1/workbooks/w1");
        then.status(404)
            .header("content-type", "application/xml;charset=UTF-8")
            .body(
                r#"<tsResponse xmlns="http://tableau.com/api"><error code="404006"><summary>Resource Not Found</summary><detail>Workbook 'w1' could not be found.</detail></error></tsResponse>"#,
            );
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let site_url = endpoint.server().site_url().unwrap();

    let err = endpoint
        .put_request(&format!("{site_url}/workbooks/w1"), "<tsRequest/>", None)
        .unwrap_err();

    let server_err = err.as_server_response().unwrap();
    assert_eq!(server_err.status, StatusCode::NOT_FOUND);
    assert_eq!(server_err.code, "404006");
    assert_eq!(server_err.summary, "Resource Not Found");
    assert_eq!(server_err.detail, "Workbook 'w1' could not be found.");
    assert!(!server_err.is_fallback());
}

#[test]
fn test_html_error_page_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/3.4/serverinfo");
        then.status(503)
            .header("content-type", "text/html")
            .body("<html><body>Service Unavailable</body>");
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let url = format!("{}/serverinfo", endpoint.server().baseurl());

    let err = endpoint.get_unauthenticated_request(&url, None).unwrap_err();

    let server_err = err.as_server_response().unwrap();
    assert!(server_err.is_fallback());
    assert_eq!(server_err.code, "503");
    assert_eq!(server_err.detail, "<html><body>Service Unavailable</body>");
}

#[test]
fn test_connection_refused_is_a_transport_error() {
    let endpoint = signed_in_endpoint(
        "http://127.0.0.1:1",
        TransportOptions::default().with_connect_timeout(Duration::from_secs(2)),
    );
    let url = format!("{}/sites", endpoint.server().baseurl());

    let err = endpoint.get_request(&url, None, None).unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
}

#[test]
fn test_version_gate_blocks_before_network() {
    // Nothing listens here; a dispatched request would surface as a transport error.
    let endpoint = signed_in_endpoint("http://127.0.0.1:1", TransportOptions::default());
    let url = format!("{}/sites/site-1/flows", endpoint.server().baseurl());

    let result = api(endpoint.server(), "3.10", || endpoint.get_request(&url, None, None));

    match result {
        Err(GatewayError::EndpointUnavailable(err)) => {
            assert_eq!(err.server_version, "3.4");
            assert_eq!(err.minimum_version, "3.10");
        }
        other => panic!("expected EndpointUnavailable, got {other:?}"),
    }
}

#[test]
fn test_guarded_operation_passes_through() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/3.4/sites/site-1/flows");
        then.status(200).body("<tsResponse/>");
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let list_flows = ApiGate::new("3.3").unwrap().guard(|endpoint: &Endpoint, (): ()| {
        let site_url = endpoint.server().site_url().unwrap_or_default();
        endpoint.get_request(&format!("{site_url}/flows"), None, None)
    });

    let response = list_flows(&endpoint, ()).unwrap();

    mock.assert();
    assert_eq!(response.body().as_ref(), b"<tsResponse/>");
}

#[test]
fn test_transport_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/3.4/sites/site-1/slow");
        then.status(200).delay(Duration::from_secs(3));
    });

    let endpoint = signed_in_endpoint(
        &server.base_url(),
        TransportOptions::default().with_timeout(Duration::from_millis(200)),
    );
    let site_url = endpoint.server().site_url().unwrap();

    let err = endpoint
        .get_request(&format!("{site_url}/slow"), None, None)
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::Transport(TransportError::Timeout(_))
    ));
}

#[test]
fn test_custom_verb_through_make_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/3.4/sites/site-1/settings")
            .header("content-type", "application/json")
            .header("x-tableau-auth", "tok-abc|123")
            .body("{\"flowsEnabled\":true}");
        then.status(200);
    });

    let endpoint = signed_in_endpoint(&server.base_url(), TransportOptions::default());
    let site_url = endpoint.server().site_url().unwrap();
    let spec = RequestSpec::new(Method::PATCH, format!("{site_url}/settings"))
        .with_body("{\"flowsEnabled\":true}")
        .with_content_type("application/json")
        .with_auth_token(endpoint.server().auth_token());

    let response = endpoint.make_request(spec).unwrap();

    mock.assert();
    assert_eq!(response.status(), StatusCode::OK);
}
