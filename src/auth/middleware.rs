// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Wraps the [`SsoGate`] decision engine as `from_fn_with_state` middleware:
//!
//! ```rust,ignore
//! let gate = Arc::new(SsoGate::new(validator, GateSettings::default()));
//!
//! let app = Router::new()
//!     .route("/", get(index))
//!     .route_layer(axum::middleware::from_fn_with_state(gate.clone(), sso_gate))
//!     .merge(
//!         Router::new()
//!             .route("/api/whoami", get(whoami))
//!             .route_layer(axum::middleware::from_fn_with_state(gate, sso_gate_no_redirect)),
//!     );
//! ```
//!
//! Handlers behind either gate can read [`AuthenticatedUsername`] from the
//! request extensions.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{OriginalUri, Request, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, EXPIRES, HOST, LOCATION, PRAGMA, SET_COOKIE},
        response::Builder,
        Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;
use url::form_urlencoded;

use super::cookies;
use super::decision::{Decision, GateRequest, Rejection, SsoGate};
use super::error::AuthError;

/// Largest callback form body accepted.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

/// Body of the redirecting gate's 403 response.
pub const AUTHENTICATION_ERROR_PAGE: &str =
    "<h1>Authentication error.</h1><p>For access, please log in with your FT account</p>";

/// Body of the no-redirect gate's 403 response.
pub const FORBIDDEN_BODY: &str = "Forbidden";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const TOKEN_FIELD: &str = "token";

/// Scheme of the connection to this server.
///
/// Insert as a request extension when serving TLS directly; plain HTTP is
/// assumed otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionScheme {
    Http,
    Https,
}

impl ConnectionScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionScheme::Http => "http",
            ConnectionScheme::Https => "https",
        }
    }
}

/// Per-request override of the session cookie lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieTtl(pub Duration);

/// Username of the authenticated caller, set on pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUsername(pub String);

/// Redirecting gate for browser routes.
pub async fn sso_gate(State(gate): State<Arc<SsoGate>>, request: Request, next: Next) -> Response {
    let mut gate_request = AxumGateRequest::new(request);

    match gate.decide(&mut gate_request).await {
        Ok(Decision::PassThrough { username }) => {
            pass_through(gate_request.into_inner(), username, next).await
        }
        Ok(Decision::Authenticated {
            username,
            token,
            max_age,
            location,
        }) => {
            let builder = redirect(&location);
            cookies::session_cookies(&username, &token, max_age)
                .into_iter()
                .fold(builder, |builder, cookie| builder.header(SET_COOKIE, cookie))
                .body(Body::empty())
                .unwrap_or_else(build_failure)
        }
        Ok(Decision::Rejected(rejection)) => rejected(rejection),
        Ok(Decision::NeedsLogin { redirect_url }) => redirect(&redirect_url)
            .body(Body::empty())
            .unwrap_or_else(build_failure),
        Err(e) => {
            warn!(error = %e, "Authentication aborted");
            e.into_response()
        }
    }
}

/// Non-redirecting gate for API routes.
pub async fn sso_gate_no_redirect(
    State(gate): State<Arc<SsoGate>>,
    request: Request,
    next: Next,
) -> Response {
    let gate_request = AxumGateRequest::new(request);

    match gate.decide_no_redirect(&gate_request) {
        Decision::PassThrough { username } => {
            pass_through(gate_request.into_inner(), username, next).await
        }
        _ => rejected(Rejection::Forbidden),
    }
}

async fn pass_through(mut request: Request, username: String, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(AuthenticatedUsername(username));
    next.run(request).await
}

/// Redirect with caching disabled.
fn redirect(location: &str) -> Builder {
    axum::http::Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, location)
        .header(CACHE_CONTROL, "private, no-cache, no-store, must-revalidate")
        .header(PRAGMA, "no-cache")
        .header(EXPIRES, "0")
}

fn rejected(rejection: Rejection) -> Response {
    let (content_type, body) = match rejection {
        Rejection::AuthenticationError => ("text/html; charset=utf-8", AUTHENTICATION_ERROR_PAGE),
        Rejection::Forbidden => ("text/plain; charset=utf-8", FORBIDDEN_BODY),
    };

    cookies::cleared_cookies()
        .into_iter()
        .fold(
            axum::http::Response::builder()
                .status(StatusCode::FORBIDDEN)
                .header(CONTENT_TYPE, content_type),
            |builder, cookie| builder.header(SET_COOKIE, cookie),
        )
        .body(Body::from(body))
        .unwrap_or_else(build_failure)
}

fn build_failure(e: axum::http::Error) -> Response {
    AuthError::Internal(format!("failed to build response: {e}")).into_response()
}

/// [`GateRequest`] over an axum request.
struct AxumGateRequest {
    request: Request,
    host: String,
    original_url: String,
    scheme: &'static str,
}

impl AxumGateRequest {
    fn new(request: Request) -> Self {
        let host = request
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| request.uri().authority().map(|a| a.to_string()))
            .unwrap_or_default();

        let uri = request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(request.uri());
        let original_url = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let scheme = match request.extensions().get::<ConnectionScheme>() {
            Some(scheme) => scheme.as_str(),
            None if request.uri().scheme_str() == Some("https") => "https",
            None => "http",
        };

        Self {
            request,
            host,
            original_url,
            scheme,
        }
    }

    fn into_inner(self) -> Request {
        self.request
    }
}

impl GateRequest for AxumGateRequest {
    fn method(&self) -> &Method {
        self.request.method()
    }

    fn hostname(&self) -> &str {
        strip_port(&self.host)
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn original_url(&self) -> &str {
        &self.original_url
    }

    fn connection_scheme(&self) -> &str {
        self.scheme
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let headers = self
            .request
            .headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok());
        cookies::find(headers, name)
    }

    fn cookie_ttl(&self) -> Option<Duration> {
        self.request.extensions().get::<CookieTtl>().map(|ttl| ttl.0)
    }

    async fn form_token(&mut self) -> Result<Option<String>, AuthError> {
        let is_form = self
            .header(CONTENT_TYPE.as_str())
            .and_then(|v| v.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE));
        if !is_form {
            return Ok(None);
        }

        let body = std::mem::take(self.request.body_mut());
        let bytes = to_bytes(body, MAX_FORM_BYTES)
            .await
            .map_err(|e| AuthError::BodyRead(e.to_string()))?;

        // The body stays consumed: the callback branch always answers
        // without forwarding the request.
        let token = form_urlencoded::parse(&bytes)
            .find(|(key, value)| key == TOKEN_FIELD && !value.is_empty())
            .map(|(_, value)| value.into_owned());

        Ok(token)
    }
}

/// Host name without port; bracketed IPv6 literals keep their brackets.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::decision::GateSettings;
    use crate::auth::fixtures::{loaded_cache, TOKEN_TEST_EXAMPLE_COM, TOKEN_TEST_LOCALHOST};
    use crate::auth::TokenValidator;
    use axum::{http, routing::get, Extension, Router};
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthenticatedUsername>) -> String {
        format!("hello {}", user.0)
    }

    fn app() -> Router {
        app_with(GateSettings::default())
    }

    fn app_with(settings: GateSettings) -> Router {
        let gate = Arc::new(SsoGate::new(TokenValidator::new(loaded_cache()), settings));

        let browser = Router::new()
            .route("/secure", get(whoami).post(whoami))
            .route_layer(axum::middleware::from_fn_with_state(gate.clone(), sso_gate));
        let api = Router::new()
            .route("/api/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(gate, sso_gate_no_redirect));

        browser.merge(api)
    }

    fn session_cookie(username: &str, token: &str) -> String {
        let token: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();
        format!("s3o_username={username}; s3o_token={token}")
    }

    fn callback(uri: &str, token: &str) -> Request {
        let body: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", token)
            .finish();
        http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(HOST, "localhost")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(body))
            .unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn assert_no_cache(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[CACHE_CONTROL], "private, no-cache, no-store, must-revalidate");
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "0");
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn valid_cookies_reach_handler_without_cache_headers() {
        let request = http::Request::builder()
            .uri("/secure")
            .header(HOST, "localhost:8080")
            .header(COOKIE, session_cookie("test", TOKEN_TEST_LOCALHOST))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CACHE_CONTROL).is_none());
        assert!(response.headers().get(PRAGMA).is_none());
        assert!(response.headers().get(EXPIRES).is_none());
        assert!(set_cookies(&response).is_empty());
        assert_eq!(body_text(response).await, "hello test");
    }

    #[tokio::test]
    async fn invalid_cookies_are_cleared_with_error_page() {
        let request = http::Request::builder()
            .uri("/secure")
            .header(HOST, "localhost")
            .header(COOKIE, session_cookie("test", TOKEN_TEST_EXAMPLE_COM))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(LOCATION).is_none());
        let cleared = set_cookies(&response);
        assert_eq!(cleared.len(), 2);
        assert!(cleared[0].starts_with("s3o_username=;"));
        assert!(cleared[1].starts_with("s3o_token=;"));
        assert_eq!(body_text(response).await, AUTHENTICATION_ERROR_PAGE);
    }

    #[tokio::test]
    async fn callback_sets_cookies_and_redirects_to_clean_url() {
        let response = app()
            .oneshot(callback("/secure?username=test&foo=bar", TOKEN_TEST_LOCALHOST))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/secure?foo=bar");
        assert_no_cache(&response);

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("s3o_username=test; Max-Age=28800; Path=/;"));
        assert!(cookies[1].starts_with("s3o_token="));
        assert!(cookies.iter().all(|c| c.ends_with("HttpOnly")));
    }

    #[tokio::test]
    async fn callback_honours_cookie_ttl_extension() {
        let mut request = callback("/secure?username=test", TOKEN_TEST_LOCALHOST);
        request
            .extensions_mut()
            .insert(CookieTtl(Duration::from_secs(900)));

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[LOCATION], "/secure");
        assert!(set_cookies(&response)
            .iter()
            .all(|c| c.contains("Max-Age=900;")));
    }

    #[tokio::test]
    async fn callback_with_far_future_ttl_still_redirects() {
        let ttl = Duration::from_secs(100_000_000_000_000);
        let settings = GateSettings {
            cookie_ttl: ttl,
            ..GateSettings::default()
        };

        let response = app_with(settings)
            .oneshot(callback("/secure?username=test", TOKEN_TEST_LOCALHOST))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/secure");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies
            .iter()
            .all(|c| c.contains(&format!("Max-Age={};", ttl.as_secs())) && !c.contains("Expires=")));
    }

    #[tokio::test]
    async fn callback_with_bad_token_is_forbidden() {
        let response = app()
            .oneshot(callback("/secure?username=test", "bogus"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(LOCATION).is_none());
        assert!(response.headers().get(CACHE_CONTROL).is_none());
        assert_eq!(set_cookies(&response).len(), 2);
        assert_eq!(body_text(response).await, AUTHENTICATION_ERROR_PAGE);
    }

    #[tokio::test]
    async fn callback_without_form_content_type_is_forbidden() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/secure?username=test")
            .header(HOST, "localhost")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(format!(r#"{{"token":"{TOKEN_TEST_LOCALHOST}"}}"#)))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn oversized_callback_body_is_internal_error() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/secure?username=test")
            .header(HOST, "localhost")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(vec![b'a'; MAX_FORM_BYTES + 1]))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(set_cookies(&response).is_empty());
        assert!(response.headers().get(LOCATION).is_none());
    }

    #[tokio::test]
    async fn missing_credentials_redirect_to_login() {
        let request = http::Request::builder()
            .uri("/secure?x=1")
            .header(HOST, "example.com")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_no_cache(&response);
        assert!(set_cookies(&response).is_empty());
        assert_eq!(
            response.headers()[LOCATION],
            "https://s3o.ft.com/v2/authenticate?post=true&host=example.com&redirect=https%3A%2F%2Fexample.com%2Fsecure%3Fx%3D1"
        );
    }

    #[tokio::test]
    async fn connection_scheme_extension_sets_protocol() {
        let mut request = http::Request::builder()
            .uri("/secure")
            .header(HOST, "example.com:8443")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectionScheme::Https);

        let response = app().oneshot(request).await.unwrap();

        let location = response.headers()[LOCATION].to_str().unwrap();
        assert!(location.contains("&host=example.com&"));
        assert!(location.ends_with("redirect=https%3A%2F%2Fexample.com%3A8443%2Fsecure"));
    }

    #[tokio::test]
    async fn no_redirect_gate_forbids_missing_cookies() {
        let request = http::Request::builder()
            .uri("/api/whoami")
            .header(HOST, "localhost")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(LOCATION).is_none());
        assert_eq!(set_cookies(&response).len(), 2);
        assert_eq!(body_text(response).await, FORBIDDEN_BODY);
    }

    #[tokio::test]
    async fn no_redirect_gate_ignores_callback() {
        let mut request = callback("/api/whoami?username=test", TOKEN_TEST_LOCALHOST);
        *request.method_mut() = Method::GET;

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(LOCATION).is_none());
    }

    #[tokio::test]
    async fn no_redirect_gate_passes_valid_cookies() {
        let request = http::Request::builder()
            .uri("/api/whoami")
            .header(HOST, "localhost")
            .header(COOKIE, session_cookie("test", TOKEN_TEST_LOCALHOST))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "hello test");
    }

    #[test]
    fn strips_ports() {
        assert_eq!(strip_port("localhost:3000"), "localhost");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port(""), "");
    }
}
