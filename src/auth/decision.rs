// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication decision.
//!
//! ## Branches
//!
//! Evaluated in order, first match wins:
//!
//! 1. **Callback**: `POST` with a `username` query parameter. The authority
//!    posts the token in the form body after interactive login.
//! 2. **Cookies**: both session cookies present.
//! 3. **Login**: no credentials; send the browser to the authority.
//!
//! The no-redirect variant only evaluates the cookie branch and forbids
//! everything else.

use std::future::Future;
use std::time::Duration;

use axum::http::Method;
use tracing::{debug, info};

use super::cookies::{self, DEFAULT_COOKIE_TTL};
use super::error::AuthError;
use super::redirect::{self, AuthorityHosts, AuthorityVariant, USERNAME_PARAM};
use super::validator::TokenValidator;

/// Header selecting the authority endpoint variant.
pub const VERSION_HEADER: &str = "x-s3o-version";

/// Value of [`VERSION_HEADER`] that selects the alternate endpoint.
pub const ALTERNATE_VERSION: &str = "v4";

/// Header carrying the calling system's identifier.
pub const SYSTEM_CODE_HEADER: &str = "x-s3o-systemcode";

/// Header set by TLS-terminating proxies.
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// What the gate needs from an inbound request.
///
/// Implemented by the framework adapter; see
/// [`middleware`](super::middleware) for axum.
pub trait GateRequest {
    fn method(&self) -> &Method;

    /// Host name without port.
    fn hostname(&self) -> &str;

    /// Host as the browser sent it, port included.
    fn host(&self) -> &str;

    /// Path and query of the request as received.
    fn original_url(&self) -> &str;

    /// Scheme of the connection to this server (`http` or `https`).
    fn connection_scheme(&self) -> &str;

    fn header(&self, name: &str) -> Option<&str>;

    /// Decoded cookie value; empty cookies are `None`.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Host application override of the session cookie lifetime.
    fn cookie_ttl(&self) -> Option<Duration> {
        None
    }

    /// `token` field of the urlencoded form body.
    ///
    /// Only called on the callback branch.
    fn form_token(&mut self) -> impl Future<Output = Result<Option<String>, AuthError>> + Send;
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// HTML error page from the redirecting gate.
    AuthenticationError,
    /// Plain `Forbidden` from the no-redirect gate.
    Forbidden,
}

/// Terminal outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Valid session cookies; continue to the next handler.
    PassThrough { username: String },
    /// Valid callback; set the session cookies and redirect to `location`.
    Authenticated {
        username: String,
        token: String,
        max_age: Duration,
        location: String,
    },
    /// Invalid credentials; clear the session cookies.
    Rejected(Rejection),
    /// No credentials; redirect to the authority.
    NeedsLogin { redirect_url: String },
}

/// Gate settings chosen by the hosting application.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub authority: AuthorityHosts,
    pub cookie_ttl: Duration,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            authority: AuthorityHosts::default(),
            cookie_ttl: DEFAULT_COOKIE_TTL,
        }
    }
}

/// The authentication decision engine.
///
/// Built once at startup and shared across requests.
pub struct SsoGate {
    validator: TokenValidator,
    settings: GateSettings,
}

impl SsoGate {
    pub fn new(validator: TokenValidator, settings: GateSettings) -> Self {
        Self {
            validator,
            settings,
        }
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    /// Decide what to do with `request`.
    ///
    /// Errors only when the request body cannot be read; the caller should
    /// answer 500 without touching cookies.
    pub async fn decide<R: GateRequest + Send>(&self, request: &mut R) -> Result<Decision, AuthError> {
        if request.method() == Method::POST {
            if let Some(username) = redirect::query_param(request.original_url(), USERNAME_PARAM) {
                return self.decide_callback(request, username).await;
            }
        }

        let request = &*request;
        if let Some((username, token)) = session_cookies(request) {
            debug!(username = %username, "Found session cookies");
            return Ok(self.decide_cookies(
                request,
                username,
                &token,
                Rejection::AuthenticationError,
            ));
        }

        Ok(self.login_redirect(request))
    }

    /// Decide for API callers, never redirecting.
    pub fn decide_no_redirect<R: GateRequest>(&self, request: &R) -> Decision {
        match session_cookies(request) {
            Some((username, token)) => {
                self.decide_cookies(request, username, &token, Rejection::Forbidden)
            }
            None => {
                debug!("No session cookies on no-redirect route");
                Decision::Rejected(Rejection::Forbidden)
            }
        }
    }

    async fn decide_callback<R: GateRequest + Send>(
        &self,
        request: &mut R,
        username: String,
    ) -> Result<Decision, AuthError> {
        debug!(username = %username, "Found callback username parameter");

        let Some(token) = request.form_token().await? else {
            info!(username = %username, "Callback without token, rejecting");
            return Ok(Decision::Rejected(Rejection::AuthenticationError));
        };

        if !self
            .validator
            .authenticate(&username, request.hostname(), &token)
        {
            info!(username = %username, host = %request.hostname(), "Callback token rejected");
            return Ok(Decision::Rejected(Rejection::AuthenticationError));
        }

        let location = redirect::strip_username(request.original_url());
        info!(username = %username, location = %location, "Callback authenticated, redirecting");

        Ok(Decision::Authenticated {
            username,
            max_age: request.cookie_ttl().unwrap_or(self.settings.cookie_ttl),
            token,
            location,
        })
    }

    fn decide_cookies<R: GateRequest>(
        &self,
        request: &R,
        username: String,
        token: &str,
        rejection: Rejection,
    ) -> Decision {
        if self
            .validator
            .authenticate(&username, request.hostname(), token)
        {
            debug!(username = %username, "Session cookies valid");
            Decision::PassThrough { username }
        } else {
            info!(username = %username, host = %request.hostname(), "Session cookies rejected");
            Decision::Rejected(rejection)
        }
    }

    fn login_redirect<R: GateRequest>(&self, request: &R) -> Decision {
        let protocol = redirect::external_protocol(
            request.header(FORWARDED_PROTO_HEADER),
            request.connection_scheme(),
        );
        let original = format!("{protocol}://{}{}", request.host(), request.original_url());

        let variant = match request.header(VERSION_HEADER) {
            Some(ALTERNATE_VERSION) => AuthorityVariant::Alternate,
            _ => AuthorityVariant::Primary,
        };

        let redirect_url = redirect::login_url(
            &self.settings.authority,
            variant,
            request.hostname(),
            &original,
            request.header(SYSTEM_CODE_HEADER),
        );
        debug!(redirect_url = %redirect_url, "No credentials, redirecting to login");

        Decision::NeedsLogin { redirect_url }
    }
}

fn session_cookies<R: GateRequest>(request: &R) -> Option<(String, String)> {
    let username = request.cookie(cookies::USERNAME_COOKIE)?;
    let token = request.cookie(cookies::TOKEN_COOKIE)?;
    Some((username, token))
}
