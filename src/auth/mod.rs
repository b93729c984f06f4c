// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Single sign-on gate for browser and API routes.
//!
//! ## Auth Flow
//!
//! 1. Browser requests a protected page without credentials
//! 2. Gate redirects to the authority's login page
//! 3. Authority posts back to the original URL:
//!    - `username` in the query string
//!    - `token` in the urlencoded form body
//! 4. Gate verifies the token and sets two session cookies:
//!    - `s3o_username`
//!    - `s3o_token`
//! 5. Later requests carry the cookies and pass straight through
//!
//! ## Security
//!
//! - A token is an RSA PKCS#1 v1.5 / SHA-1 signature over `username-hostname`
//! - The authority's public key is fetched over HTTPS and refreshed periodically
//! - Validation fails closed until the first key is loaded
//! - Session cookies are `HttpOnly` and cleared on any failed validation

pub mod cookies;
pub mod decision;
pub mod error;
pub mod key_cache;
pub mod key_poller;
pub mod middleware;
pub mod public_key;
pub mod redirect;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use decision::{Decision, GateRequest, GateSettings, Rejection, SsoGate};
pub use error::AuthError;
pub use key_cache::KeyCache;
pub use key_poller::KeyPoller;
pub use middleware::{
    sso_gate, sso_gate_no_redirect, AuthenticatedUsername, ConnectionScheme, CookieTtl,
};
pub use public_key::SigningKey;
pub use redirect::AuthorityHosts;
pub use validator::TokenValidator;
