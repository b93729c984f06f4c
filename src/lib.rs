// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SSO Gate - Single Sign-On Authentication Middleware
//!
//! Protects Axum routes behind an external sign-on authority. Browsers are
//! redirected to the authority to log in; the authority posts back a signed
//! token that the gate verifies against the authority's RSA public key and
//! exchanges for session cookies.
//!
//! ## Modules
//!
//! - `api` - Demo HTTP routes and health probes (Axum)
//! - `auth` - Key refresh, token validation and the gate middleware
//! - `config` - Environment configuration
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
