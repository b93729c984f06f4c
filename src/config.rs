// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup; unparseable numbers fall back to their defaults.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SSO_PUBLIC_KEY_URL` | Authority public key endpoint | `https://s3o.ft.com/publickey` |
//! | `SSO_AUTHORITY_HOST` | Login redirect host | `s3o.ft.com` |
//! | `SSO_ALTERNATE_AUTHORITY_HOST` | Login redirect host for `x-s3o-version: v4` | `s3ov4.in.ft.com` |
//! | `SSO_KEY_REFRESH_SECS` | Seconds between key refreshes | `300` |
//! | `SSO_KEY_FETCH_ATTEMPTS` | Fetch attempts per refresh | `3` |
//! | `SSO_COOKIE_TTL_SECS` | Session cookie lifetime | `28800` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS with `TLS_KEY_PATH` | Optional |
//! | `TLS_KEY_PATH` | PEM private key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::cookies::DEFAULT_COOKIE_TTL;
use crate::auth::key_poller::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PUBLIC_KEY_URL, DEFAULT_REFRESH_INTERVAL};
use crate::auth::{AuthorityHosts, GateSettings};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PUBLIC_KEY_URL_ENV: &str = "SSO_PUBLIC_KEY_URL";
pub const AUTHORITY_HOST_ENV: &str = "SSO_AUTHORITY_HOST";
pub const ALTERNATE_AUTHORITY_HOST_ENV: &str = "SSO_ALTERNATE_AUTHORITY_HOST";
pub const KEY_REFRESH_SECS_ENV: &str = "SSO_KEY_REFRESH_SECS";
pub const KEY_FETCH_ATTEMPTS_ENV: &str = "SSO_KEY_FETCH_ATTEMPTS";
pub const COOKIE_TTL_SECS_ENV: &str = "SSO_COOKIE_TTL_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Environment variable selecting the log format.
///
/// `json` emits one JSON object per line; anything else is human readable.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Gate and key refresh settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub public_key_url: String,
    pub authority: AuthorityHosts,
    pub refresh_interval: Duration,
    pub fetch_attempts: u32,
    pub cookie_ttl: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_key_url: DEFAULT_PUBLIC_KEY_URL.to_string(),
            authority: AuthorityHosts::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_attempts: DEFAULT_MAX_ATTEMPTS,
            cookie_ttl: DEFAULT_COOKIE_TTL,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let seconds = |name: &str, default: Duration| {
            parsed(&lookup, name)
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            public_key_url: non_empty(&lookup, PUBLIC_KEY_URL_ENV)
                .unwrap_or(defaults.public_key_url),
            authority: AuthorityHosts {
                primary: non_empty(&lookup, AUTHORITY_HOST_ENV)
                    .unwrap_or(defaults.authority.primary),
                alternate: non_empty(&lookup, ALTERNATE_AUTHORITY_HOST_ENV)
                    .unwrap_or(defaults.authority.alternate),
            },
            refresh_interval: seconds(KEY_REFRESH_SECS_ENV, defaults.refresh_interval),
            fetch_attempts: parsed(&lookup, KEY_FETCH_ATTEMPTS_ENV)
                .filter(|attempts: &u32| *attempts > 0)
                .unwrap_or(defaults.fetch_attempts),
            cookie_ttl: seconds(COOKIE_TTL_SECS_ENV, defaults.cookie_ttl),
        }
    }

    /// Settings handed to the decision engine.
    pub fn gate_settings(&self) -> GateSettings {
        GateSettings {
            authority: self.authority.clone(),
            cookie_ttl: self.cookie_ttl,
        }
    }
}

/// Listener settings for the demo server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Certificate and key paths; both must be set to serve HTTPS.
    pub tls: Option<(PathBuf, PathBuf)>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tls = match (
            non_empty(&lookup, TLS_CERT_PATH_ENV),
            non_empty(&lookup, TLS_KEY_PATH_ENV),
        ) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            _ => None,
        };

        Self {
            host: non_empty(&lookup, HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parsed(&lookup, PORT_ENV).unwrap_or(DEFAULT_PORT),
            tls,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    non_empty(lookup, name).and_then(|value| value.parse().ok())
}
