// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie pair.
//!
//! The gate keeps exactly two cookies: the username and the token. They are
//! always written together and always cleared together, so there is no API
//! here that touches one without the other.

use std::time::Duration;

use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Username cookie name.
pub const USERNAME_COOKIE: &str = "s3o_username";

/// Token cookie name.
pub const TOKEN_COOKIE: &str = "s3o_token";

/// Default cookie lifetime (8 hours).
pub const DEFAULT_COOKIE_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Characters left unescaped by browsers' `encodeURIComponent`.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Look up cookie `name` across one or more `Cookie` header values.
///
/// Values are percent-decoded; empty values count as absent.
pub fn find<'a>(headers: impl IntoIterator<Item = &'a str>, name: &str) -> Option<String> {
    headers
        .into_iter()
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| decode_value(value.trim()))
        .filter(|value| !value.is_empty())
}

fn decode_value(raw: &str) -> String {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);

    match percent_decode_str(unquoted).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unquoted.to_string(),
    }
}

/// `Set-Cookie` values establishing the session, username first.
///
/// `Expires` is omitted when `max_age` reaches past the representable date
/// range; `Max-Age` alone still bounds the session.
pub fn session_cookies(username: &str, token: &str, max_age: Duration) -> [String; 2] {
    let expires = i64::try_from(max_age.as_secs())
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl));
    [
        set_cookie(USERNAME_COOKIE, username, max_age, expires),
        set_cookie(TOKEN_COOKIE, token, max_age, expires),
    ]
}

/// `Set-Cookie` values removing the session, username first.
pub fn cleared_cookies() -> [String; 2] {
    [clear_cookie(USERNAME_COOKIE), clear_cookie(TOKEN_COOKIE)]
}

fn set_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    expires: Option<DateTime<Utc>>,
) -> String {
    let expires = expires
        .map(|at| format!("Expires={}; ", at.format("%a, %d %b %Y %H:%M:%S GMT")))
        .unwrap_or_default();
    format!(
        "{name}={}; Max-Age={}; Path=/; {expires}HttpOnly",
        utf8_percent_encode(value, COOKIE_VALUE),
        max_age.as_secs(),
    )
}

fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
}
