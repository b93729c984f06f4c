// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Redirect URL construction.
//!
//! Two redirects leave the gate: the login redirect to the authority, and the
//! post-login redirect back to the original URL with the callback parameter
//! stripped.

use url::form_urlencoded;

/// Query parameter carrying the username on the authority's callback.
pub const USERNAME_PARAM: &str = "username";

/// Path of the authority's interactive login endpoint.
const AUTHENTICATE_PATH: &str = "/v2/authenticate";

/// Authority hosts the login redirect can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityHosts {
    /// Host used by default.
    pub primary: String,
    /// Host used when the caller opts into the newer endpoint variant.
    pub alternate: String,
}

impl Default for AuthorityHosts {
    fn default() -> Self {
        Self {
            primary: "s3o.ft.com".to_string(),
            alternate: "s3ov4.in.ft.com".to_string(),
        }
    }
}

/// Which authority endpoint variant a login redirect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityVariant {
    Primary,
    Alternate,
}

/// Protocol the browser used, honouring a TLS-terminating proxy.
///
/// Only an `x-forwarded-proto` of exactly `https` overrides the connection
/// scheme.
pub fn external_protocol<'a>(forwarded_proto: Option<&str>, connection_scheme: &'a str) -> &'a str {
    match forwarded_proto {
        Some("https") => "https",
        _ => connection_scheme,
    }
}

/// Login redirect to the authority.
///
/// `original_url` is the absolute URL the browser asked for; `system_code` is
/// only sent to the alternate endpoint.
pub fn login_url(
    hosts: &AuthorityHosts,
    variant: AuthorityVariant,
    hostname: &str,
    original_url: &str,
    system_code: Option<&str>,
) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("post", "true")
        .append_pair("host", hostname)
        .append_pair("redirect", original_url);

    let host = match variant {
        AuthorityVariant::Primary => &hosts.primary,
        AuthorityVariant::Alternate => {
            if let Some(code) = system_code {
                query.append_pair("systemcode", code);
            }
            &hosts.alternate
        }
    };

    format!("https://{host}{AUTHENTICATE_PATH}?{}", query.finish())
}

/// First non-empty value of query parameter `name` in `url`.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = split_query(url);
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Remove every `username` parameter from `url`.
///
/// Other parameters keep their order and original encoding; the path and any
/// fragment are untouched. No `?` is left behind when nothing remains.
pub fn strip_username(url: &str) -> String {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };

    let (base, query) = split_query(before_fragment);
    let base = if base.is_empty() { "/" } else { base };

    let kept: Vec<&str> = query
        .map(|q| {
            q.split('&')
                .filter(|segment| !segment.is_empty() && !is_username_segment(segment))
                .collect()
        })
        .unwrap_or_default();

    let mut cleaned = base.to_string();
    if !kept.is_empty() {
        cleaned.push('?');
        cleaned.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        cleaned.push('#');
        cleaned.push_str(fragment);
    }
    cleaned
}

fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    }
}

fn is_username_segment(segment: &str) -> bool {
    let raw_key = segment.split_once('=').map_or(segment, |(key, _)| key);
    form_urlencoded::parse(raw_key.as_bytes())
        .next()
        .is_some_and(|(key, _)| key == USERNAME_PARAM)
}
