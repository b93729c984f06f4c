// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{response::Html, Extension, Json};
use serde::Serialize;

use crate::auth::AuthenticatedUsername;

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub username: String,
}

/// Landing page for a signed-in browser.
pub async fn index(Extension(user): Extension<AuthenticatedUsername>) -> Html<String> {
    Html(format!("<h1>Signed in</h1><p>Hello, {}.</p>", escape_html(&user.0)))
}

/// Identity of the caller.
pub async fn whoami(Extension(user): Extension<AuthenticatedUsername>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse { username: user.0 })
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
