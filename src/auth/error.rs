// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Expected failures (missing cookies, bad tokens, no key yet) are never
/// errors; they become a [`Decision`](super::Decision). Only key fetching and
/// genuinely unexpected request faults produce an `AuthError`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Public key could not be fetched from the authority
    #[error("Failed to fetch public key: {0}")]
    KeyFetch(String),
    /// Fetched public key could not be decoded
    #[error("Failed to decode public key: {0}")]
    KeyDecode(String),
    /// Request body could not be read
    #[error("Failed to read request body: {0}")]
    BodyRead(String),
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::KeyFetch(_) => "key_fetch_error",
            AuthError::KeyDecode(_) => "key_decode_error",
            AuthError::BodyRead(_) => "body_read_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Only request-path faults are ever rendered; key errors stay inside the
    /// poller.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
