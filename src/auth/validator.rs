// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token validation against the cached authority key.
//!
//! A token is the authority's base64 signature over `username-hostname`.
//! Binding the hostname means a token issued for one virtual host is useless
//! on any other.

use base64ct::{Base64, Base64Unpadded, Encoding};
use tracing::debug;

use super::key_cache::KeyCache;

/// Separator between username and hostname in the signed identity.
const IDENTITY_SEPARATOR: char = '-';

/// Build the exact string the authority signs for `username` on `hostname`.
pub fn canonical_identity(username: &str, hostname: &str) -> String {
    format!("{username}{IDENTITY_SEPARATOR}{hostname}")
}

/// Stateless verifier reading the current key from a [`KeyCache`].
#[derive(Clone)]
pub struct TokenValidator {
    keys: KeyCache,
}

impl TokenValidator {
    pub fn new(keys: KeyCache) -> Self {
        Self { keys }
    }

    /// The cache this validator reads from.
    pub fn keys(&self) -> &KeyCache {
        &self.keys
    }

    /// Verify `token` as the authority's signature over `identity`.
    ///
    /// Fails closed: returns `false` when no key has been fetched yet and when
    /// the token is not valid base64. Never blocks.
    pub fn validate(&self, identity: &str, token: &str) -> bool {
        let Some(key) = self.keys.current() else {
            debug!("No public key available yet, rejecting token");
            return false;
        };

        let Some(signature) = decode_token(token) else {
            debug!("Token is not valid base64");
            return false;
        };

        key.verify(identity.as_bytes(), &signature)
    }

    /// Validate `token` for `username` on `hostname`.
    pub fn authenticate(&self, username: &str, hostname: &str, token: &str) -> bool {
        self.validate(&canonical_identity(username, hostname), token)
    }
}

fn decode_token(token: &str) -> Option<Vec<u8>> {
    let token = token.trim();
    Base64::decode_vec(token)
        .or_else(|_| Base64Unpadded::decode_vec(token))
        .ok()
}
