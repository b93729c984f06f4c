// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared cache holding the authority's current public key.
//!
//! ## Semantics
//!
//! - Starts empty; [`KeyCache::current`] returns `None` until the first
//!   successful fetch.
//! - Keys are replaced wholesale. Readers clone an `Arc` snapshot and never see
//!   a partially updated key.
//! - A key is never removed once published, so [`KeyCache::ready`] resolves
//!   once and stays resolved.

use std::sync::Arc;

use tokio::sync::watch;

use super::public_key::SigningKey;

/// Single-writer, many-reader cell for the current [`SigningKey`].
#[derive(Clone)]
pub struct KeyCache {
    sender: Arc<watch::Sender<Option<Arc<SigningKey>>>>,
}

impl KeyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Latest key, or `None` if no fetch has succeeded yet.
    pub fn current(&self) -> Option<Arc<SigningKey>> {
        self.sender.borrow().clone()
    }

    /// Whether a key has ever been published.
    pub fn is_ready(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Publish a new key, replacing the previous one.
    pub fn replace(&self, key: SigningKey) {
        self.sender.send_replace(Some(Arc::new(key)));
    }

    /// Resolve once the first key has been published.
    ///
    /// Returns immediately if a key is already cached.
    pub async fn ready(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(Option::is_some).await;
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}
