// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Public Key Poller
//!
//! Background task that keeps the [`KeyCache`] filled with the authority's
//! current public key. The authority rotates its key without warning, so the
//! key is re-fetched on a fixed interval rather than on demand.
//!
//! ## Strategy
//!
//! 1. Fetch once immediately at startup.
//! 2. Every `refresh_interval` (default 5 min) fetch again.
//! 3. Each cycle makes up to `max_attempts` attempts (default 3), `retry_delay`
//!    apart. If all fail the previous key stays in place until the next cycle.
//!
//! A payload that does not decode counts as a failed attempt; a broken key is
//! never published.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::AuthError;
use super::key_cache::KeyCache;
use super::public_key::SigningKey;

/// Well-known URL of the authority's public key.
pub const DEFAULT_PUBLIC_KEY_URL: &str = "https://s3o.ft.com/publickey";

/// Default interval between refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default number of fetch attempts per cycle.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts within one cycle.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Default HTTP timeout for a single fetch.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Periodic fetcher that publishes the authority key into a [`KeyCache`].
pub struct KeyPoller {
    url: String,
    cache: KeyCache,
    refresh_interval: Duration,
    max_attempts: u32,
    retry_delay: Duration,
    request_timeout: Duration,
}

impl KeyPoller {
    /// Create a poller for `url` that publishes into `cache`.
    pub fn new(url: impl Into<String>, cache: KeyCache) -> Self {
        Self {
            url: url.into(),
            cache,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Attempts per cycle; values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the public key URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Spawn the refresh loop on the current runtime.
    ///
    /// The task runs until `shutdown` is cancelled.
    pub fn start(self, shutdown: CancellationToken) -> Result<JoinHandle<()>, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(tokio::spawn(self.run(client, shutdown)))
    }

    async fn run(self, client: reqwest::Client, shutdown: CancellationToken) {
        info!(
            url = %self.url,
            interval_secs = self.refresh_interval.as_secs(),
            max_attempts = self.max_attempts,
            "Public key poller starting"
        );

        loop {
            tokio::select! {
                _ = self.refresh_once(&client) => {},
                _ = shutdown.cancelled() => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.refresh_interval) => {},
                _ = shutdown.cancelled() => break,
            }
        }

        info!("Public key poller shutting down");
    }

    /// Run one refresh cycle with retries.
    ///
    /// Returns `true` if a new key was published.
    pub async fn refresh_once(&self, client: &reqwest::Client) -> bool {
        for attempt in 1..=self.max_attempts {
            match self.fetch_key(client).await {
                Ok(key) => {
                    debug!(modulus_bits = key.modulus_bits(), "Public key fetched");
                    self.cache.replace(key);
                    info!(url = %self.url, attempt, "Public key loaded");
                    return true;
                }
                Err(e) => {
                    warn!(
                        url = %self.url,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Public key fetch failed"
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        warn!(
            url = %self.url,
            has_previous_key = self.cache.is_ready(),
            "Public key refresh cycle failed, keeping previous key"
        );
        false
    }

    /// Fetch and decode the key from the endpoint.
    async fn fetch_key(&self, client: &reqwest::Client) -> Result<SigningKey, AuthError> {
        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "HTTP {} from public key endpoint",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        SigningKey::from_base64_der(&body)
    }
}
