// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, time::Duration};

use axum::Extension;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sso_gate::api::router;
use sso_gate::auth::{ConnectionScheme, KeyCache, KeyPoller};
use sso_gate::config::{GateConfig, ServerConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV};
use sso_gate::state::AppState;

/// Time allowed for in-flight requests after a shutdown signal.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    init_tracing();

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let gate_config = GateConfig::from_env();
    let server_config = ServerConfig::from_env();

    // Start fetching the authority key; requests are rejected until it lands
    let keys = KeyCache::new();
    let shutdown = CancellationToken::new();
    let poller = KeyPoller::new(gate_config.public_key_url.clone(), keys.clone())
        .with_refresh_interval(gate_config.refresh_interval)
        .with_max_attempts(gate_config.fetch_attempts);
    info!(url = %poller.url(), "Starting public key poller");
    let poller_task = poller
        .start(shutdown.clone())
        .expect("Failed to start public key poller");

    let ready_keys = keys.clone();
    tokio::spawn(async move {
        ready_keys.ready().await;
        info!("Public key loaded, gate is ready");
    });

    let app = router(AppState::new(keys, gate_config.gate_settings()));

    let addr: SocketAddr = server_config
        .bind_address()
        .parse()
        .expect("Failed to parse bind address");

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone(), shutdown.clone()));

    match &server_config.tls {
        Some((cert_path, key_path)) => {
            let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
                .await
                .expect("Failed to load TLS certificate and key");
            let app = app.layer(Extension(ConnectionScheme::Https));

            info!(%addr, "SSO gate listening on https");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            info!(%addr, "SSO gate listening on http");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTP server failed");
        }
    }

    shutdown.cancel();
    if let Err(e) = poller_task.await {
        warn!(error = %e, "Public key poller ended abnormally");
    }
    info!("Shutdown complete");
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn shutdown_signal(handle: Handle<SocketAddr>, shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }

    info!("Shutdown signal received");
    shutdown.cancel();
    handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
}
