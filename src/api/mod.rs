// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    auth::{sso_gate, sso_gate_no_redirect},
    state::AppState,
};

pub mod health;
pub mod session;

/// Build the application router.
///
/// - `/`, `/whoami`: browser routes, redirect to login when signed out
/// - `/api/whoami`: API route, 403 when signed out
/// - `/health/live`, `/health/ready`: unauthenticated probes
pub fn router(state: AppState) -> Router {
    // The authority posts the callback to the original URL, so browser routes
    // accept POST as well as GET.
    let browser_routes = Router::new()
        .route("/", get(session::index).post(session::index))
        .route("/whoami", get(session::whoami).post(session::whoami))
        .route_layer(from_fn_with_state(state.gate.clone(), sso_gate));

    let api_routes = Router::new()
        .route("/api/whoami", get(session::whoami))
        .route_layer(from_fn_with_state(state.gate.clone(), sso_gate_no_redirect));

    let health_routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(browser_routes)
        .merge(api_routes)
        .merge(health_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
