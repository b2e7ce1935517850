//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with request tracing and panic recovery. CORS is a separate layer so
//! the server can leave it off when configured to.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::panic_response;
use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /superheroes` -- sorted list
/// - `POST /superheroes` -- create
/// - `PATCH /superheroes/{name}` -- partial update
/// - `DELETE /superheroes/{name}` -- delete
/// - `GET /superheroes/ws` -- `WebSocket` live updates
/// - `PATCH`/`DELETE /superheroes/ws` -- the hero named `ws`
/// - `GET /status` -- counters
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/superheroes",
            get(handlers::list_superheroes).post(handlers::create_superhero),
        )
        .route(
            "/superheroes/ws",
            get(ws::ws_superheroes)
                .patch(handlers::patch_ws_superhero)
                .delete(handlers::delete_ws_superhero),
        )
        .route(
            "/superheroes/{name}",
            patch(handlers::patch_superhero).delete(handlers::delete_superhero),
        )
        .route("/status", get(handlers::status))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive CORS: any origin, method, and header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
