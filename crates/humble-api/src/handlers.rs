//! REST endpoint handlers.
//!
//! All handlers go through the shared [`Roster`](humble_roster::Roster)
//! on [`AppState`]. Request bodies are read as raw bytes and parsed here,
//! so a missing `Content-Type` header or broken JSON yields the same
//! 400 response as any other malformed input.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/superheroes` | List heroes, most humble first |
//! | `POST` | `/superheroes` | Create a hero |
//! | `PATCH` | `/superheroes/:name` | Update some fields of a hero |
//! | `DELETE` | `/superheroes/:name` | Delete a hero |
//! | `PATCH` | `/superheroes/ws` | Update the hero named `ws` |
//! | `DELETE` | `/superheroes/ws` | Delete the hero named `ws` |
//! | `GET` | `/status` | Hero and viewer counts |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use humble_roster::ValidationError;
use humble_types::Hero;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /superheroes
// ---------------------------------------------------------------------------

/// List every hero sorted by humility score, highest first.
pub async fn list_superheroes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.roster.list().await)
}

// ---------------------------------------------------------------------------
// POST /superheroes
// ---------------------------------------------------------------------------

/// Create a hero from a full record. Responds `201` with the stored hero.
pub async fn create_superhero(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let input = parse_body(&body)?;
    let hero = state.roster.create(&input).await?;
    Ok((StatusCode::CREATED, Json(hero)))
}

// ---------------------------------------------------------------------------
// PATCH /superheroes/:name
// ---------------------------------------------------------------------------

/// Merge the given fields onto an existing hero.
///
/// The path segment is percent-decoded, so `Captain%20Humble` addresses
/// `Captain Humble`.
pub async fn patch_superhero(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    patch_named(&state, &name, &body).await
}

// ---------------------------------------------------------------------------
// DELETE /superheroes/:name
// ---------------------------------------------------------------------------

/// Delete a hero and return the removed record.
pub async fn delete_superhero(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    delete_named(&state, &name).await
}

// ---------------------------------------------------------------------------
// PATCH / DELETE /superheroes/ws
// ---------------------------------------------------------------------------

/// Path segment shared by the `WebSocket` route and a hero named `ws`.
pub const WS_SEGMENT: &str = "ws";

/// `PATCH` on the `WebSocket` path addresses the hero named `ws`.
pub async fn patch_ws_superhero(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    patch_named(&state, WS_SEGMENT, &body).await
}

/// `DELETE` on the `WebSocket` path addresses the hero named `ws`.
pub async fn delete_ws_superhero(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    delete_named(&state, WS_SEGMENT).await
}

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

/// Report hero and viewer counts plus uptime.
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.roster.stats().await;
    let uptime_seconds = Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds()
        .max(0);

    Json(serde_json::json!({
        "heroes": stats.heroes,
        "sessions": stats.sessions,
        "startedAt": state.started_at.to_rfc3339(),
        "uptimeSeconds": uptime_seconds,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn patch_named(state: &AppState, name: &str, body: &[u8]) -> Result<Json<Hero>, ApiError> {
    let input = parse_body(body)?;
    let hero = state.roster.patch(name, &input).await?;
    Ok(Json(hero))
}

async fn delete_named(state: &AppState, name: &str) -> Result<Json<Hero>, ApiError> {
    let hero = state.roster.remove(name).await?;
    Ok(Json(hero))
}

/// Parse a request body as JSON, treating any failure as malformed input.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::from(ValidationError::malformed(format!("body is not JSON: {e}"))))
}
