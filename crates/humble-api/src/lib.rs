//! HTTP and push-channel surface for the Humble Heroes roster.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **REST endpoints** (`/superheroes`) to list, create, patch, and
//!   delete heroes
//! - **`WebSocket` endpoint** (`/superheroes/ws`) that sends the full
//!   sorted roster on connect and every accepted change afterwards
//! - **Status endpoint** (`/status`) with hero and viewer counts
//!
//! # Architecture
//!
//! Handlers are thin: they parse the request body, call the shared
//! [`Roster`](humble_roster::Roster), and map its outcome to a status
//! code. Change events are pushed by the roster itself, so the HTTP
//! response never waits for viewers to receive them.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::{build_router, cors_layer};
pub use server::{ServerConfig, ServerError, serve_listener, start_server};
pub use state::AppState;
