//! Shared application state for the API server.
//!
//! [`AppState`] owns the [`Roster`], the single authority for hero data
//! and viewer sessions. It is wrapped in [`Arc`](std::sync::Arc) and
//! injected via Axum's `State` extractor.

use chrono::{DateTime, Utc};
use humble_roster::Roster;
use humble_roster::config::BroadcastConfig;

/// Shared state for the Axum application.
#[derive(Debug)]
pub struct AppState {
    /// The hero registry and its viewer fan-out.
    pub roster: Roster,
    /// When this process started serving.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state around an empty roster.
    pub fn new(config: &BroadcastConfig) -> Self {
        Self::with_roster(Roster::new(config))
    }

    /// Create state around an existing roster.
    pub fn with_roster(roster: Roster) -> Self {
        Self {
            roster,
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&BroadcastConfig::default())
    }
}
