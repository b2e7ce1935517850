//! The single mutation authority.
//!
//! [`Roster`] owns the [`Registry`] behind one async mutex and publishes
//! each accepted change while that lock is still held. As a result:
//!
//! - duplicate-name and existence checks can never race with an insert,
//! - every session sees events in the order mutations were accepted,
//! - a joining session's `init` snapshot and its first change event never
//!   overlap or leave a gap.
//!
//! Publishing never waits on a viewer, so holding the lock across it
//! keeps every operation bounded.

use humble_types::{Hero, RosterEvent};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

use crate::broadcast::{Broadcaster, Session, SessionId};
use crate::config::BroadcastConfig;
use crate::error::RosterError;
use crate::registry::Registry;
use crate::validate;

/// Point-in-time counters for the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RosterStats {
    /// Number of stored heroes.
    pub heroes: usize,
    /// Number of connected viewer sessions.
    pub sessions: usize,
}

/// Registry plus broadcaster, exposed only through the roster contract.
#[derive(Debug)]
pub struct Roster {
    registry: Mutex<Registry>,
    broadcaster: Broadcaster,
}

impl Roster {
    /// Create an empty roster.
    pub fn new(config: &BroadcastConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            broadcaster: Broadcaster::new(config.session_buffer),
        }
    }

    /// All heroes sorted by humility score, highest first.
    pub async fn list(&self) -> Vec<Hero> {
        self.registry.lock().await.list()
    }

    /// Validate and insert a new hero, then announce it.
    ///
    /// # Errors
    ///
    /// [`RosterError::Validation`] or [`RosterError::DuplicateName`].
    pub async fn create(&self, input: &Value) -> Result<Hero, RosterError> {
        let hero = validate::validate_full(input)?;

        let mut registry = self.registry.lock().await;
        let stored = registry.create(hero)?;
        info!(
            name = %stored.name,
            humility_score = stored.humility_score,
            total = registry.len(),
            "superhero created"
        );

        self.broadcaster
            .publish(&RosterEvent::Created {
                superhero: stored.clone(),
            })
            .await;
        Ok(stored)
    }

    /// Validate a partial update and merge it onto the hero called `name`,
    /// then announce the result.
    ///
    /// # Errors
    ///
    /// [`RosterError::Validation`], [`RosterError::NotFound`], or
    /// [`RosterError::DuplicateName`] when renaming onto a taken name.
    pub async fn patch(&self, name: &str, input: &Value) -> Result<Hero, RosterError> {
        let patch = validate::validate_partial(input)?;

        let mut registry = self.registry.lock().await;
        let updated = registry.patch(name, &patch)?;
        info!(
            name = %name,
            new_name = %updated.name,
            humility_score = updated.humility_score,
            "superhero updated"
        );

        self.broadcaster
            .publish(&RosterEvent::Updated {
                superhero: updated.clone(),
            })
            .await;
        Ok(updated)
    }

    /// Delete the hero called `name`, then announce it.
    ///
    /// # Errors
    ///
    /// [`RosterError::NotFound`] if no such hero exists.
    pub async fn remove(&self, name: &str) -> Result<Hero, RosterError> {
        let mut registry = self.registry.lock().await;
        let removed = registry.remove(name)?;
        info!(name = %removed.name, total = registry.len(), "superhero removed");

        self.broadcaster
            .publish(&RosterEvent::Removed {
                superhero: removed.clone(),
            })
            .await;
        Ok(removed)
    }

    /// Connect a new viewer. Its first event is `init` with the current
    /// sorted roster; later events are only changes accepted afterwards.
    pub async fn join(&self) -> Session {
        let registry = self.registry.lock().await;
        self.broadcaster.join(registry.list()).await
    }

    /// Disconnect a viewer. Safe to call more than once.
    pub async fn leave(&self, id: SessionId) -> bool {
        self.broadcaster.leave(id).await
    }

    /// Current hero and session counts.
    pub async fn stats(&self) -> RosterStats {
        let heroes = self.registry.lock().await.len();
        let sessions = self.broadcaster.session_count().await;
        RosterStats { heroes, sessions }
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(&BroadcastConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::error::ValidationError;

    fn hero_json(name: &str, superpower: &str, score: u8) -> Value {
        json!({ "name": name, "superpower": superpower, "humilityScore": score })
    }

    #[tokio::test]
    async fn scenario_create_patch_delete() {
        let roster = Roster::default();

        let created = roster
            .create(&hero_json("Captain Humble", "Invisibility", 9))
            .await;
        assert!(created.is_ok());

        let duplicate = roster.create(&hero_json("Captain Humble", "Flight", 1)).await;
        assert!(matches!(duplicate, Err(RosterError::DuplicateName { .. })));

        assert!(
            roster
                .create(&hero_json("Batman", "Detective Skills", 2))
                .await
                .is_ok()
        );

        let listed: Vec<(String, u8)> = roster
            .list()
            .await
            .into_iter()
            .map(|h| (h.name, h.humility_score))
            .collect();
        assert_eq!(
            listed,
            vec![
                (String::from("Captain Humble"), 9),
                (String::from("Batman"), 2)
            ]
        );

        let patched = roster
            .patch("Captain Humble", &json!({ "superpower": "Super Strength" }))
            .await;
        assert_eq!(
            patched,
            Ok(Hero::new("Captain Humble", "Super Strength", 9))
        );

        let removed = roster.remove("Captain Humble").await;
        assert_eq!(removed.map(|h| h.superpower), Ok(String::from("Super Strength")));

        assert!(matches!(
            roster.remove("Captain Humble").await,
            Err(RosterError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_registry() {
        let roster = Roster::default();
        let result = roster.create(&hero_json("Captain Humble", "Invisibility", 11)).await;
        assert_eq!(
            result,
            Err(RosterError::Validation(
                ValidationError::HumilityScoreOutOfRange
            ))
        );
        assert_eq!(roster.stats().await.heroes, 0);
    }

    #[tokio::test]
    async fn late_joiner_gets_snapshot_not_replay() {
        let roster = Roster::default();
        let _ = roster.create(&hero_json("Batman", "Detective Skills", 2)).await;
        let _ = roster.create(&hero_json("Captain Humble", "Invisibility", 9)).await;

        let mut session = roster.join().await;
        let names: Vec<String> = match session.try_recv() {
            Some(RosterEvent::Init { superheroes }) => {
                superheroes.into_iter().map(|h| h.name).collect()
            }
            _ => Vec::new(),
        };
        assert_eq!(names, vec!["Captain Humble", "Batman"]);
        assert!(session.try_recv().is_none());
    }

    #[tokio::test]
    async fn each_mutation_emits_one_event_in_order() {
        let roster = Roster::default();
        let mut session = roster.join().await;
        let _ = session.try_recv();

        let _ = roster.create(&hero_json("A", "p", 3)).await;
        let _ = roster.create(&hero_json("A", "p", 3)).await; // rejected
        let _ = roster.patch("A", &json!({ "humilityScore": 4 })).await;
        let _ = roster.patch("missing", &json!({})).await; // rejected
        let _ = roster.remove("A").await;

        let kinds: Vec<&'static str> = std::iter::from_fn(|| session.try_recv())
            .map(|e| e.kind())
            .collect();
        assert_eq!(kinds, vec!["created", "updated", "removed"]);
    }

    #[tokio::test]
    async fn left_session_receives_nothing_more() {
        let roster = Roster::default();
        let mut session = roster.join().await;
        let _ = session.try_recv();
        assert!(roster.leave(session.id()).await);

        let _ = roster.create(&hero_json("A", "p", 3)).await;
        assert!(session.try_recv().is_none());
        assert_eq!(roster.stats().await.sessions, 0);
    }

    #[tokio::test]
    async fn concurrent_creates_of_same_name_admit_exactly_one() {
        let roster = Arc::new(Roster::default());
        let mut handles = Vec::new();
        for i in 0..16_u8 {
            let roster = Arc::clone(&roster);
            handles.push(tokio::spawn(async move {
                roster
                    .create(&hero_json("Contested", "Power", (i % 10) + 1))
                    .await
                    .is_ok()
            }));
        }

        let mut accepted = 0_usize;
        for handle in handles {
            if handle.await.unwrap_or(false) {
                accepted = accepted.saturating_add(1);
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(roster.list().await.len(), 1);
    }
}
