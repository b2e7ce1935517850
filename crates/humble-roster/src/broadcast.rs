//! Live viewer sessions and best-effort event fan-out.
//!
//! Each joined [`Session`] owns a bounded queue. [`Broadcaster::publish`]
//! copies the current sender set out of the lock, then offers the event to
//! every session with a non-blocking `try_send`. Delivery is at-most-once:
//! a session whose queue is full misses the event for good and only
//! catches up on the next change or by reconnecting (which yields a fresh
//! `init` snapshot). A failed delivery never affects other sessions.

use std::collections::HashMap;

use humble_types::{Hero, RosterEvent};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

/// Default per-session queue capacity.
pub const DEFAULT_SESSION_BUFFER: usize = 64;

/// Identifier of one viewer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The receiving end of one viewer connection.
///
/// Holds no hero data itself. Dropping it closes the queue; the next
/// publish then prunes the session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    events: mpsc::Receiver<RosterEvent>,
}

impl Session {
    /// This session's identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Wait for the next event. Returns `None` once the session has been
    /// removed from the broadcaster and its queue is drained.
    pub async fn recv(&mut self) -> Option<RosterEvent> {
        self.events.recv().await
    }

    /// Take the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<RosterEvent> {
        self.events.try_recv().ok()
    }
}

/// Outcome of a single publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Sessions the event was queued for.
    pub delivered: usize,
    /// Sessions that missed the event because their queue was full.
    pub dropped: usize,
    /// Sessions found closed and pruned.
    pub pruned: usize,
}

/// The set of currently connected viewer sessions.
#[derive(Debug)]
pub struct Broadcaster {
    sessions: RwLock<HashMap<SessionId, mpsc::Sender<RosterEvent>>>,
    buffer: usize,
}

impl Broadcaster {
    /// Create an empty broadcaster whose sessions queue up to `buffer`
    /// events each. A zero buffer is raised to one.
    pub fn new(buffer: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Register a new session and queue an `init` event carrying
    /// `snapshot` as its first message.
    pub async fn join(&self, snapshot: Vec<Hero>) -> Session {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = SessionId::new();

        // A fresh queue always has room for the first event.
        if tx
            .try_send(RosterEvent::Init {
                superheroes: snapshot,
            })
            .is_err()
        {
            debug!(session = %id, "init event could not be queued");
        }

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, tx);
        debug!(session = %id, total = sessions.len(), "session joined");

        Session { id, events: rx }
    }

    /// Remove a session. Returns `false` if it was already gone.
    pub async fn leave(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&id).is_some();
        if removed {
            debug!(session = %id, total = sessions.len(), "session left");
        }
        removed
    }

    /// Offer `event` to every joined session without waiting.
    pub async fn publish(&self, event: &RosterEvent) -> Delivery {
        let targets: Vec<(SessionId, mpsc::Sender<RosterEvent>)> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut delivery = Delivery::default();
        let mut closed = Vec::new();

        for (id, tx) in targets {
            match tx.try_send(event.clone()) {
                Ok(()) => delivery.delivered = delivery.delivered.saturating_add(1),
                Err(TrySendError::Full(_)) => {
                    debug!(session = %id, kind = event.kind(), "session queue full, event dropped");
                    delivery.dropped = delivery.dropped.saturating_add(1);
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in &closed {
                sessions.remove(id);
            }
            delivery.pruned = closed.len();
            debug!(pruned = delivery.pruned, "closed sessions pruned");
        }

        debug!(
            kind = event.kind(),
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            "event published"
        );
        delivery
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_BUFFER)
    }
}
