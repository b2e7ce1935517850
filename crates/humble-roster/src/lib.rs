//! Consistency and fan-out core for the Humble Heroes roster.
//!
//! The roster keeps a live, in-memory list of heroes and mirrors every
//! accepted change to all connected viewers.
//!
//! # Architecture
//!
//! - [`validate`] turns untyped JSON input into a typed [`Hero`] or
//!   [`HeroPatch`], or a [`ValidationError`].
//! - [`registry`] is the insertion-ordered store keyed by hero name. It
//!   owns the uniqueness and existence checks.
//! - [`broadcast`] tracks live viewer sessions and pushes
//!   [`RosterEvent`]s to them, best-effort and at-most-once.
//! - [`roster`] ties the two together behind a single lock so every
//!   mutation and its event are one ordered step.
//! - [`config`] holds the typed YAML configuration.
//!
//! [`Hero`]: humble_types::Hero
//! [`HeroPatch`]: humble_types::HeroPatch
//! [`RosterEvent`]: humble_types::RosterEvent

pub mod broadcast;
pub mod config;
pub mod error;
pub mod registry;
pub mod roster;
pub mod validate;

pub use broadcast::{Broadcaster, Delivery, Session, SessionId};
pub use config::{ConfigError, HumbleConfig};
pub use error::{RosterError, ValidationError};
pub use registry::Registry;
pub use roster::{Roster, RosterStats};
pub use validate::Mode;
