//! Shared wire types for the Humble Heroes roster.
//!
//! This crate is the single source of truth for the records and events
//! exchanged between the roster server and its viewers. Types defined here
//! flow downstream to `TypeScript` via `ts-rs` for the viewer front end.
//!
//! # Modules
//!
//! - [`hero`] -- The hero record and its partial-update counterpart
//! - [`event`] -- Change events pushed to connected viewers

pub mod event;
pub mod hero;

pub use event::RosterEvent;
pub use hero::{HUMILITY_MAX, HUMILITY_MIN, Hero, HeroPatch};
