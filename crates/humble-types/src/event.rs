//! Change events pushed to connected viewers.
//!
//! Every event is serialized as a JSON object with a `type` discriminator:
//!
//! ```json
//! {"type": "init", "superheroes": [...]}
//! {"type": "created", "superhero": {...}}
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::hero::Hero;

/// A message on the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RosterEvent {
    /// Full sorted roster, sent once when a viewer joins.
    Init {
        /// Every hero, sorted by humility score descending.
        superheroes: Vec<Hero>,
    },
    /// A hero was added.
    Created {
        /// The stored record.
        superhero: Hero,
    },
    /// A hero was modified.
    Updated {
        /// The record after the update.
        superhero: Hero,
    },
    /// A hero was deleted.
    Removed {
        /// The record as it was before removal.
        superhero: Hero,
    },
}

impl RosterEvent {
    /// The wire discriminator of this event.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Removed { .. } => "removed",
        }
    }

    /// The single hero affected by a change event, if any.
    pub const fn hero(&self) -> Option<&Hero> {
        match self {
            Self::Init { .. } => None,
            Self::Created { superhero } | Self::Updated { superhero } | Self::Removed { superhero } => {
                Some(superhero)
            }
        }
    }
}
