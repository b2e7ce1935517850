//! The hero record.
//!
//! A [`Hero`] is keyed by its `name` (case-sensitive, never normalized).
//! Field constraints are declared with `validator` derives so the same
//! rules apply at creation and after every merge of a [`HeroPatch`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

/// Lowest accepted humility score (inclusive).
pub const HUMILITY_MIN: u8 = 1;

/// Highest accepted humility score (inclusive).
pub const HUMILITY_MAX: u8 = 10;

/// A single entry in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Hero {
    /// Unique name of the hero. Acts as the natural key.
    #[validate(length(min = 1))]
    pub name: String,
    /// Free-text description of the hero's superpower.
    #[validate(length(min = 1))]
    pub superpower: String,
    /// How humble the hero is, from 1 to 10.
    #[validate(range(min = 1, max = 10))]
    pub humility_score: u8,
}

impl Hero {
    /// Create a new hero record. No validation is performed here.
    pub fn new(name: impl Into<String>, superpower: impl Into<String>, humility_score: u8) -> Self {
        Self {
            name: name.into(),
            superpower: superpower.into(),
            humility_score,
        }
    }
}

/// A partial update to a [`Hero`].
///
/// Absent fields are left untouched when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HeroPatch {
    /// Replacement name, if renaming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    /// Replacement superpower.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub superpower: Option<String>,
    /// Replacement humility score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10))]
    pub humility_score: Option<u8>,
}

impl HeroPatch {
    /// Whether the patch carries no field at all.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.superpower.is_none() && self.humility_score.is_none()
    }

    /// Shallow-merge this patch onto `hero`, returning the merged record.
    pub fn apply_to(&self, hero: &Hero) -> Hero {
        Hero {
            name: self.name.clone().unwrap_or_else(|| hero.name.clone()),
            superpower: self
                .superpower
                .clone()
                .unwrap_or_else(|| hero.superpower.clone()),
            humility_score: self.humility_score.unwrap_or(hero.humility_score),
        }
    }
}
