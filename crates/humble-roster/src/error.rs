//! Error taxonomy for roster operations.
//!
//! [`DuplicateName`](RosterError::DuplicateName) and
//! [`NotFound`](RosterError::NotFound) are routine negative outcomes of
//! normal use, not faults. Callers map them to ordinary responses.

/// Why an input record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The input is not hero-shaped: wrong type, missing or empty field.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// Which constraint was violated.
        reason: String,
    },

    /// The humility score is missing, not an integer, or outside 1..=10.
    #[error("humility score must be an integer between 1 and 10")]
    HumilityScoreOutOfRange,
}

impl ValidationError {
    /// Build a [`ValidationError::MalformedInput`] from any message.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}

/// Errors returned by registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// The input or the merged record failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another hero already holds this name.
    #[error("superhero already exists: {name}")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// No hero with this name exists.
    #[error("superhero not found: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },
}
