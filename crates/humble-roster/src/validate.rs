//! Schema validation for untyped hero input.
//!
//! Validation is a pure function of its input: it never consults the
//! registry, so uniqueness is checked later by [`Registry`].
//!
//! Type checks (is `name` a string, is `humilityScore` an integer) happen
//! here while reading the JSON. Value constraints (non-empty strings,
//! score range) are declared on [`Hero`] and [`HeroPatch`] and enforced
//! through [`Validate`].
//!
//! Any problem with the humility score takes precedence over other
//! problems so callers can report the more specific message.
//!
//! [`Registry`]: crate::registry::Registry

use humble_types::{Hero, HeroPatch};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::ValidationError;

/// Wire name of the humility score field.
const SCORE_FIELD: &str = "humilityScore";

/// Struct field name `validator` reports for the humility score.
const SCORE_STRUCT_FIELD: &str = "humility_score";

/// Which fields a validation pass requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// All fields must be present (create).
    Full,
    /// Any subset of fields may be present (patch).
    Partial,
}

/// Validate a create payload into a complete [`Hero`].
pub fn validate_full(input: &Value) -> Result<Hero, ValidationError> {
    let patch = validate(input, Mode::Full)?;
    match (patch.name, patch.superpower, patch.humility_score) {
        (Some(name), Some(superpower), Some(humility_score)) => Ok(Hero {
            name,
            superpower,
            humility_score,
        }),
        _ => Err(ValidationError::malformed("incomplete hero record")),
    }
}

/// Validate a patch payload into a [`HeroPatch`].
pub fn validate_partial(input: &Value) -> Result<HeroPatch, ValidationError> {
    validate(input, Mode::Partial)
}

/// Validate `input` in the given mode.
///
/// In [`Mode::Full`] every field of the returned patch is `Some`.
pub fn validate(input: &Value, mode: Mode) -> Result<HeroPatch, ValidationError> {
    let Some(fields) = input.as_object() else {
        return Err(ValidationError::malformed("expected a JSON object"));
    };

    let mut issues = Issues::default();

    let name = read_text(fields, "name", mode, &mut issues);
    let superpower = read_text(fields, "superpower", mode, &mut issues);
    let humility_score = read_score(fields, mode, &mut issues);

    let patch = HeroPatch {
        name,
        superpower,
        humility_score,
    };

    if let Err(errors) = patch.validate() {
        for field in errors.field_errors().keys() {
            issues.field(field);
        }
    }

    issues.into_result(patch)
}

/// Re-check a complete record, e.g. after merging a patch.
pub fn check_record(hero: &Hero) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    if let Err(errors) = hero.validate() {
        for field in errors.field_errors().keys() {
            issues.field(field);
        }
    }
    issues.into_result(())
}

/// Problems collected over one validation pass.
#[derive(Debug, Default)]
struct Issues {
    score: bool,
    malformed: Vec<String>,
}

impl Issues {
    fn field(&mut self, field: &str) {
        if field == SCORE_STRUCT_FIELD || field == SCORE_FIELD {
            self.score = true;
        } else if !self.malformed.iter().any(|f| f == field) {
            self.malformed.push(field.to_owned());
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.score {
            Err(ValidationError::HumilityScoreOutOfRange)
        } else if self.malformed.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::malformed(format!(
                "invalid fields: {}",
                self.malformed.join(", ")
            )))
        }
    }
}

/// Read a string field. `null` counts as present but invalid.
fn read_text(
    fields: &Map<String, Value>,
    key: &str,
    mode: Mode,
    issues: &mut Issues,
) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.field(key);
            None
        }
        None => {
            if mode == Mode::Full {
                issues.field(key);
            }
            None
        }
    }
}

/// Read the humility score, coercing integral numbers such as `9.0`.
///
/// Values that cannot be held by a `u8` are reported immediately; the
/// 1..=10 range itself is enforced by the `validator` derive.
fn read_score(fields: &Map<String, Value>, mode: Mode, issues: &mut Issues) -> Option<u8> {
    match fields.get(SCORE_FIELD) {
        Some(value) => {
            let score = coerce_score(value);
            if score.is_none() {
                issues.field(SCORE_FIELD);
            }
            score
        }
        None => {
            if mode == Mode::Full {
                issues.field(SCORE_FIELD);
            }
            None
        }
    }
}

fn coerce_score(value: &Value) -> Option<u8> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return u8::try_from(int).ok();
    }
    if number.is_u64() {
        // Larger than i64::MAX.
        return None;
    }
    let float = number.as_f64()?;
    (0..=u8::MAX).find(|candidate| (f64::from(*candidate) - float).abs() < f64::EPSILON)
}
