//! Insertion-ordered hero store keyed by name.
//!
//! The [`Registry`] is the only place that knows whether a name is taken.
//! Each mutation performs its existence check and its write in one
//! `&mut self` call, so wrapping the registry in a single lock (see
//! [`Roster`](crate::roster::Roster)) is enough to make check-then-act
//! atomic.

use humble_types::{Hero, HeroPatch};

use crate::error::RosterError;
use crate::validate;

/// Authoritative in-memory collection of heroes.
///
/// Records are kept in insertion order. The external read view returned
/// by [`Registry::list`] is sorted by humility score instead.
#[derive(Debug, Default)]
pub struct Registry {
    heroes: Vec<Hero>,
}

impl Registry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self { heroes: Vec::new() }
    }

    /// Number of stored heroes.
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    /// Whether the registry holds no heroes.
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    /// Look up a hero by exact name.
    pub fn get(&self, name: &str) -> Option<&Hero> {
        self.heroes.iter().find(|h| h.name == name)
    }

    /// Every hero sorted by humility score, highest first.
    ///
    /// Ties keep their insertion order.
    pub fn list(&self) -> Vec<Hero> {
        let mut sorted = self.heroes.clone();
        sorted.sort_by(|a, b| b.humility_score.cmp(&a.humility_score));
        sorted
    }

    /// Append a new hero.
    ///
    /// # Errors
    ///
    /// [`RosterError::DuplicateName`] if the name is taken, or
    /// [`RosterError::Validation`] if the record is not well-formed.
    pub fn create(&mut self, hero: Hero) -> Result<Hero, RosterError> {
        validate::check_record(&hero)?;
        if self.position(&hero.name).is_some() {
            return Err(RosterError::DuplicateName { name: hero.name });
        }
        self.heroes.push(hero.clone());
        Ok(hero)
    }

    /// Merge `patch` onto the hero called `name` and store it in place.
    ///
    /// The merged record is re-validated as a whole. A rename onto a name
    /// held by a different hero is rejected.
    ///
    /// # Errors
    ///
    /// [`RosterError::NotFound`], [`RosterError::DuplicateName`], or
    /// [`RosterError::Validation`].
    pub fn patch(&mut self, name: &str, patch: &HeroPatch) -> Result<Hero, RosterError> {
        let index = self.position(name).ok_or_else(|| RosterError::NotFound {
            name: name.to_owned(),
        })?;

        let merged = match self.heroes.get(index) {
            Some(existing) => patch.apply_to(existing),
            None => {
                return Err(RosterError::NotFound {
                    name: name.to_owned(),
                });
            }
        };
        validate::check_record(&merged)?;

        if merged.name != name && self.position(&merged.name).is_some() {
            return Err(RosterError::DuplicateName { name: merged.name });
        }

        if let Some(slot) = self.heroes.get_mut(index) {
            slot.clone_from(&merged);
        }
        Ok(merged)
    }

    /// Remove the hero called `name` and return it.
    ///
    /// # Errors
    ///
    /// [`RosterError::NotFound`] if no such hero exists.
    pub fn remove(&mut self, name: &str) -> Result<Hero, RosterError> {
        let index = self.position(name).ok_or_else(|| RosterError::NotFound {
            name: name.to_owned(),
        })?;
        Ok(self.heroes.remove(index))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.heroes.iter().position(|h| h.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn seeded() -> Registry {
        let mut registry = Registry::new();
        let _ = registry.create(Hero::new("Captain Humble", "Invisibility", 9));
        let _ = registry.create(Hero::new("Batman", "Detective Skills", 2));
        registry
    }

    fn names(heroes: &[Hero]) -> Vec<&str> {
        heroes.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn create_then_list_sorted() {
        let mut registry = seeded();
        let _ = registry.create(Hero::new("Flash", "Speed", 5));
        assert_eq!(
            names(&registry.list()),
            vec!["Captain Humble", "Flash", "Batman"]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let mut registry = Registry::new();
        for name in ["first", "second", "third"] {
            let _ = registry.create(Hero::new(name, "Power", 5));
        }
        let _ = registry.create(Hero::new("top", "Power", 7));
        assert_eq!(
            names(&registry.list()),
            vec!["top", "first", "second", "third"]
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = seeded();
        let result = registry.create(Hero::new("Captain Humble", "Anything", 3));
        assert_eq!(
            result,
            Err(RosterError::DuplicateName {
                name: String::from("Captain Humble")
            })
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = seeded();
        assert!(registry.create(Hero::new("batman", "Copycat", 1)).is_ok());
    }

    #[test]
    fn recreate_after_remove_succeeds() {
        let mut registry = seeded();
        assert!(registry.remove("Batman").is_ok());
        assert!(registry.create(Hero::new("Batman", "Gadgets", 4)).is_ok());
        assert_eq!(registry.get("Batman").map(|h| h.humility_score), Some(4));
    }

    #[test]
    fn patch_merges_and_keeps_position() {
        let mut registry = Registry::new();
        let _ = registry.create(Hero::new("a", "p", 5));
        let _ = registry.create(Hero::new("b", "p", 5));
        let patch = HeroPatch {
            superpower: Some(String::from("q")),
            ..HeroPatch::default()
        };
        let updated = registry.patch("a", &patch);
        assert_eq!(updated, Ok(Hero::new("a", "q", 5)));
        assert_eq!(names(&registry.list()), vec!["a", "b"]);
    }

    #[test]
    fn patch_missing_is_not_found() {
        let mut registry = seeded();
        let result = registry.patch("Nobody", &HeroPatch::default());
        assert!(matches!(result, Err(RosterError::NotFound { .. })));
    }

    #[test]
    fn patch_revalidates_merged_record() {
        let mut registry = seeded();
        let patch = HeroPatch {
            humility_score: Some(0),
            ..HeroPatch::default()
        };
        assert_eq!(
            registry.patch("Batman", &patch),
            Err(RosterError::Validation(
                ValidationError::HumilityScoreOutOfRange
            ))
        );
        assert_eq!(registry.get("Batman").map(|h| h.humility_score), Some(2));
    }

    #[test]
    fn rename_onto_existing_name_is_rejected() {
        let mut registry = seeded();
        let patch = HeroPatch {
            name: Some(String::from("Batman")),
            ..HeroPatch::default()
        };
        let result = registry.patch("Captain Humble", &patch);
        assert!(matches!(result, Err(RosterError::DuplicateName { .. })));
        assert!(registry.get("Captain Humble").is_some());
    }

    #[test]
    fn rename_to_own_name_is_allowed() {
        let mut registry = seeded();
        let patch = HeroPatch {
            name: Some(String::from("Batman")),
            humility_score: Some(3),
            ..HeroPatch::default()
        };
        assert!(registry.patch("Batman", &patch).is_ok());
    }

    #[test]
    fn rename_moves_the_key() {
        let mut registry = seeded();
        let patch = HeroPatch {
            name: Some(String::from("Dark Knight")),
            ..HeroPatch::default()
        };
        assert!(registry.patch("Batman", &patch).is_ok());
        assert!(registry.get("Batman").is_none());
        assert!(registry.get("Dark Knight").is_some());
    }

    #[test]
    fn remove_returns_record_once() {
        let mut registry = seeded();
        let removed = registry.remove("Captain Humble");
        assert_eq!(removed.map(|h| h.superpower), Ok(String::from("Invisibility")));
        assert!(matches!(
            registry.remove("Captain Humble"),
            Err(RosterError::NotFound { .. })
        ));
        assert_eq!(registry.len(), 1);
    }
}
