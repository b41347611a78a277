//! The list of characters being built in one session.
//!
//! The store owns the characters; the [`RulesEngine`] passed into each call
//! decides what a change produces. A change either replaces the character at
//! its index with the new value or leaves the list untouched.

use crate::catalog::{Ability, Skill};
use crate::character::Character;
use crate::rules::{ChangeOutcome, Delta, Notice, RulesEngine};
use serde::Serialize;
use tracing::info;

/// Ordered list of characters.
///
/// Indices are positions in the list. Passing an index that is out of range
/// to any method is a caller bug and panics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CharacterStore {
    characters: Vec<Character>,
}

impl CharacterStore {
    /// A store holding one fresh character.
    pub fn new(engine: &RulesEngine) -> Self {
        Self {
            characters: vec![engine.new_character()],
        }
    }

    /// A store holding the given characters.
    pub fn with_characters(characters: Vec<Character>) -> Self {
        Self { characters }
    }

    /// Append a fresh character and return its index.
    pub fn add_character(&mut self, engine: &RulesEngine) -> usize {
        self.characters.push(engine.new_character());
        let index = self.characters.len() - 1;
        info!(index, "added character");
        index
    }

    /// Remove and return the character at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove_character(&mut self, index: usize) -> Character {
        let removed = self.characters.remove(index);
        info!(index, remaining = self.characters.len(), "removed character");
        removed
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn get(&self, index: usize) -> &Character {
        &self.characters[index]
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Raise or lower an attribute on the character at `index`.
    ///
    /// Returns the notice to show the user when the change was refused for
    /// capacity reasons.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn on_change_attribute(
        &mut self,
        engine: &RulesEngine,
        index: usize,
        ability: Ability,
        delta: Delta,
    ) -> Option<Notice> {
        let outcome = engine.change_attribute(&self.characters[index], ability, delta);
        self.install(index, outcome)
    }

    /// Spend or refund a skill point on the character at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn on_change_skill(
        &mut self,
        engine: &RulesEngine,
        index: usize,
        skill: Skill,
        delta: Delta,
    ) -> Option<Notice> {
        let outcome = engine.change_skill(&self.characters[index], skill, delta);
        self.install(index, outcome)
    }

    fn install(&mut self, index: usize, outcome: ChangeOutcome) -> Option<Notice> {
        match outcome {
            ChangeOutcome::Applied(character) => {
                self.characters[index] = character;
                None
            }
            ChangeOutcome::Rejected(notice) => notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_one_character() {
        let engine = RulesEngine::new();
        let store = CharacterStore::new(&engine);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.get(0), &engine.new_character());
    }

    #[test]
    fn test_add_and_remove() {
        let engine = RulesEngine::new();
        let mut store = CharacterStore::new(&engine);
        assert_eq!(store.add_character(&engine), 1);
        assert_eq!(store.add_character(&engine), 2);

        store.on_change_attribute(&engine, 1, Ability::Strength, Delta::Increase);
        let removed = store.remove_character(1);
        assert_eq!(removed.attributes.strength, 11);
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|c| c.attributes.strength == 10));

        store.remove_character(0);
        store.remove_character(0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_changes_only_touch_target() {
        let engine = RulesEngine::new();
        let mut store = CharacterStore::new(&engine);
        store.add_character(&engine);

        assert_eq!(
            store.on_change_skill(&engine, 1, Skill::Arcana, Delta::Increase),
            None
        );
        assert_eq!(store.get(1).skill(Skill::Arcana).points, 1);
        assert_eq!(store.get(0).skill(Skill::Arcana).points, 0);
    }

    #[test]
    fn test_rejected_change_keeps_state() {
        let engine = RulesEngine::new();
        let mut store = CharacterStore::new(&engine);
        for _ in 0..10 {
            store.on_change_attribute(&engine, 0, Ability::Dexterity, Delta::Increase);
        }
        let before = store.clone();

        let notice = store.on_change_attribute(&engine, 0, Ability::Wisdom, Delta::Increase);
        assert_eq!(notice, Some(Notice::AttributeCapReached { max: 70 }));
        assert_eq!(store, before);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_index_panics() {
        let engine = RulesEngine::new();
        let mut store = CharacterStore::new(&engine);
        store.on_change_skill(&engine, 3, Skill::Arcana, Delta::Increase);
    }
}
