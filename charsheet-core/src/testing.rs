//! Testing utilities.
//!
//! - `CharacterFixture` for building characters in a known state
//! - `assert_invariants` for checking a character against the rules

use crate::catalog::{Ability, Skill};
use crate::character::{Attributes, Character};
use crate::rules::{compute_skills, update_selected_class_if_needed, RulesEngine};

/// Panic with every broken invariant if `character` is not valid under `engine`.
pub fn assert_invariants(engine: &RulesEngine, character: &Character) {
    let violations = engine.violations(character);
    if !violations.is_empty() {
        let listed: Vec<String> = violations.iter().map(|v| format!("  - {v}")).collect();
        panic!(
            "character breaks {} invariant(s):\n{}\n{character:?}",
            violations.len(),
            listed.join("\n")
        );
    }
}

/// Builder for characters in a specific state.
///
/// Derived fields (modifiers, classes) are recomputed by `build`; skill
/// points are taken as given, so a fixture can be deliberately over budget.
#[derive(Debug, Clone)]
pub struct CharacterFixture {
    attributes: Attributes,
    points: Vec<(Skill, u32)>,
}

impl CharacterFixture {
    /// Start from the engine's initial attribute score.
    pub fn new(engine: &RulesEngine) -> Self {
        Self {
            attributes: Attributes::uniform(engine.config().attribute_initial),
            points: Vec::new(),
        }
    }

    pub fn attribute(mut self, ability: Ability, score: u8) -> Self {
        self.attributes.set(ability, score);
        self
    }

    pub fn points(mut self, skill: Skill, points: u32) -> Self {
        self.points.push((skill, points));
        self
    }

    pub fn build(self) -> Character {
        let mut skills = compute_skills(&self.attributes, None);
        for (skill, points) in self.points {
            if let Some(entry) = skills.get_mut(&skill) {
                entry.points = points;
            }
        }
        update_selected_class_if_needed(&Character {
            attributes: self.attributes,
            skills,
            selected_classes: Default::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CharacterClass;

    #[test]
    fn test_fixture_derives_fields() {
        let engine = RulesEngine::new();
        let character = CharacterFixture::new(&engine)
            .attribute(Ability::Intelligence, 14)
            .points(Skill::Arcana, 4)
            .build();

        assert_eq!(character.skill(Skill::Arcana).points, 4);
        assert_eq!(character.skill(Skill::Arcana).modifier, 2);
        assert!(character.selected_classes.contains(&CharacterClass::Wizard));
        assert_invariants(&engine, &character);
    }

    #[test]
    #[should_panic(expected = "invariant")]
    fn test_assert_invariants_panics_over_budget() {
        let engine = RulesEngine::new();
        let character = CharacterFixture::new(&engine)
            .points(Skill::Stealth, 11)
            .build();
        assert_invariants(&engine, &character);
    }
}
