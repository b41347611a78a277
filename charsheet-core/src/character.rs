//! Character values.
//!
//! A [`Character`] is plain data. Every rules operation takes one by
//! reference and hands back a new value, so two characters compare equal
//! exactly when nothing observable changed.

use crate::catalog::{Ability, CharacterClass, Skill, ATTRIBUTE_INITIAL};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Modifier for an attribute score: `floor((score - 10) / 2)`.
///
/// Scores 8-9 give -1, 10-11 give 0, 12-13 give +1.
pub fn modifier(score: u8) -> i8 {
    // Floor division, not truncation, so odd scores below 10 round down
    (score as i16 - 10).div_euclid(2) as i8
}

/// The six attribute scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl Attributes {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    /// Every attribute set to the same score.
    pub fn uniform(score: u8) -> Self {
        Self::new(score, score, score, score, score, score)
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Copy with one score replaced.
    pub fn with(mut self, ability: Ability, value: u8) -> Self {
        self.set(ability, value);
        self
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        modifier(self.get(ability))
    }

    /// Sum of all six scores.
    pub fn total(&self) -> u32 {
        Ability::all().iter().map(|a| self.get(*a) as u32).sum()
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(ATTRIBUTE_INITIAL)
    }
}

/// Points spent on one skill plus its derived modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Player-allocated points.
    pub points: u32,
    /// Modifier of the governing attribute. Derived, never set directly.
    pub modifier: i8,
}

impl SkillEntry {
    /// Points plus modifier, the value added to a skill check.
    pub fn total(&self) -> i32 {
        self.points as i32 + self.modifier as i32
    }
}

/// Skill entries keyed by skill. Iteration follows catalog order.
pub type Skills = BTreeMap<Skill, SkillEntry>;

/// A character under construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub attributes: Attributes,
    pub skills: Skills,
    /// Classes the character currently qualifies for.
    pub selected_classes: BTreeSet<CharacterClass>,
}

impl Character {
    /// Entry for a skill. Missing entries read as zero points and zero modifier.
    pub fn skill(&self, skill: Skill) -> SkillEntry {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    /// Qualifying classes joined for display, e.g. "Barbarian, Bard".
    pub fn selected_class_label(&self) -> String {
        self.selected_classes
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_floors_negative_scores() {
        assert_eq!(modifier(0), -5);
        assert_eq!(modifier(1), -5);
        assert_eq!(modifier(7), -2);
        assert_eq!(modifier(8), -1);
        assert_eq!(modifier(9), -1);
        assert_eq!(modifier(10), 0);
        assert_eq!(modifier(11), 0);
        assert_eq!(modifier(12), 1);
        assert_eq!(modifier(20), 5);
        assert_eq!(modifier(255), 122);
    }

    #[test]
    fn test_attributes_get_set_total() {
        let mut attrs = Attributes::default();
        assert_eq!(attrs.total(), 60);

        attrs.set(Ability::Wisdom, 15);
        assert_eq!(attrs.get(Ability::Wisdom), 15);
        assert_eq!(attrs.modifier(Ability::Wisdom), 2);
        assert_eq!(attrs.total(), 65);

        let lowered = attrs.with(Ability::Strength, 3);
        assert_eq!(lowered.strength, 3);
        // `with` works on a copy
        assert_eq!(attrs.strength, 10);
    }

    #[test]
    fn test_skill_entry_total() {
        let entry = SkillEntry {
            points: 3,
            modifier: -1,
        };
        assert_eq!(entry.total(), 2);
    }

    #[test]
    fn test_selected_class_label() {
        let character = Character {
            attributes: Attributes::default(),
            skills: Skills::new(),
            selected_classes: [CharacterClass::Bard, CharacterClass::Barbarian]
                .into_iter()
                .collect(),
        };
        assert_eq!(character.selected_class_label(), "Barbarian, Bard");
        assert_eq!(character.skill(Skill::Arcana), SkillEntry::default());
    }
}
