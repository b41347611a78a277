//! Fixed rules data: attributes, skills and classes.
//!
//! Catalogs are ordered. Skill order drives deficit reconciliation and
//! class order drives display, so both are exposed as arrays rather than maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum total of all six attribute scores.
pub const ATTRIBUTES_SUM_MAX: u32 = 70;

/// Score every attribute starts at.
pub const ATTRIBUTE_INITIAL: u8 = 10;

/// A name that does not match any catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownName {
    #[error("Unknown attribute: {0}")]
    Ability(String),
    #[error("Unknown skill: {0}")]
    Skill(String),
}

/// Lowercase and strip everything but letters, so "Sleight of Hand",
/// "sleight-of-hand" and "SLEIGHTOFHAND" all compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The six core attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Ability {
    type Err = UnknownName;

    /// Accepts the full name or the three-letter abbreviation, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Ability::all()
            .into_iter()
            .find(|a| normalize(a.name()) == wanted || normalize(a.abbreviation()) == wanted)
            .ok_or_else(|| UnknownName::Ability(s.to_string()))
    }
}

/// The eighteen skills, declared in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    /// The attribute whose modifier this skill uses.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Arcana => "Arcana",
            Skill::Athletics => "Athletics",
            Skill::Deception => "Deception",
            Skill::History => "History",
            Skill::Insight => "Insight",
            Skill::Intimidation => "Intimidation",
            Skill::Investigation => "Investigation",
            Skill::Medicine => "Medicine",
            Skill::Nature => "Nature",
            Skill::Perception => "Perception",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
            Skill::Religion => "Religion",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Survival => "Survival",
        }
    }

    /// All skills in catalog order.
    pub fn all() -> [Skill; 18] {
        [
            Skill::Acrobatics,
            Skill::AnimalHandling,
            Skill::Arcana,
            Skill::Athletics,
            Skill::Deception,
            Skill::History,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Medicine,
            Skill::Nature,
            Skill::Perception,
            Skill::Performance,
            Skill::Persuasion,
            Skill::Religion,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Survival,
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Skill {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Skill::all()
            .into_iter()
            .find(|skill| normalize(skill.name()) == wanted)
            .ok_or_else(|| UnknownName::Skill(s.to_string()))
    }
}

/// Character classes a character can qualify for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Wizard,
    Bard,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Bard => "Bard",
        }
    }

    pub fn all() -> [CharacterClass; 3] {
        [
            CharacterClass::Barbarian,
            CharacterClass::Wizard,
            CharacterClass::Bard,
        ]
    }

    /// Minimum score per attribute needed to qualify.
    pub fn requirements(&self) -> &'static [(Ability, u8)] {
        match self {
            CharacterClass::Barbarian => &[
                (Ability::Strength, 14),
                (Ability::Dexterity, 9),
                (Ability::Constitution, 9),
                (Ability::Intelligence, 9),
                (Ability::Wisdom, 9),
                (Ability::Charisma, 9),
            ],
            CharacterClass::Wizard => &[
                (Ability::Strength, 9),
                (Ability::Dexterity, 9),
                (Ability::Constitution, 9),
                (Ability::Intelligence, 14),
                (Ability::Wisdom, 9),
                (Ability::Charisma, 9),
            ],
            CharacterClass::Bard => &[
                (Ability::Strength, 9),
                (Ability::Dexterity, 9),
                (Ability::Constitution, 9),
                (Ability::Intelligence, 9),
                (Ability::Wisdom, 9),
                (Ability::Charisma, 14),
            ],
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
