//! Skill checks for a single character or the whole party.
//!
//! A check rolls a d20 and adds the skill total (points plus modifier).
//! It succeeds when the result meets or beats the DC.

use crate::catalog::Skill;
use crate::character::Character;
use crate::dice::{roll_d20_with_rng, Advantage, D20Roll};
use crate::store::CharacterStore;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    pub skill: Skill,
    pub dc: i32,
    pub advantage: Advantage,
}

impl SkillCheck {
    pub fn new(skill: Skill, dc: i32) -> Self {
        Self {
            skill,
            dc,
            advantage: Advantage::Normal,
        }
    }

    pub fn with_advantage(mut self, advantage: Advantage) -> Self {
        self.advantage = advantage;
        self
    }
}

/// Outcome of a skill check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheckResult {
    /// Index of the character that rolled.
    pub character_index: usize,
    pub skill: Skill,
    pub roll: D20Roll,
    /// Skill total added to the die.
    pub bonus: i32,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

impl fmt::Display for SkillCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Character {} {} check: {} {:+} = {} vs DC {} ({})",
            self.character_index + 1,
            self.skill,
            self.roll,
            self.bonus,
            self.total,
            self.dc,
            if self.success { "success" } else { "failure" }
        )
    }
}

/// Roll `check` for one character.
pub fn skill_check_with_rng<R: Rng>(
    character: &Character,
    character_index: usize,
    check: &SkillCheck,
    rng: &mut R,
) -> SkillCheckResult {
    let bonus = character.skill(check.skill).total();
    let roll = roll_d20_with_rng(check.advantage, rng);
    let total = roll.kept as i32 + bonus;
    tracing::debug!(
        character_index,
        skill = %check.skill,
        kept = roll.kept,
        total,
        dc = check.dc,
        "skill check"
    );
    SkillCheckResult {
        character_index,
        skill: check.skill,
        roll,
        bonus,
        total,
        dc: check.dc,
        success: total >= check.dc,
    }
}

/// Index of the character best at `skill`; ties go to the earliest.
pub fn best_in_party(store: &CharacterStore, skill: Skill) -> Option<usize> {
    store
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, i32)>, (index, character)| {
            let total = character.skill(skill).total();
            match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((index, total)),
            }
        })
        .map(|(index, _)| index)
}

/// Roll `check` for whichever character has the highest skill total.
///
/// Returns `None` when the store is empty.
pub fn party_skill_check_with_rng<R: Rng>(
    store: &CharacterStore,
    check: &SkillCheck,
    rng: &mut R,
) -> Option<SkillCheckResult> {
    let index = best_in_party(store, check.skill)?;
    Some(skill_check_with_rng(store.get(index), index, check, rng))
}
