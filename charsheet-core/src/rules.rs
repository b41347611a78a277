//! Attribute, skill and class rules.
//!
//! Every operation here is pure: it reads a [`Character`] and returns a new
//! one. The pipeline for an attribute change is
//!
//! 1. reject if the attribute cap would be exceeded or the score would go below 0
//! 2. apply the delta
//! 3. recompute skill modifiers, keeping allocated points
//! 4. trim skill points back inside the (possibly smaller) budget
//! 5. recompute class eligibility
//!
//! A skill change only checks the budget and clamps at zero.

use crate::catalog::{Ability, CharacterClass, Skill};
use crate::character::{modifier, Attributes, Character, SkillEntry, Skills};
use crate::config::RulesConfig;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// A single step up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delta {
    Increase,
    Decrease,
}

impl Delta {
    pub fn value(&self) -> i32 {
        match self {
            Delta::Increase => 1,
            Delta::Decrease => -1,
        }
    }
}

/// Text that is not a recognised [`Delta`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected + or -, got '{0}'")]
pub struct InvalidDelta(pub String);

impl FromStr for Delta {
    type Err = InvalidDelta;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "+1" | "up" | "inc" => Ok(Delta::Increase),
            "-" | "-1" | "down" | "dec" => Ok(Delta::Decrease),
            other => Err(InvalidDelta(other.to_string())),
        }
    }
}

/// A user-facing message for a rejected change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The attribute total is already at the cap.
    AttributeCapReached { max: u32 },
    /// Every available skill point has been spent.
    SkillPointsExhausted { available: u32 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::AttributeCapReached { .. } => write!(
                f,
                "You've reached max attributes. You'll have to lower other attributes first."
            ),
            Notice::SkillPointsExhausted { available } => {
                write!(f, "You've used all available points: {available}")
            }
        }
    }
}

/// Result of asking for a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The change went through; this is the new character.
    Applied(Character),
    /// Nothing changed. Capacity violations carry a notice for the user,
    /// going below zero on an attribute does not.
    Rejected(Option<Notice>),
}

impl ChangeOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ChangeOutcome::Applied(_) => None,
            ChangeOutcome::Rejected(notice) => *notice,
        }
    }

    pub fn into_character(self) -> Option<Character> {
        match self {
            ChangeOutcome::Applied(character) => Some(character),
            ChangeOutcome::Rejected(_) => None,
        }
    }
}

/// A broken character invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{skill} has no entry")]
    MissingSkill { skill: Skill },
    #[error("{skill} modifier is {actual}, expected {expected}")]
    ModifierMismatch {
        skill: Skill,
        expected: i8,
        actual: i8,
    },
    #[error("{spent} skill points spent but only {available} available")]
    OverBudget { spent: u32, available: u32 },
    #[error("attributes sum to {total}, above the cap of {max}")]
    AttributeSumExceeded { total: u32, max: u32 },
    #[error("selected classes [{actual}] differ from qualifying classes [{expected}]")]
    ClassMismatch { expected: String, actual: String },
}

/// Derive skill entries from attributes.
///
/// Points are carried over from `existing` where present; modifiers always
/// come from the governing attribute. The result covers exactly the skill
/// catalog.
pub fn compute_skills(attributes: &Attributes, existing: Option<&Skills>) -> Skills {
    Skill::all()
        .into_iter()
        .map(|skill| {
            let points = existing
                .and_then(|skills| skills.get(&skill))
                .map(|entry| entry.points)
                .unwrap_or(0);
            let entry = SkillEntry {
                points,
                modifier: modifier(attributes.get(skill.ability())),
            };
            (skill, entry)
        })
        .collect()
}

/// Total points allocated across all skills.
pub fn current_spending_sum(character: &Character) -> u32 {
    character.skills.values().map(|entry| entry.points).sum()
}

/// Whether the attributes meet every minimum the class requires.
pub fn qualifies_for(attributes: &Attributes, class: CharacterClass) -> bool {
    class
        .requirements()
        .iter()
        .all(|(ability, minimum)| attributes.get(*ability) >= *minimum)
}

/// Every class the attributes qualify for.
pub fn eligible_classes(attributes: &Attributes) -> BTreeSet<CharacterClass> {
    CharacterClass::all()
        .into_iter()
        .filter(|class| qualifies_for(attributes, *class))
        .collect()
}

/// Copy of the character with `selected_classes` matching its attributes.
pub fn update_selected_class_if_needed(character: &Character) -> Character {
    let eligible = eligible_classes(&character.attributes);
    if eligible == character.selected_classes {
        return character.clone();
    }
    debug!(
        from = ?character.selected_classes,
        to = ?eligible,
        "class eligibility changed"
    );
    Character {
        selected_classes: eligible,
        ..character.clone()
    }
}

/// Applies the character rules under a fixed [`RulesConfig`].
///
/// The engine holds no character state; callers keep characters in a
/// [`crate::store::CharacterStore`] or wherever they like.
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    config: RulesConfig,
}

impl RulesEngine {
    /// Engine with the standard rules.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// A fresh character: every attribute at the initial score, no points spent.
    pub fn new_character(&self) -> Character {
        let attributes = Attributes::uniform(self.config.attribute_initial);
        Character {
            skills: compute_skills(&attributes, None),
            selected_classes: eligible_classes(&attributes),
            attributes,
        }
    }

    /// Skill point budget, `max(per_mod * INT modifier + base, 0)`.
    pub fn max_available_points(&self, character: &Character) -> u32 {
        let int_mod = character.attributes.modifier(Ability::Intelligence) as i64;
        let budget = self.config.skill_points_per_int_modifier as i64 * int_mod
            + self.config.base_skill_points as i64;
        budget.clamp(0, u32::MAX as i64) as u32
    }

    /// Trim skill points until spending fits the budget.
    ///
    /// Passes over the skills in catalog order taking one point from each
    /// skill that has any, stopping as soon as the deficit is covered. If a
    /// whole pass removes nothing the remaining deficit is left in place.
    pub fn fix_spending_deficit_if_any(&self, character: &Character) -> Character {
        let budget = self.max_available_points(character) as i64;
        let mut remainder = budget - current_spending_sum(character) as i64;
        if remainder >= 0 {
            return character.clone();
        }

        let deficit = -remainder;
        let mut skills = character.skills.clone();
        while remainder < 0 {
            let mut removed_this_pass = false;
            for skill in Skill::all() {
                if remainder >= 0 {
                    break;
                }
                if let Some(entry) = skills.get_mut(&skill) {
                    if entry.points > 0 {
                        entry.points -= 1;
                        remainder += 1;
                        removed_this_pass = true;
                    }
                }
            }
            if !removed_this_pass {
                tracing::warn!(
                    residual = -remainder,
                    "skill deficit could not be fully reconciled"
                );
                break;
            }
        }

        debug!(deficit, budget, "reconciled skill point deficit");
        Character {
            skills,
            ..character.clone()
        }
    }

    /// Raise or lower one attribute, running the full recompute pipeline.
    pub fn change_attribute(
        &self,
        character: &Character,
        ability: Ability,
        delta: Delta,
    ) -> ChangeOutcome {
        let total = character.attributes.total() as i64;
        let max = self.config.attribute_sum_max;
        if total + delta.value() as i64 > max as i64 {
            debug!(%ability, total, max, "attribute change rejected: cap reached");
            return ChangeOutcome::Rejected(Some(Notice::AttributeCapReached { max }));
        }

        let current = character.attributes.get(ability);
        let Some(score) = current.checked_add_signed(delta.value() as i8) else {
            debug!(%ability, current, "attribute change rejected: out of range");
            return ChangeOutcome::Rejected(None);
        };

        let attributes = character.attributes.with(ability, score);
        let recomputed = Character {
            skills: compute_skills(&attributes, Some(&character.skills)),
            attributes,
            selected_classes: character.selected_classes.clone(),
        };
        let reconciled = self.fix_spending_deficit_if_any(&recomputed);
        ChangeOutcome::Applied(update_selected_class_if_needed(&reconciled))
    }

    /// Spend or refund one point on a skill.
    ///
    /// Refunding at zero points is a no-op rather than a rejection.
    pub fn change_skill(&self, character: &Character, skill: Skill, delta: Delta) -> ChangeOutcome {
        let spent = current_spending_sum(character) as i64;
        let available = self.max_available_points(character);
        if spent + delta.value() as i64 > available as i64 {
            debug!(%skill, spent, available, "skill change rejected: budget exhausted");
            return ChangeOutcome::Rejected(Some(Notice::SkillPointsExhausted { available }));
        }

        let entry = character.skill(skill);
        let mut skills = character.skills.clone();
        skills.insert(
            skill,
            SkillEntry {
                points: entry.points.saturating_add_signed(delta.value()),
                ..entry
            },
        );
        ChangeOutcome::Applied(Character {
            skills,
            ..character.clone()
        })
    }

    /// Every invariant the character currently breaks. Empty when valid.
    pub fn violations(&self, character: &Character) -> Vec<Violation> {
        let mut violations = Vec::new();

        for skill in Skill::all() {
            match character.skills.get(&skill) {
                None => violations.push(Violation::MissingSkill { skill }),
                Some(entry) => {
                    let expected = character.attributes.modifier(skill.ability());
                    if entry.modifier != expected {
                        violations.push(Violation::ModifierMismatch {
                            skill,
                            expected,
                            actual: entry.modifier,
                        });
                    }
                }
            }
        }

        let spent = current_spending_sum(character);
        let available = self.max_available_points(character);
        if spent > available {
            violations.push(Violation::OverBudget { spent, available });
        }

        let total = character.attributes.total();
        if total > self.config.attribute_sum_max {
            violations.push(Violation::AttributeSumExceeded {
                total,
                max: self.config.attribute_sum_max,
            });
        }

        let expected = eligible_classes(&character.attributes);
        if expected != character.selected_classes {
            let label = |set: &BTreeSet<CharacterClass>| {
                set.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
            };
            violations.push(Violation::ClassMismatch {
                expected: label(&expected),
                actual: label(&character.selected_classes),
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_points(character: &Character, allocation: &[(Skill, u32)]) -> Character {
        let mut skills = character.skills.clone();
        for (skill, points) in allocation {
            if let Some(entry) = skills.get_mut(skill) {
                entry.points = *points;
            }
        }
        Character {
            skills,
            ..character.clone()
        }
    }

    #[test]
    fn test_fresh_character() {
        let engine = RulesEngine::new();
        let character = engine.new_character();

        assert_eq!(character.attributes.total(), 60);
        assert_eq!(character.skills.len(), 18);
        assert!(character.skills.values().all(|e| e.modifier == 0 && e.points == 0));
        assert_eq!(engine.max_available_points(&character), 10);
        assert!(character.selected_classes.is_empty());
        assert!(engine.violations(&character).is_empty());
    }

    #[test]
    fn test_compute_skills_keeps_points() {
        let attributes = Attributes::new(16, 8, 10, 10, 13, 10);
        let mut existing = Skills::new();
        existing.insert(
            Skill::Athletics,
            SkillEntry {
                points: 3,
                modifier: 0,
            },
        );

        let skills = compute_skills(&attributes, Some(&existing));
        assert_eq!(skills.len(), 18);
        assert_eq!(
            skills[&Skill::Athletics],
            SkillEntry {
                points: 3,
                modifier: 3
            }
        );
        assert_eq!(skills[&Skill::Stealth].modifier, -1);
        assert_eq!(skills[&Skill::Stealth].points, 0);
        assert_eq!(skills[&Skill::Insight].modifier, 1);
    }

    #[test]
    fn test_budget_never_negative() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        for int in 0..=u8::MAX {
            character.attributes.intelligence = int;
            let expected = (4 * modifier(int) as i32 + 10).max(0) as u32;
            assert_eq!(engine.max_available_points(&character), expected);
        }
        character.attributes.intelligence = 0;
        assert_eq!(engine.max_available_points(&character), 0);
        character.attributes.intelligence = 7;
        // 4 * -2 + 10
        assert_eq!(engine.max_available_points(&character), 2);
    }

    #[test]
    fn test_spending_sum() {
        let engine = RulesEngine::new();
        let character = with_points(
            &engine.new_character(),
            &[(Skill::Arcana, 2), (Skill::Stealth, 5)],
        );
        assert_eq!(current_spending_sum(&character), 7);
    }

    #[test]
    fn test_deficit_spread_in_catalog_order() {
        let engine = RulesEngine::new();
        // INT 8: budget 6
        let mut character = with_points(
            &engine.new_character(),
            &[
                (Skill::Acrobatics, 1),
                (Skill::Arcana, 5),
                (Skill::Stealth, 4),
            ],
        );
        character.attributes.intelligence = 8;
        character.skills = compute_skills(&character.attributes, Some(&character.skills));

        let fixed = engine.fix_spending_deficit_if_any(&character);
        // Pass 1 takes Acrobatics, Arcana, Stealth; pass 2 takes Arcana
        assert_eq!(fixed.skill(Skill::Acrobatics).points, 0);
        assert_eq!(fixed.skill(Skill::Arcana).points, 3);
        assert_eq!(fixed.skill(Skill::Stealth).points, 3);
        assert_eq!(current_spending_sum(&fixed), 6);
        assert_eq!(fixed.attributes, character.attributes);
    }

    #[test]
    fn test_deficit_stops_mid_pass() {
        let engine = RulesEngine::new();
        let mut character = with_points(
            &engine.new_character(),
            &[
                (Skill::Acrobatics, 3),
                (Skill::Arcana, 3),
                (Skill::Stealth, 4),
            ],
        );
        // INT 9: budget 6, deficit 4
        character.attributes.intelligence = 9;

        let fixed = engine.fix_spending_deficit_if_any(&character);
        assert_eq!(fixed.skill(Skill::Acrobatics).points, 1);
        assert_eq!(fixed.skill(Skill::Arcana).points, 2);
        assert_eq!(fixed.skill(Skill::Stealth).points, 3);
    }

    #[test]
    fn test_no_deficit_is_identity() {
        let engine = RulesEngine::new();
        let character = with_points(&engine.new_character(), &[(Skill::History, 10)]);
        assert_eq!(engine.fix_spending_deficit_if_any(&character), character);
    }

    #[test]
    fn test_class_eligibility_threshold() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        character.attributes.strength = 13;
        character = update_selected_class_if_needed(&character);
        assert!(!character.selected_classes.contains(&CharacterClass::Barbarian));

        character.attributes.strength = 14;
        character = update_selected_class_if_needed(&character);
        assert!(character.selected_classes.contains(&CharacterClass::Barbarian));
        assert_eq!(character.selected_classes.len(), 1);
    }

    #[test]
    fn test_class_requirement_below_minimum() {
        // Barbarian also needs 9 everywhere else
        let attributes = Attributes::new(14, 8, 10, 10, 10, 10);
        assert!(!qualifies_for(&attributes, CharacterClass::Barbarian));
        let attributes = Attributes::new(14, 9, 10, 10, 10, 10);
        assert!(qualifies_for(&attributes, CharacterClass::Barbarian));
    }

    #[test]
    fn test_class_update_idempotent() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        character.attributes = Attributes::new(14, 9, 9, 14, 9, 14);
        let once = update_selected_class_if_needed(&character);
        let twice = update_selected_class_if_needed(&once);
        assert_eq!(once, twice);
        assert_eq!(once.selected_classes.len(), 3);
    }

    #[test]
    fn test_attribute_cap() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        character.attributes.charisma = 20;
        character = update_selected_class_if_needed(&character);
        assert_eq!(character.attributes.total(), 70);

        let outcome = engine.change_attribute(&character, Ability::Strength, Delta::Increase);
        assert_eq!(
            outcome,
            ChangeOutcome::Rejected(Some(Notice::AttributeCapReached { max: 70 }))
        );

        // Lowering is still allowed at the cap
        let outcome = engine.change_attribute(&character, Ability::Charisma, Delta::Decrease);
        assert_eq!(outcome.into_character().unwrap().attributes.charisma, 19);
    }

    #[test]
    fn test_attribute_below_zero_rejected_silently() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        character.attributes.wisdom = 0;
        let outcome = engine.change_attribute(&character, Ability::Wisdom, Delta::Decrease);
        assert_eq!(outcome, ChangeOutcome::Rejected(None));
        assert_eq!(outcome.notice(), None);
    }

    #[test]
    fn test_attribute_change_updates_modifiers_and_classes() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        for _ in 0..4 {
            character = engine
                .change_attribute(&character, Ability::Charisma, Delta::Increase)
                .into_character()
                .unwrap();
        }
        assert_eq!(character.skill(Skill::Persuasion).modifier, 2);
        assert_eq!(character.skill(Skill::Stealth).modifier, 0);
        assert!(character.selected_classes.contains(&CharacterClass::Bard));
        assert!(engine.violations(&character).is_empty());
    }

    #[test]
    fn test_skill_budget_notice() {
        let engine = RulesEngine::new();
        let character = with_points(&engine.new_character(), &[(Skill::Nature, 10)]);
        let outcome = engine.change_skill(&character, Skill::Medicine, Delta::Increase);
        assert_eq!(outcome.notice(), Some(Notice::SkillPointsExhausted { available: 10 }));
        assert_eq!(
            outcome.notice().unwrap().to_string(),
            "You've used all available points: 10"
        );
    }

    #[test]
    fn test_skill_decrease_at_zero_clamps() {
        let engine = RulesEngine::new();
        let character = engine.new_character();
        let outcome = engine.change_skill(&character, Skill::Religion, Delta::Decrease);
        assert_eq!(outcome, ChangeOutcome::Applied(character));
    }

    #[test]
    fn test_skill_change_leaves_modifier_alone() {
        let engine = RulesEngine::new();
        let mut character = engine.new_character();
        character.attributes.dexterity = 14;
        character.skills = compute_skills(&character.attributes, None);

        let updated = engine
            .change_skill(&character, Skill::Stealth, Delta::Increase)
            .into_character()
            .unwrap();
        assert_eq!(
            updated.skill(Skill::Stealth),
            SkillEntry {
                points: 1,
                modifier: 2
            }
        );
    }

    #[test]
    fn test_violations_reported() {
        let engine = RulesEngine::new();
        let mut character = with_points(&engine.new_character(), &[(Skill::Arcana, 11)]);
        character.attributes.strength = 21;
        character.skills.get_mut(&Skill::Survival).unwrap().modifier = 4;

        let violations = engine.violations(&character);
        assert!(violations.contains(&Violation::OverBudget {
            spent: 11,
            available: 10
        }));
        assert!(violations.contains(&Violation::AttributeSumExceeded { total: 71, max: 70 }));
        assert!(violations.iter().any(|v| matches!(
            v,
            Violation::ModifierMismatch {
                skill: Skill::Survival,
                ..
            }
        )));
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::ClassMismatch { .. })));
    }

    #[test]
    fn test_delta_parse() {
        assert_eq!("+".parse::<Delta>(), Ok(Delta::Increase));
        assert_eq!("-1".parse::<Delta>(), Ok(Delta::Decrease));
        let err = "*".parse::<Delta>().unwrap_err();
        assert_eq!(err, InvalidDelta("*".to_string()));
        assert_eq!(err.to_string(), "Expected + or -, got '*'");
    }

    #[test]
    fn test_custom_config_budget() {
        let engine = RulesEngine::with_config(
            RulesConfig::new()
                .with_base_skill_points(6)
                .with_skill_points_per_int_modifier(2),
        );
        let mut character = engine.new_character();
        assert_eq!(engine.max_available_points(&character), 6);
        character.attributes.intelligence = 14;
        assert_eq!(engine.max_available_points(&character), 10);
    }

    #[test]
    fn test_largest_cap_ends_in_notice() {
        let rules = RulesConfig::new().with_attribute_sum_max(1530);
        rules.validate().unwrap();
        let engine = RulesEngine::with_config(rules);
        let mut character = engine.new_character();
        character.attributes = Attributes::uniform(u8::MAX).with(Ability::Strength, 254);

        let character = engine
            .change_attribute(&character, Ability::Strength, Delta::Increase)
            .into_character()
            .unwrap();
        assert_eq!(character.attributes.total(), 1530);
        assert_eq!(
            engine
                .change_attribute(&character, Ability::Strength, Delta::Increase)
                .notice(),
            Some(Notice::AttributeCapReached { max: 1530 })
        );
    }

    #[test]
    fn test_extreme_config_budget_does_not_overflow() {
        let rules = RulesConfig::from_toml_str("skill_points_per_int_modifier = 2147483647\n").unwrap();
        let engine = RulesEngine::with_config(rules);
        let mut character = engine.new_character();
        assert_eq!(engine.max_available_points(&character), 10);

        for _ in 0..2 {
            character = engine
                .change_attribute(&character, Ability::Intelligence, Delta::Increase)
                .into_character()
                .unwrap();
        }
        assert_eq!(
            engine.max_available_points(&character),
            i32::MAX as u32 + 10
        );

        // Clamped to the u32 range at both ends
        character.attributes.intelligence = u8::MAX;
        assert_eq!(engine.max_available_points(&character), u32::MAX);
        let engine = RulesEngine::with_config(
            RulesConfig::new()
                .with_base_skill_points(i32::MIN)
                .with_skill_points_per_int_modifier(i32::MAX),
        );
        character.attributes.intelligence = 0;
        assert_eq!(engine.max_available_points(&character), 0);
    }
}
