//! Rules engine for a tabletop character builder.
//!
//! This crate provides:
//! - The attribute, skill and class catalogs
//! - Pure rules functions: skill modifiers, the skill point budget, deficit
//!   reconciliation and class eligibility
//! - A `CharacterStore` that installs the result of each change
//! - Skill checks for one character or the whole party
//!
//! # Quick Start
//!
//! ```
//! use charsheet_core::{Ability, CharacterStore, Delta, RulesEngine, Skill};
//!
//! let engine = RulesEngine::new();
//! let mut store = CharacterStore::new(&engine);
//!
//! for _ in 0..4 {
//!     store.on_change_attribute(&engine, 0, Ability::Intelligence, Delta::Increase);
//! }
//! assert_eq!(engine.max_available_points(store.get(0)), 18);
//!
//! if let Some(notice) = store.on_change_skill(&engine, 0, Skill::Arcana, Delta::Increase) {
//!     println!("{notice}");
//! }
//! ```

pub mod catalog;
pub mod character;
pub mod check;
pub mod config;
pub mod dice;
pub mod headless;
pub mod rules;
pub mod store;
pub mod testing;

// Primary public API
pub use catalog::{Ability, CharacterClass, Skill, ATTRIBUTES_SUM_MAX, ATTRIBUTE_INITIAL};
pub use character::{modifier, Attributes, Character, SkillEntry, Skills};
pub use check::{SkillCheck, SkillCheckResult};
pub use config::{ConfigError, RulesConfig};
pub use headless::{HeadlessConfig, HeadlessSession};
pub use rules::{
    compute_skills, current_spending_sum, update_selected_class_if_needed, ChangeOutcome, Delta,
    InvalidDelta, Notice, RulesEngine, Violation,
};
pub use store::CharacterStore;
