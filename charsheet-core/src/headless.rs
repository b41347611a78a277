//! Headless interface for programmatic use.
//!
//! Drives a [`CharacterStore`] from one-line text commands. It is designed for:
//! - Scripted sessions piped through stdin
//! - Integration tests that exercise the whole pipeline through text
//!
//! # Example
//!
//! ```
//! use charsheet_core::headless::{HeadlessConfig, HeadlessSession};
//!
//! let mut session = HeadlessSession::new(HeadlessConfig::default().with_seed(7)).unwrap();
//! session.send("attr int +").unwrap();
//! let reply = session.send("skill arcana +").unwrap();
//! assert!(reply.notice.is_none());
//! assert_eq!(session.store().get(0).attributes.intelligence, 11);
//! ```

use crate::catalog::{Ability, CharacterClass, Skill, UnknownName};
use crate::character::Character;
use crate::check::{party_skill_check_with_rng, skill_check_with_rng, SkillCheck};
use crate::config::{ConfigError, RulesConfig};
use crate::dice::Advantage;
use crate::rules::{current_spending_sum, qualifies_for, Delta, InvalidDelta, Notice, RulesEngine};
use crate::store::CharacterStore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing or running a headless command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("Invalid {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
    #[error(transparent)]
    UnknownName(#[from] UnknownName),
    #[error("No character {0}")]
    NoSuchCharacter(usize),
    #[error("No characters; use 'add' first")]
    NoCharacters,
    #[error("Failed to serialize character: {0}")]
    Json(#[from] serde_json::Error),
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Attribute { ability: Ability, delta: Delta },
    Skill { skill: Skill, delta: Delta },
    /// Select a character by its 1-based number.
    Select(usize),
    Add,
    Remove,
    Check(SkillCheck),
    Party(SkillCheck),
    Show,
    Json,
    Help,
    Quit,
}

fn next_arg<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    parts
        .next()
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_delta<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<Delta, CommandError> {
    next_arg(parts, command, "+ or -")?
        .parse()
        .map_err(|e: InvalidDelta| CommandError::InvalidArgument {
            argument: "delta",
            reason: e.to_string(),
        })
}

fn parse_check<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<SkillCheck, CommandError> {
    let skill: Skill = next_arg(parts, command, "skill")?.parse()?;
    let dc: i32 = next_arg(parts, command, "DC")?
        .parse()
        .map_err(|e: std::num::ParseIntError| CommandError::InvalidArgument {
            argument: "DC",
            reason: e.to_string(),
        })?;
    let advantage = match parts.next() {
        Some(word) => word
            .parse::<Advantage>()
            .map_err(|e| CommandError::InvalidArgument {
                argument: "advantage",
                reason: e.to_string(),
            })?,
        None => Advantage::Normal,
    };
    Ok(SkillCheck::new(skill, dc).with_advantage(advantage))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let word = parts.next().ok_or(CommandError::Empty)?;

        match word.to_ascii_lowercase().as_str() {
            "attr" | "attribute" | "a" => {
                let ability = next_arg(&mut parts, "attr", "attribute")?.parse()?;
                let delta = parse_delta(&mut parts, "attr")?;
                Ok(Command::Attribute { ability, delta })
            }
            "skill" | "s" => {
                let skill = next_arg(&mut parts, "skill", "skill")?.parse()?;
                let delta = parse_delta(&mut parts, "skill")?;
                Ok(Command::Skill { skill, delta })
            }
            "select" | "sel" => {
                let number = next_arg(&mut parts, "select", "character number")?;
                let number: usize =
                    number
                        .parse()
                        .map_err(|_| CommandError::InvalidArgument {
                            argument: "character number",
                            reason: format!("'{number}' is not a positive number"),
                        })?;
                if number == 0 {
                    return Err(CommandError::NoSuchCharacter(0));
                }
                Ok(Command::Select(number))
            }
            "add" | "new" => Ok(Command::Add),
            "remove" | "rm" => Ok(Command::Remove),
            "check" => Ok(Command::Check(parse_check(&mut parts, "check")?)),
            "party" => Ok(Command::Party(parse_check(&mut parts, "party")?)),
            "show" | "ls" => Ok(Command::Show),
            "json" => Ok(Command::Json),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::UnknownCommand(word.to_string())),
        }
    }
}

/// Configuration for a headless session.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Rules to build characters under.
    pub rules: RulesConfig,
    /// Number of characters to start with.
    pub characters: usize,
    /// Seed for skill-check dice. Random when unset.
    pub seed: Option<u64>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            characters: 1,
            seed: None,
        }
    }
}

impl HeadlessConfig {
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_characters(mut self, characters: usize) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Response to one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Text to print.
    pub lines: Vec<String>,
    /// Set when a change was refused for capacity reasons.
    pub notice: Option<Notice>,
    /// Set by `quit`.
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            ..Self::default()
        }
    }
}

/// A headless character-building session.
pub struct HeadlessSession {
    engine: RulesEngine,
    store: CharacterStore,
    selected: usize,
    rng: ChaCha8Rng,
}

impl HeadlessSession {
    pub fn new(config: HeadlessConfig) -> Result<Self, ConfigError> {
        config.rules.validate()?;
        let engine = RulesEngine::with_config(config.rules);
        let characters = (0..config.characters)
            .map(|_| engine.new_character())
            .collect();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            engine,
            store: CharacterStore::with_characters(characters),
            selected: 0,
            rng,
        })
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    pub fn store(&self) -> &CharacterStore {
        &self.store
    }

    /// Index of the selected character, if there are any characters.
    pub fn selected(&self) -> Option<usize> {
        (self.selected < self.store.len()).then_some(self.selected)
    }

    /// Parse and run one line.
    pub fn send(&mut self, line: &str) -> Result<Reply, CommandError> {
        let command: Command = line.parse()?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        match command {
            Command::Attribute { ability, delta } => {
                let index = self.selected().ok_or(CommandError::NoCharacters)?;
                let notice = self
                    .store
                    .on_change_attribute(&self.engine, index, ability, delta);
                Ok(self.change_reply(index, notice))
            }
            Command::Skill { skill, delta } => {
                let index = self.selected().ok_or(CommandError::NoCharacters)?;
                let notice = self.store.on_change_skill(&self.engine, index, skill, delta);
                Ok(self.change_reply(index, notice))
            }
            Command::Select(number) => {
                if number == 0 || number > self.store.len() {
                    return Err(CommandError::NoSuchCharacter(number));
                }
                self.selected = number - 1;
                Ok(Reply::line(format!("Selected character {number}")))
            }
            Command::Add => {
                self.selected = self.store.add_character(&self.engine);
                Ok(Reply::line(format!(
                    "Added character {}",
                    self.selected + 1
                )))
            }
            Command::Remove => {
                let index = self.selected().ok_or(CommandError::NoCharacters)?;
                self.store.remove_character(index);
                self.selected = index.min(self.store.len().saturating_sub(1));
                Ok(Reply::line(format!(
                    "Removed character {} ({} left)",
                    index + 1,
                    self.store.len()
                )))
            }
            Command::Check(check) => {
                let index = self.selected().ok_or(CommandError::NoCharacters)?;
                let result =
                    skill_check_with_rng(self.store.get(index), index, &check, &mut self.rng);
                Ok(Reply::line(result.to_string()))
            }
            Command::Party(check) => {
                let result = party_skill_check_with_rng(&self.store, &check, &mut self.rng)
                    .ok_or(CommandError::NoCharacters)?;
                Ok(Reply::line(format!("Party check: {result}")))
            }
            Command::Show => {
                let index = self.selected().ok_or(CommandError::NoCharacters)?;
                Ok(Reply {
                    lines: sheet_lines(&self.engine, self.store.get(index), index),
                    ..Reply::default()
                })
            }
            Command::Json => {
                let index = self.selected().ok_or(CommandError::NoCharacters)?;
                let json = serde_json::to_string_pretty(self.store.get(index))?;
                Ok(Reply::line(json))
            }
            Command::Help => Ok(Reply {
                lines: HELP.lines().map(str::to_string).collect(),
                ..Reply::default()
            }),
            Command::Quit => Ok(Reply {
                quit: true,
                ..Reply::default()
            }),
        }
    }

    fn change_reply(&self, index: usize, notice: Option<Notice>) -> Reply {
        let character = self.store.get(index);
        let mut lines = Vec::new();
        match notice {
            Some(notice) => lines.push(format!("! {notice}")),
            None => lines.push(summary_line(&self.engine, character, index)),
        }
        for violation in self.engine.violations(character) {
            lines.push(format!("warning: {violation}"));
        }
        Reply {
            lines,
            notice,
            quit: false,
        }
    }
}

const HELP: &str = "\
Commands:
  attr <attribute> <+|->          raise or lower an attribute (e.g. attr int +)
  skill <skill> <+|->             spend or refund a skill point (e.g. skill sleight-of-hand +)
  select <n>                      select character n
  add                             add a new character and select it
  remove                          remove the selected character
  check <skill> <dc> [adv|dis]    roll a skill check for the selected character
  party <skill> <dc> [adv|dis]    roll for whoever is best at the skill
  show                            print the selected character
  json                            print the selected character as JSON
  quit                            exit";

/// One-line summary: attributes, budget and classes.
pub fn summary_line(engine: &RulesEngine, character: &Character, index: usize) -> String {
    let attributes: Vec<String> = Ability::all()
        .iter()
        .map(|a| format!("{} {}", a.abbreviation(), character.attributes.get(*a)))
        .collect();
    let classes = if character.selected_classes.is_empty() {
        "none".to_string()
    } else {
        character.selected_class_label()
    };
    format!(
        "#{} {} | points {}/{} | classes: {}",
        index + 1,
        attributes.join(" "),
        current_spending_sum(character),
        engine.max_available_points(character),
        classes
    )
}

/// Full text sheet for a character.
pub fn sheet_lines(engine: &RulesEngine, character: &Character, index: usize) -> Vec<String> {
    let mut lines = vec![format!("Character {}", index + 1), "Attributes:".to_string()];
    for ability in Ability::all() {
        lines.push(format!(
            "  {:<13} {:>3} (Modifier: {:+})",
            ability.name(),
            character.attributes.get(ability),
            character.attributes.modifier(ability)
        ));
    }
    lines.push(format!(
        "Attribute total: {}/{}",
        character.attributes.total(),
        engine.config().attribute_sum_max
    ));

    lines.push("Classes:".to_string());
    for class in CharacterClass::all() {
        let marker = if qualifies_for(&character.attributes, class) {
            "*"
        } else {
            " "
        };
        lines.push(format!("  {marker} {}", class.name()));
    }

    lines.push(format!(
        "Skills (points {}/{}):",
        current_spending_sum(character),
        engine.max_available_points(character)
    ));
    for skill in Skill::all() {
        let entry = character.skill(skill);
        lines.push(format!(
            "  {:<16} {:>2} (Modifier: {} {:+}) total: {}",
            skill.name(),
            entry.points,
            skill.ability().abbreviation(),
            entry.modifier,
            entry.total()
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> HeadlessSession {
        HeadlessSession::new(HeadlessConfig::default().with_seed(11)).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "attr STR +".parse::<Command>().unwrap(),
            Command::Attribute {
                ability: Ability::Strength,
                delta: Delta::Increase
            }
        );
        assert_eq!(
            "skill animal-handling -".parse::<Command>().unwrap(),
            Command::Skill {
                skill: Skill::AnimalHandling,
                delta: Delta::Decrease
            }
        );
        assert_eq!(
            "check stealth 12 dis".parse::<Command>().unwrap(),
            Command::Check(
                SkillCheck::new(Skill::Stealth, 12).with_advantage(Advantage::Disadvantage)
            )
        );
        assert_eq!("select 2".parse::<Command>().unwrap(), Command::Select(2));
        assert_eq!("Q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<Command>(), Err(CommandError::Empty)));
        assert!(matches!(
            "dance".parse::<Command>(),
            Err(CommandError::UnknownCommand(_))
        ));
        assert!(matches!(
            "attr".parse::<Command>(),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            "attr luck +".parse::<Command>(),
            Err(CommandError::UnknownName(UnknownName::Ability(_)))
        ));
        assert!(matches!(
            "skill arcana x".parse::<Command>(),
            Err(CommandError::InvalidArgument { .. })
        ));
        match "skill arcana sideways".parse::<Command>() {
            Err(CommandError::InvalidArgument { argument, reason }) => {
                assert_eq!(argument, "delta");
                assert_eq!(reason, "Expected + or -, got 'sideways'");
            }
            other => panic!("expected an invalid delta, got {other:?}"),
        }
        assert!(matches!(
            "check arcana 10 lucky".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                argument: "advantage",
                ..
            })
        ));
        assert!(matches!(
            "check arcana hard".parse::<Command>(),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "select 0".parse::<Command>(),
            Err(CommandError::NoSuchCharacter(0))
        ));
    }

    #[test]
    fn test_notice_surfaces_in_reply() {
        let mut session = session();
        for _ in 0..10 {
            session.send("attr dex +").unwrap();
        }
        let reply = session.send("attr dex +").unwrap();
        assert_eq!(reply.notice, Some(Notice::AttributeCapReached { max: 70 }));
        assert!(reply.lines[0].starts_with("! You've reached max attributes"));
    }

    #[test]
    fn test_add_select_remove() {
        let mut session = session();
        session.send("add").unwrap();
        assert_eq!(session.selected(), Some(1));
        session.send("attr cha +").unwrap();
        session.send("select 1").unwrap();
        assert_eq!(session.selected(), Some(0));
        assert!(matches!(
            session.send("select 3"),
            Err(CommandError::NoSuchCharacter(3))
        ));

        session.send("remove").unwrap();
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().get(0).attributes.charisma, 11);

        session.send("remove").unwrap();
        assert_eq!(session.selected(), None);
        assert!(matches!(
            session.send("attr str +"),
            Err(CommandError::NoCharacters)
        ));
        assert!(matches!(
            session.send("party arcana 10"),
            Err(CommandError::NoCharacters)
        ));
    }

    #[test]
    fn test_show_and_json() {
        let mut session = session();
        let reply = session.send("show").unwrap();
        assert!(reply.lines.iter().any(|l| l.contains("Skills (points 0/10)")));
        assert!(reply.lines.iter().any(|l| l.contains("Sleight of Hand")));

        let reply = session.send("json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply.lines[0]).unwrap();
        assert_eq!(value["attributes"]["intelligence"], 10);
        assert_eq!(value["skills"]["Arcana"]["points"], 0);
    }

    #[test]
    fn test_check_reply() {
        let mut session = session();
        let reply = session.send("check perception 5 adv").unwrap();
        assert!(reply.lines[0].contains("Perception check"));
        assert!(session.send("quit").unwrap().quit);
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let config = HeadlessConfig::default().with_rules(RulesConfig::new().with_attribute_sum_max(0));
        assert!(HeadlessSession::new(config).is_err());
    }
}
