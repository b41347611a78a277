//! d20 rolling for skill checks.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Next state in the cycle Normal -> Advantage -> Disadvantage.
    pub fn cycle(self) -> Advantage {
        match self {
            Advantage::Normal => Advantage::Advantage,
            Advantage::Advantage => Advantage::Disadvantage,
            Advantage::Disadvantage => Advantage::Normal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Advantage::Normal => "normal",
            Advantage::Advantage => "advantage",
            Advantage::Disadvantage => "disadvantage",
        }
    }
}

/// Text that is not a recognised [`Advantage`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown advantage '{0}' (use adv or dis)")]
pub struct InvalidAdvantage(pub String);

impl FromStr for Advantage {
    type Err = InvalidAdvantage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "none" => Ok(Advantage::Normal),
            "adv" | "advantage" => Ok(Advantage::Advantage),
            "dis" | "disadvantage" => Ok(Advantage::Disadvantage),
            other => Err(InvalidAdvantage(other.to_string())),
        }
    }
}

/// The dice behind one d20 roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    /// Every die rolled, in order. Two entries with advantage or disadvantage.
    pub rolls: Vec<u32>,
    /// The die that counts.
    pub kept: u32,
}

impl D20Roll {
    pub fn is_natural_20(&self) -> bool {
        self.kept == 20
    }

    pub fn is_natural_1(&self) -> bool {
        self.kept == 1
    }
}

impl fmt::Display for D20Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rolls.len() > 1 {
            let shown: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
            write!(f, "[{}] -> {}", shown.join(", "), self.kept)
        } else {
            write!(f, "[{}]", self.kept)
        }
    }
}

/// Roll a d20, twice when advantage or disadvantage applies.
pub fn roll_d20_with_rng<R: Rng>(advantage: Advantage, rng: &mut R) -> D20Roll {
    match advantage {
        Advantage::Normal => {
            let roll = rng.gen_range(1..=20u32);
            D20Roll {
                rolls: vec![roll],
                kept: roll,
            }
        }
        Advantage::Advantage | Advantage::Disadvantage => {
            let roll1 = rng.gen_range(1..=20u32);
            let roll2 = rng.gen_range(1..=20u32);
            let kept = if advantage == Advantage::Advantage {
                roll1.max(roll2)
            } else {
                roll1.min(roll2)
            };
            D20Roll {
                rolls: vec![roll1, roll2],
                kept,
            }
        }
    }
}
