//! Core data model types for unitdrill.
//!
//! These are the canonical, already-normalized shapes the drill works on.
//! Raw input never reaches this module directly; see [`crate::normalizer`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown in place of an empty definition.
pub const NO_DEFINITION: &str = "(no definition available)";

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// The word being drilled. Never empty after normalization.
    pub term: String,
    /// Its meaning. May be empty.
    #[serde(default)]
    pub definition: String,
}

impl Word {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }

    /// The definition, or `placeholder` when it is empty.
    pub fn definition_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.definition.is_empty() {
            placeholder
        } else {
            &self.definition
        }
    }
}

/// A named, ordered group of words drilled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Best-effort numeric identifier. Not guaranteed unique.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Words in drill order.
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Unit {
    /// Chooser label, e.g. `#3 Sentence 03`.
    pub fn label(&self) -> String {
        format!("#{} {}", self.id, self.title)
    }
}

/// The full canonical vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Dataset {
    /// First unit carrying `id`. Duplicate ids resolve to the earliest one.
    pub fn find_unit(&self, id: i64) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Entries for a unit chooser, in dataset order.
    pub fn choices(&self) -> impl Iterator<Item = UnitChoice> + '_ {
        self.units.iter().map(|u| UnitChoice {
            id: u.id,
            label: u.label(),
            word_count: u.words.len(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Total number of words across all units.
    pub fn word_count(&self) -> usize {
        self.units.iter().map(|u| u.words.len()).sum()
    }
}

/// What a caller needs to render one entry of the unit chooser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitChoice {
    pub id: i64,
    pub label: String,
    pub word_count: usize,
}

/// The learner's self-reported judgment of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Known,
    Unknown,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Known => write!(f, "known"),
            Choice::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "known" | "k" => Ok(Choice::Known),
            "unknown" | "u" => Ok(Choice::Unknown),
            other => Err(format!("unknown choice: {other}")),
        }
    }
}
