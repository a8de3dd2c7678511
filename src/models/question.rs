use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three answer letters of an AMF question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
}

impl Choice {
    /// All letters, in display order.
    pub const ALL: [Choice; 3] = [Choice::A, Choice::B, Choice::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Choice::A),
            "B" | "b" => Ok(Choice::B),
            "C" | "c" => Ok(Choice::C),
            _ => Err(()),
        }
    }
}

/// A single question of the bank, immutable once loaded.
///
/// Field names map to the source table's French column headers so that a
/// serialized session snapshot carries the drawn table verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Chapter identifier (kept as text: some banks use "1", others "1.2").
    pub theme: String,
    #[serde(rename = "sous_theme")]
    pub sub_theme: String,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "Choix_A")]
    pub choice_a: String,
    #[serde(rename = "Choix_B")]
    pub choice_b: String,
    #[serde(rename = "Choix_C")]
    pub choice_c: String,
    #[serde(rename = "bonne_reponse")]
    pub correct_choice: Choice,
    #[serde(default)]
    pub justification: Option<String>,
}

impl Question {
    /// The option text for a given letter.
    pub fn choice_text(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.choice_a,
            Choice::B => &self.choice_b,
            Choice::C => &self.choice_c,
        }
    }

    /// Render a letter with its option text, "A - texte".
    pub fn labeled_choice(&self, choice: Choice) -> String {
        format!("{} - {}", choice, self.choice_text(choice))
    }

    /// The justification, if present and non-blank after trimming.
    pub fn trimmed_justification(&self) -> Option<&str> {
        self.justification
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
    }
}
