//! Ability scores.

use serde::{Deserialize, Serialize};

/// The six ability scores, keyed by their three-letter abbreviations on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    #[serde(rename = "str")]
    pub strength: u8,
    #[serde(rename = "dex")]
    pub dexterity: u8,
    #[serde(rename = "con")]
    pub constitution: u8,
    #[serde(rename = "int")]
    pub intelligence: u8,
    #[serde(rename = "wis")]
    pub wisdom: u8,
    #[serde(rename = "cha")]
    pub charisma: u8,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// Score for an abbreviation such as `"dex"`.
    pub fn score(&self, ability: &str) -> Option<u8> {
        match ability {
            "str" => Some(self.strength),
            "dex" => Some(self.dexterity),
            "con" => Some(self.constitution),
            "int" => Some(self.intelligence),
            "wis" => Some(self.wisdom),
            "cha" => Some(self.charisma),
            _ => None,
        }
    }

    /// Standard modifier: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: &str) -> Option<i8> {
        self.score(ability)
            .map(|score| (i16::from(score) - 10).div_euclid(2) as i8)
    }
}
