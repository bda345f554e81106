//! Proficiency tags granted to a character.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Highest tool proficiency multiplier (expertise).
pub const MAX_TOOL_MULTIPLIER: f64 = 2.0;

/// Tool multipliers move in half steps.
const TOOL_MULTIPLIER_STEP: f64 = 0.5;

/// Granted proficiency tags, by category tag (`"sim"`, `"lgt"`) or base item (`"longsword"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrantedProficiencies {
    pub weapons: BTreeSet<String>,
    pub armor: BTreeSet<String>,
    /// Tool tag → proficiency multiplier (0 to 2)
    pub tools: BTreeMap<String, f64>,
}

impl GrantedProficiencies {
    pub fn has_weapon(&self, tag: &str) -> bool {
        !tag.is_empty() && self.weapons.contains(tag)
    }

    pub fn has_armor(&self, tag: &str) -> bool {
        !tag.is_empty() && self.armor.contains(tag)
    }

    /// Granted multiplier for a tool tag.
    ///
    /// Stored grants are snapped down onto half steps in `0..=2`.
    pub fn tool(&self, tag: &str) -> f64 {
        self.tools
            .get(tag)
            .copied()
            .map(snap_tool_multiplier)
            .unwrap_or(0.0)
    }
}

/// Largest half step in `0..=2` not above `multiplier`; invalid values count as none.
fn snap_tool_multiplier(multiplier: f64) -> f64 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return 0.0;
    }
    let bounded = multiplier.min(MAX_TOOL_MULTIPLIER);
    (bounded / TOOL_MULTIPLIER_STEP).floor() * TOOL_MULTIPLIER_STEP
}
