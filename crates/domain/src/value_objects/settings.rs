//! Per-character display settings.

use serde::{Deserialize, Serialize};

/// Unit system used for weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    pub fn weight_label(self) -> &'static str {
        match self {
            Self::Imperial => "lb",
            Self::Metric => "kg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetSettings {
    pub units: UnitSystem,
    pub track_experience: bool,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            units: UnitSystem::Imperial,
            track_experience: true,
        }
    }
}
