//! Value objects - Immutable objects defined by their attributes

mod abilities;
mod currency;
mod names;
mod proficiencies;
mod rules_config;
mod settings;

pub use abilities::AbilityScores;
pub use currency::{Currency, Denomination};
pub use names::{slugify, CharacterName};
pub use proficiencies::{GrantedProficiencies, MAX_TOOL_MULTIPLIER};
pub use rules_config::{CarryingCapacity, CategoryGrant, LabelTables, ProficiencyLabel, RulesConfig};
pub use settings::{SheetSettings, UnitSystem};
