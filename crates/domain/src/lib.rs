//! Item templates, migration, derived attributes, and sheet aggregation for
//! D&D 5e character sheets.

pub mod aggregates;
pub mod derived;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod migration;
pub mod sheet;
pub mod templates;
pub mod value_objects;

pub use aggregates::{
    Character, CharacterKind, CharacterProfile, CharacterSnapshot, ImportedCharacter,
    ItemDiagnostic,
};
pub use derived::Resolver;
pub use entities::{ItemData, ItemRecord, RawItemRecord, Resource, ResourcePatch};
pub use error::DomainError;

// Re-export mutation outcomes
pub use events::{
    CurrencyChange, CurrencyConversionProposal, ItemChange, ItemFieldChange, LevelChange,
    LevelChangeProposal, ResourceChange,
};

pub use ids::{CharacterId, ItemId};
pub use migration::{migrate, migrate_record, migrate_with_report, MigrationReport};
pub use sheet::{prepare, prepare_snapshot, CharacterSheetView, FilterPredicate, FilterSet};
pub use templates::{
    Capability, FieldDiagnostic, ItemKind, ItemTemplate, TemplateRegistry,
};
pub use value_objects::{
    AbilityScores, CharacterName, Currency, Denomination, GrantedProficiencies, RulesConfig,
    SheetSettings, UnitSystem,
};
