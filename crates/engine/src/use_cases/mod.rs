//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area of the sheet. Use cases
//! load a character through [`CharacterRepo`](crate::infrastructure::ports::CharacterRepo),
//! run domain operations against it, and save only what the domain accepted.

pub mod advancement;
pub mod character_sheet;
pub mod currency;
pub mod resources;

pub use advancement::{AdvancementError, ChangeClassLevel, ClassLevelOutcome};
pub use character_sheet::{
    CharacterSheetError, CharacterSheetUseCases, ImportCharacter, ImportResult, PrepareSheet,
    UpdateItemField,
};
pub use currency::{ConvertCurrency, CurrencyError, CurrencyOutcome};
pub use resources::{
    AddResource, LinkResource, RemoveResource, ResourceError, ResourceUseCases, UpdateResource,
};

use sheetbldr_domain::{DomainError, Resolver, RulesConfig, TemplateRegistry};

/// Rules in effect and the item templates composed from them.
#[derive(Debug, Clone)]
pub struct Ruleset {
    rules: RulesConfig,
    registry: TemplateRegistry,
}

impl Ruleset {
    /// Compose templates for `rules`.
    pub fn new(rules: RulesConfig) -> Result<Self, DomainError> {
        let registry = TemplateRegistry::dnd5e(&rules)?;
        Ok(Self { rules, registry })
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.rules, &self.registry)
    }
}
