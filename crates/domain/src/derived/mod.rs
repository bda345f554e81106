//! Derived attributes: values computed from a migrated item and its owner.
//!
//! Nothing here is stored. Every function is a pure function of the item,
//! the owning character, and the rules in effect.

mod chat;
mod proficiency;

pub use chat::chat_properties;
pub use proficiency::proficiency_multiplier;

use crate::aggregates::Character;
use crate::entities::ItemRecord;
use crate::templates::TemplateRegistry;
use crate::value_objects::RulesConfig;

/// Rules and templates bound together for repeated per-item derivation.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    rules: &'a RulesConfig,
    registry: &'a TemplateRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(rules: &'a RulesConfig, registry: &'a TemplateRegistry) -> Self {
        Self { rules, registry }
    }

    pub fn rules(&self) -> &'a RulesConfig {
        self.rules
    }

    pub fn registry(&self) -> &'a TemplateRegistry {
        self.registry
    }

    pub fn proficiency(&self, item: &ItemRecord, owner: Option<&Character>) -> f64 {
        proficiency_multiplier(item, owner, self.rules)
    }

    pub fn chat_properties(&self, item: &ItemRecord, owner: Option<&Character>) -> Vec<String> {
        chat_properties(
            item,
            self.registry.template(item.kind()),
            self.proficiency(item, owner),
            self.rules,
        )
    }
}
