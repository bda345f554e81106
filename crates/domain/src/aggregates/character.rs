//! Character aggregate - the owner of a sheet's resources and items
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Weak back-references**: items point at their owner by id only; the
//!   character owns its items, never the reverse
//! - **Domain events**: Mutations return outcome enums (`ResourceChange`, etc.)
//! - **Reject, don't repair**: a mutation that would break an invariant returns
//!   an error and leaves the character exactly as it was
//!
//! # Invariants
//!
//! - Resource ids are unique and the built-in ids are always present
//! - The sum of class levels never exceeds `RulesConfig::max_level`
//! - Subclass identifiers are unique, and at most one subclass claims a class

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{ItemRecord, Resource, ResourcePatch, BUILT_IN_RESOURCES};
use crate::error::DomainError;
use crate::events::{
    CurrencyChange, CurrencyConversionProposal, ItemChange, ItemFieldChange, LevelChange,
    LevelChangeProposal, ResourceChange,
};
use crate::migration::normalize_field;
use crate::templates::{ItemKind, TemplateRegistry};
use crate::value_objects::{
    AbilityScores, CharacterName, Currency, GrantedProficiencies, RulesConfig, SheetSettings,
};
use crate::{CharacterId, ItemId};

/// Default proficiency bonus at level 1.
const DEFAULT_PROFICIENCY_BONUS: u8 = 2;

/// Who controls the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    #[default]
    #[serde(rename = "character")]
    Player,
    /// Statblock characters, treated as proficient with everything they carry
    #[serde(rename = "npc")]
    NonPlayer,
}

/// A character and everything it owns
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    // Identity
    id: CharacterId,
    name: CharacterName,
    kind: CharacterKind,

    // Rules state
    abilities: AbilityScores,
    proficiency_bonus: u8,
    proficiencies: GrantedProficiencies,
    flags: BTreeSet<String>,
    experience: u32,
    currency: Currency,

    // Owned collections
    resources: Vec<Resource>,
    items: Vec<ItemRecord>,

    settings: SheetSettings,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a character with no items and the built-in resources.
    pub fn new(name: CharacterName, kind: CharacterKind) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            kind,
            abilities: AbilityScores::default(),
            proficiency_bonus: DEFAULT_PROFICIENCY_BONUS,
            proficiencies: GrantedProficiencies::default(),
            flags: BTreeSet::new(),
            experience: 0,
            currency: Currency::default(),
            resources: BUILT_IN_RESOURCES
                .iter()
                .map(|id| Resource::built_in(id))
                .collect(),
            items: Vec::new(),
            settings: SheetSettings::default(),
        }
    }

    // =========================================================================
    // Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> CharacterKind {
        self.kind
    }

    #[inline]
    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    #[inline]
    pub fn proficiency_bonus(&self) -> u8 {
        self.proficiency_bonus
    }

    #[inline]
    pub fn proficiencies(&self) -> &GrantedProficiencies {
        &self.proficiencies
    }

    #[inline]
    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    #[inline]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    #[inline]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    #[inline]
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemRecord> {
        self.items.iter().find(|i| i.id() == id)
    }

    #[inline]
    pub fn settings(&self) -> &SheetSettings {
        &self.settings
    }

    /// Sum of levels across all class items.
    pub fn total_level(&self) -> u32 {
        total_level(&self.items)
    }

    /// Resource whose link owns `field` on `item`, if any.
    pub fn resource_locking(
        &self,
        item: &ItemRecord,
        field: &str,
        registry: &TemplateRegistry,
    ) -> Option<&Resource> {
        if !registry.template(item.kind()).linked_fields().contains(&field) {
            return None;
        }
        self.resources
            .iter()
            .find(|r| r.linked_item_id == Some(item.id()))
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        for item in &mut self.items {
            item.set_owner(Some(id));
        }
        self
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_proficiency_bonus(mut self, bonus: u8) -> Self {
        self.proficiency_bonus = bonus;
        self
    }

    pub fn with_proficiencies(mut self, proficiencies: GrantedProficiencies) -> Self {
        self.proficiencies = proficiencies;
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_settings(mut self, settings: SheetSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the resource list, restoring any missing built-in ids.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` when two resources share an id, and
    /// `DomainError::ItemAlreadyLinked` when two resources link the same item.
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Result<Self, DomainError> {
        let mut seen = BTreeSet::new();
        let mut linked = BTreeSet::new();
        for resource in &resources {
            if let Some(item_id) = resource.linked_item_id {
                if !linked.insert(item_id) {
                    return Err(DomainError::item_already_linked(
                        item_id.to_string(),
                        &resource.id,
                    ));
                }
            }
            if resource.id.trim().is_empty() {
                return Err(DomainError::validation("Resource id cannot be empty"));
            }
            if !seen.insert(resource.id.as_str()) {
                return Err(DomainError::constraint(format!(
                    "Duplicate resource id: {}",
                    resource.id
                )));
            }
        }
        let missing: Vec<Resource> = BUILT_IN_RESOURCES
            .iter()
            .filter(|id| !seen.contains(**id))
            .map(|id| Resource::built_in(id))
            .collect();
        self.resources = missing.into_iter().chain(resources).collect();
        Ok(self)
    }

    // =========================================================================
    // Resources
    // =========================================================================

    pub fn add_resource(&mut self, resource: Resource) -> Result<ResourceChange, DomainError> {
        if self.resource(&resource.id).is_some() {
            return Err(DomainError::constraint(format!(
                "Resource {} already exists",
                resource.id
            )));
        }
        if let Some(item_id) = resource.linked_item_id {
            self.require_item(item_id)?;
            self.require_unlinked(item_id, &resource.id)?;
        }
        let id = resource.id.clone();
        self.resources.push(resource);
        Ok(ResourceChange::Added { id })
    }

    /// Remove a user-created resource.
    pub fn remove_resource(&mut self, id: &str) -> Result<ResourceChange, DomainError> {
        let index = self.resource_index(id)?;
        if self.resources[index].is_built_in() {
            return Err(DomainError::constraint(format!(
                "Resource {} is built in and cannot be removed",
                id
            )));
        }
        let resource = self.resources.remove(index);
        Ok(ResourceChange::Removed { resource })
    }

    /// Apply a partial update.
    ///
    /// While linked, only `value` is editable; a value edit is written through
    /// to the linked item's counter.
    pub fn update_resource(
        &mut self,
        id: &str,
        patch: ResourcePatch,
        registry: &TemplateRegistry,
    ) -> Result<ResourceChange, DomainError> {
        let index = self.resource_index(id)?;
        let linked = self.resources[index].linked_item_id;
        if linked.is_some() {
            if let Some(field) = patch.first_non_value_field() {
                return Err(DomainError::locked_field(field, id));
            }
        }
        if patch.value.is_some_and(|v| v < 0) || patch.max.is_some_and(|m| m < 0) {
            return Err(DomainError::validation("Resource values cannot be negative"));
        }

        if let (Some(item_id), Some(value)) = (linked, patch.value) {
            if let Some(item) = self.items.iter_mut().find(|i| i.id() == item_id) {
                if let Some(counter) = registry.template(item.kind()).linked_counter() {
                    item.set_field(counter, Value::from(value));
                }
            }
        }

        let resource = &mut self.resources[index];
        if let Some(label) = patch.label {
            resource.label = label;
        }
        if let Some(value) = patch.value {
            resource.value = value;
        }
        if let Some(max) = patch.max {
            resource.max = max;
        }
        if let Some(short_rest) = patch.short_rest {
            resource.short_rest = short_rest;
        }
        if let Some(long_rest) = patch.long_rest {
            resource.long_rest = long_rest;
        }
        Ok(ResourceChange::Updated { id: id.to_string() })
    }

    pub fn link_resource(&mut self, id: &str, item_id: ItemId) -> Result<ResourceChange, DomainError> {
        self.require_item(item_id)?;
        let index = self.resource_index(id)?;
        self.require_unlinked(item_id, id)?;
        let resource = &mut self.resources[index];
        if resource.linked_item_id == Some(item_id) {
            return Ok(ResourceChange::Unchanged { id: id.to_string() });
        }
        let previous = resource.linked_item_id.replace(item_id);
        Ok(ResourceChange::Linked {
            id: id.to_string(),
            item_id,
            previous,
        })
    }

    pub fn unlink_resource(&mut self, id: &str) -> Result<ResourceChange, DomainError> {
        let index = self.resource_index(id)?;
        Ok(match self.resources[index].linked_item_id.take() {
            Some(item_id) => ResourceChange::Unlinked {
                id: id.to_string(),
                item_id,
            },
            None => ResourceChange::Unchanged { id: id.to_string() },
        })
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Take ownership of a migrated item.
    pub fn add_item(
        &mut self,
        mut item: ItemRecord,
        rules: &RulesConfig,
    ) -> Result<ItemChange, DomainError> {
        if self.item(item.id()).is_some() {
            return Err(DomainError::constraint(format!(
                "Item {} is already owned by this character",
                item.id()
            )));
        }
        item.set_owner(Some(self.id));
        let item_id = item.id();
        let mut candidate = self.items.clone();
        candidate.push(item);
        check_collection(&candidate, rules)?;
        self.items = candidate;
        Ok(ItemChange::Added { item_id })
    }

    /// Release an item, unlinking every resource that pointed at it.
    pub fn remove_item(&mut self, item_id: ItemId) -> Result<ItemChange, DomainError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id() == item_id)
            .ok_or_else(|| DomainError::not_found("Item", item_id.to_string()))?;
        let mut item = self.items.remove(index);
        item.set_owner(None);
        let unlinked_resources = self
            .resources
            .iter_mut()
            .filter(|r| r.linked_item_id == Some(item_id))
            .map(|r| {
                r.linked_item_id = None;
                r.id.clone()
            })
            .collect();
        Ok(ItemChange::Removed {
            item,
            unlinked_resources,
        })
    }

    /// Strictly validated update of one item field.
    pub fn update_item_field(
        &mut self,
        item_id: ItemId,
        field: &str,
        value: &Value,
        registry: &TemplateRegistry,
        rules: &RulesConfig,
    ) -> Result<ItemFieldChange, DomainError> {
        let index = self.item_index(item_id)?;
        let item = &self.items[index];
        if let Some(resource) = self.resource_locking(item, field, registry) {
            return Err(DomainError::locked_field(field, &resource.id));
        }
        let template = registry.template(item.kind());
        let cleaned = template.validate_update(field, &normalize_field(template, field, value))?;
        let from = item.data().get(field).cloned();
        if from.as_ref() == Some(&cleaned) {
            return Ok(ItemFieldChange::Unchanged {
                item_id,
                field: field.to_string(),
            });
        }

        let mut candidate = self.items.clone();
        candidate[index].set_field(field, cleaned.clone());
        check_collection(&candidate, rules)?;
        self.items = candidate;
        Ok(ItemFieldChange::Changed {
            item_id,
            field: field.to_string(),
            from,
            to: cleaned,
        })
    }

    // =========================================================================
    // Advancement
    // =========================================================================

    /// Propose moving a class to `target` levels; nothing changes until applied.
    pub fn propose_class_level(
        &self,
        item_id: ItemId,
        target: u8,
        rules: &RulesConfig,
    ) -> Result<LevelChangeProposal, DomainError> {
        let item = self.require_item(item_id)?;
        if item.kind() != ItemKind::Class {
            return Err(DomainError::validation(format!(
                "Item {} is not a class",
                item.name()
            )));
        }
        let from = class_levels(item);
        if target == 0 || target > rules.max_level {
            return Err(DomainError::validation(format!(
                "Level {} is outside 1..={}",
                target, rules.max_level
            )));
        }
        if target == from {
            return Err(DomainError::validation(format!(
                "{} is already level {}",
                item.name(),
                from
            )));
        }
        let delta = i64::from(target) - i64::from(from);
        let headroom = i64::from(rules.max_level) - i64::from(self.total_level());
        if delta > headroom {
            return Err(DomainError::constraint(format!(
                "Advancing {} by {} would exceed the maximum total level of {}",
                item.name(),
                delta,
                rules.max_level
            )));
        }
        Ok(LevelChangeProposal {
            item_id,
            from,
            to: target,
        })
    }

    /// Apply a proposal the advancement workflow has confirmed.
    pub fn apply_level_change(
        &mut self,
        proposal: &LevelChangeProposal,
        rules: &RulesConfig,
    ) -> Result<LevelChange, DomainError> {
        let index = self.item_index(proposal.item_id)?;
        if class_levels(&self.items[index]) != proposal.from {
            return Err(DomainError::constraint(
                "Class levels changed since the level change was proposed",
            ));
        }
        let mut candidate = self.items.clone();
        candidate[index].set_field("levels", Value::from(proposal.to));
        check_collection(&candidate, rules)?;
        self.items = candidate;
        Ok(LevelChange::Applied {
            item_id: proposal.item_id,
            from: proposal.from,
            to: proposal.to,
        })
    }

    // =========================================================================
    // Currency
    // =========================================================================

    /// Propose rolling coins up into larger denominations; `None` if nothing would change.
    pub fn propose_currency_conversion(&self) -> Option<CurrencyConversionProposal> {
        let to = self.currency.consolidated();
        (to != self.currency).then_some(CurrencyConversionProposal {
            from: self.currency,
            to,
        })
    }

    pub fn apply_currency_conversion(
        &mut self,
        proposal: &CurrencyConversionProposal,
    ) -> Result<CurrencyChange, DomainError> {
        if self.currency != proposal.from {
            return Err(DomainError::constraint(
                "Currency changed since the conversion was proposed",
            ));
        }
        if proposal.from == proposal.to {
            return Ok(CurrencyChange::Unchanged);
        }
        self.currency = proposal.to;
        Ok(CurrencyChange::Converted {
            from: proposal.from,
            to: proposal.to,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn resource_index(&self, id: &str) -> Result<usize, DomainError> {
        self.resources
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found("Resource", id))
    }

    fn item_index(&self, id: ItemId) -> Result<usize, DomainError> {
        self.items
            .iter()
            .position(|i| i.id() == id)
            .ok_or_else(|| DomainError::not_found("Item", id.to_string()))
    }

    /// Fails when a resource other than `resource_id` already owns `item_id`'s counter.
    fn require_unlinked(&self, item_id: ItemId, resource_id: &str) -> Result<(), DomainError> {
        match self
            .resources
            .iter()
            .find(|r| r.id != resource_id && r.linked_item_id == Some(item_id))
        {
            Some(owner) => Err(DomainError::item_already_linked(item_id.to_string(), &owner.id)),
            None => Ok(()),
        }
    }

    fn require_item(&self, id: ItemId) -> Result<&ItemRecord, DomainError> {
        self.item(id)
            .ok_or_else(|| DomainError::not_found("Item", id.to_string()))
    }
}

/// Current levels of a class item.
pub fn class_levels(item: &ItemRecord) -> u8 {
    item.data()
        .number("levels")
        .map(|l| l.clamp(0.0, f64::from(u8::MAX)) as u8)
        .unwrap_or(0)
}

fn total_level(items: &[ItemRecord]) -> u32 {
    items
        .iter()
        .filter(|i| i.kind() == ItemKind::Class)
        .map(|i| u32::from(class_levels(i)))
        .sum()
}

fn check_collection(items: &[ItemRecord], rules: &RulesConfig) -> Result<(), DomainError> {
    let total = total_level(items);
    if total > u32::from(rules.max_level) {
        return Err(DomainError::constraint(format!(
            "Total character level {} exceeds the maximum of {}",
            total, rules.max_level
        )));
    }

    let mut identifiers = BTreeSet::new();
    let mut claimed = BTreeSet::new();
    for subclass in items.iter().filter(|i| i.kind() == ItemKind::Subclass) {
        let identifier = subclass.identifier();
        if !identifiers.insert(identifier.clone()) {
            return Err(DomainError::constraint(format!(
                "Duplicate subclass identifier: {}",
                identifier
            )));
        }
        let parent = subclass.data().string("classIdentifier");
        if !parent.is_empty() && !claimed.insert(parent.to_string()) {
            return Err(DomainError::constraint(format!(
                "Class {} already has a subclass",
                parent
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
