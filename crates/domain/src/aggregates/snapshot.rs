//! Stored form of a character and its items.
//!
//! A snapshot holds item records of any vintage. Importing it migrates every
//! item and rebuilds the aggregate through its own mutations, so a snapshot
//! that breaks an invariant yields warnings and skipped items, never an
//! invalid character.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::character::{Character, CharacterKind};
use crate::entities::{RawItemRecord, Resource};
use crate::error::DomainError;
use crate::migration::migrate_record;
use crate::templates::{FieldDiagnostic, TemplateRegistry};
use crate::value_objects::{
    AbilityScores, CharacterName, Currency, GrantedProficiencies, RulesConfig, SheetSettings,
};
use crate::{CharacterId, ItemId};

fn default_proficiency_bonus() -> u8 {
    2
}

/// Everything about a character except its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: CharacterName,
    #[serde(default, rename = "type")]
    pub kind: CharacterKind,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default = "default_proficiency_bonus")]
    pub proficiency_bonus: u8,
    #[serde(default)]
    pub proficiencies: GrantedProficiencies,
    #[serde(default)]
    pub flags: BTreeSet<String>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub settings: SheetSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub character: CharacterProfile,
    #[serde(default)]
    pub items: Vec<RawItemRecord>,
}

/// A diagnostic raised while migrating one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDiagnostic {
    pub item_id: ItemId,
    pub item_name: String,
    #[serde(flatten)]
    pub diagnostic: FieldDiagnostic,
}

/// Result of importing a snapshot.
#[derive(Debug, Clone)]
pub struct ImportedCharacter {
    pub character: Character,
    pub diagnostics: Vec<ItemDiagnostic>,
    /// Items that could not be imported, and why
    pub warnings: Vec<String>,
}

impl CharacterSnapshot {
    /// Migrate every item and assemble the aggregate.
    ///
    /// # Errors
    ///
    /// Fails only when the profile itself is invalid (duplicate resource ids).
    pub fn import(
        self,
        registry: &TemplateRegistry,
        rules: &RulesConfig,
    ) -> Result<ImportedCharacter, DomainError> {
        let profile = self.character;
        let mut character = Character::new(profile.name, profile.kind)
            .with_id(profile.id)
            .with_abilities(profile.abilities)
            .with_proficiency_bonus(profile.proficiency_bonus)
            .with_proficiencies(profile.proficiencies)
            .with_experience(profile.experience)
            .with_currency(profile.currency)
            .with_settings(profile.settings)
            .with_resources(profile.resources)?;
        for flag in profile.flags {
            character = character.with_flag(flag);
        }

        let mut diagnostics = Vec::new();
        let mut warnings = Vec::new();
        for raw in &self.items {
            let (item, item_diagnostics) = match migrate_record(registry, raw) {
                Ok(migrated) => migrated,
                Err(err) => {
                    warnings.push(format!("Skipped item {}: {}", raw.name, err));
                    continue;
                }
            };
            diagnostics.extend(item_diagnostics.into_iter().map(|diagnostic| ItemDiagnostic {
                item_id: raw.id,
                item_name: raw.name.clone(),
                diagnostic,
            }));
            if let Err(err) = character.add_item(item, rules) {
                warnings.push(format!("Skipped item {}: {}", raw.name, err));
            }
        }

        Ok(ImportedCharacter {
            character,
            diagnostics,
            warnings,
        })
    }
}

impl Character {
    /// Stored form of this character; importing it reproduces the character.
    pub fn to_snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            character: CharacterProfile {
                id: self.id(),
                name: self.name().clone(),
                kind: self.kind(),
                abilities: *self.abilities(),
                proficiency_bonus: self.proficiency_bonus(),
                proficiencies: self.proficiencies().clone(),
                flags: self.flags().clone(),
                experience: self.experience(),
                currency: *self.currency(),
                resources: self.resources().to_vec(),
                settings: *self.settings(),
            },
            items: self.items().iter().map(|item| item.to_raw()).collect(),
        }
    }
}
