//! The structured view a presentation layer renders.

use serde::Serialize;

use crate::aggregates::ItemDiagnostic;
use crate::entities::{ItemData, Resource};
use crate::templates::ItemKind;
use crate::{CharacterId, ItemId};

/// Everything a sheet displays, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheetView {
    pub character_id: CharacterId,
    pub name: String,
    pub inventory: Vec<InventorySection>,
    pub spellbook: Spellbook,
    pub features: Features,
    pub resources: Vec<ResourceView>,
    pub labels: SheetLabels,
    /// Non-fatal anomalies found while assembling the view
    pub warnings: Vec<String>,
    /// Values replaced during migration
    pub diagnostics: Vec<ItemDiagnostic>,
}

impl CharacterSheetView {
    /// Every item view in the sheet, in display order.
    pub fn all_items(&self) -> impl Iterator<Item = &ItemView> {
        self.inventory
            .iter()
            .flat_map(|s| s.items.iter())
            .chain(self.spellbook.sections.iter().flat_map(|s| s.items.iter()))
            .chain(self.features.background.iter())
            .chain(self.features.classes.iter())
            .chain(self.features.active.iter())
            .chain(self.features.passive.iter())
    }

    pub fn find_item(&self, id: ItemId) -> Option<&ItemView> {
        self.all_items().find(|item| item.id == id)
    }
}

/// One item as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub sort: i64,
    pub system: ItemData,
    pub proficiency: f64,
    pub chat_properties: Vec<String>,
    /// `quantity × weight` rounded to 0.1, for stackable items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_weight: Option<f64>,
    /// Fields owned by a linked resource
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locked_fields: Vec<&'static str>,
    /// Level choices, for class items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_options: Option<Vec<LevelOption>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelOption {
    pub level: u8,
    pub delta: i16,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySection {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub label: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellbook {
    pub sections: Vec<SpellSection>,
    /// Spells above level 0 prepared under the "prepared" mode
    pub prepared_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSection {
    pub level: u8,
    pub label: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub background: Vec<ItemView>,
    /// Classes by level, each followed by its subclass
    pub classes: Vec<ItemView>,
    pub active: Vec<ItemView>,
    pub passive: Vec<ItemView>,
}

/// Display-level fields of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceField {
    Label,
    Value,
    Separator,
    Max,
    ShortRest,
    LongRest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_item_name: Option<String>,
    pub locked: Vec<ResourceField>,
    pub hidden: Vec<ResourceField>,
}

impl ResourceView {
    pub fn is_locked(&self, field: ResourceField) -> bool {
        self.locked.contains(&field)
    }

    pub fn is_hidden(&self, field: ResourceField) -> bool {
        self.hidden.contains(&field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLabels {
    /// Combined multiclass label, e.g. `"Fighter 5 / Wizard 3"`
    pub classes: String,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceLabel>,
    pub encumbrance: Encumbrance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperienceLabel {
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Encumbrance {
    pub value: f64,
    pub max: f64,
    pub pct: f64,
    pub units: &'static str,
    pub encumbered: bool,
}
