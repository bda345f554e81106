//! Character-related domain events
//!
//! These enums communicate what happened when character state was modified,
//! allowing callers to react appropriately.

use serde_json::Value;

use crate::entities::{ItemRecord, Resource};
use crate::value_objects::Currency;
use crate::ItemId;

/// Outcome of a resource mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    Added { id: String },
    Removed { resource: Resource },
    Updated { id: String },
    Linked {
        id: String,
        item_id: ItemId,
        previous: Option<ItemId>,
    },
    Unlinked { id: String, item_id: ItemId },
    /// Nothing to do (e.g. unlinking an unlinked resource)
    Unchanged { id: String },
}

/// Outcome of adding or removing an owned item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemChange {
    Added { item_id: ItemId },
    Removed {
        item: ItemRecord,
        /// Resources whose link pointed at the removed item
        unlinked_resources: Vec<String>,
    },
}

/// Outcome of a strictly validated field update
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFieldChange {
    Changed {
        item_id: ItemId,
        field: String,
        from: Option<Value>,
        to: Value,
    },
    Unchanged { item_id: ItemId, field: String },
}

/// A class-level change awaiting confirmation by the advancement workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChangeProposal {
    pub item_id: ItemId,
    pub from: u8,
    pub to: u8,
}

impl LevelChangeProposal {
    pub fn delta(&self) -> i16 {
        i16::from(self.to) - i16::from(self.from)
    }

    pub fn is_level_down(&self) -> bool {
        self.to < self.from
    }
}

/// Outcome of applying a confirmed level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Applied { item_id: ItemId, from: u8, to: u8 },
}

/// A currency consolidation awaiting confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyConversionProposal {
    pub from: Currency,
    pub to: Currency,
}

/// Outcome of applying a confirmed currency conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyChange {
    Converted { from: Currency, to: Currency },
    Unchanged,
}
