//! Character resources: named regenerating pools
//!
//! A resource may be linked to an item's limited-use counter. The link is an
//! item id only; the counter itself stays on the item.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ItemId;

/// Identifiers every character carries; these cannot be removed.
pub const BUILT_IN_RESOURCES: [&str; 3] = ["primary", "secondary", "tertiary"];

/// A named pool such as "Ki Points" or "Luck".
///
/// Persisted as
/// `{id, label, shortRest, longRest, value, max, linkedItemId?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub short_rest: bool,
    #[serde(default)]
    pub long_rest: bool,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub max: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_item_id: Option<ItemId>,
}

impl Resource {
    /// Create an empty, unlinked resource.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the id is blank.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DomainError::validation("Resource id cannot be empty"));
        }
        Ok(Self {
            id,
            label: label.into(),
            short_rest: false,
            long_rest: false,
            value: 0,
            max: 0,
            linked_item_id: None,
        })
    }

    pub fn with_pool(mut self, value: i64, max: i64) -> Self {
        self.value = value;
        self.max = max;
        self
    }

    pub fn with_recovery(mut self, short_rest: bool, long_rest: bool) -> Self {
        self.short_rest = short_rest;
        self.long_rest = long_rest;
        self
    }

    pub(crate) fn built_in(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: String::new(),
            short_rest: false,
            long_rest: false,
            value: 0,
            max: 0,
            linked_item_id: None,
        }
    }

    pub fn is_built_in(&self) -> bool {
        BUILT_IN_RESOURCES.contains(&self.id.as_str())
    }

    pub fn is_linked(&self) -> bool {
        self.linked_item_id.is_some()
    }
}

/// Partial update of a resource; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePatch {
    pub label: Option<String>,
    pub value: Option<i64>,
    pub max: Option<i64>,
    pub short_rest: Option<bool>,
    pub long_rest: Option<bool>,
}

impl ResourcePatch {
    /// Name of the first field set in this patch other than `value`.
    pub fn first_non_value_field(&self) -> Option<&'static str> {
        if self.label.is_some() {
            Some("label")
        } else if self.max.is_some() {
            Some("max")
        } else if self.short_rest.is_some() {
            Some("shortRest")
        } else if self.long_rest.is_some() {
            Some("longRest")
        } else {
            None
        }
    }
}
