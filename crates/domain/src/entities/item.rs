//! Item records
//!
//! An item's kind fixes its field set for its whole life; the field values
//! live in an [`ItemData`] map whose shape matches the kind's template.
//! Records of arbitrary vintage arrive as [`RawItemRecord`]s and only become
//! [`ItemRecord`]s by passing through migration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::templates::{path, ItemKind};
use crate::value_objects::slugify;
use crate::{CharacterId, ItemId};

/// Normalized field values of one item, keyed by nested path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ItemData(Map<String, Value>);

impl ItemData {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        path::get(&self.0, field)
    }

    /// Finite numeric value at `path`.
    pub fn number(&self, path: &str) -> Option<f64> {
        self.get(path)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
    }

    /// String value at `path`, or `""` when absent.
    pub fn string(&self, path: &str) -> &str {
        self.get(path).and_then(Value::as_str).unwrap_or("")
    }

    pub fn flag(&self, path: &str) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Whether the boolean flag map at `path` has `key` set.
    pub fn has_flag(&self, path: &str, key: &str) -> bool {
        self.get(path)
            .and_then(|map| map.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        path::set(&mut self.0, field, value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// An item as stored by an external collaborator, before migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItemRecord {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    /// Item kind tag; unknown tags are skipped at import
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub owner: Option<CharacterId>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub system: Value,
}

/// A migrated item.
///
/// The owner is a weak back-reference: an id to be looked up, never the
/// character itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    id: ItemId,
    name: String,
    #[serde(rename = "type")]
    kind: ItemKind,
    owner: Option<CharacterId>,
    sort: i64,
    #[serde(rename = "system")]
    data: ItemData,
}

impl ItemRecord {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind, data: ItemData) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            owner: None,
            sort: 0,
            data,
        }
    }

    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_owner(mut self, owner: Option<CharacterId>) -> Self {
        self.owner = owner;
        self
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    #[inline]
    pub fn owner(&self) -> Option<CharacterId> {
        self.owner
    }

    #[inline]
    pub fn sort(&self) -> i64 {
        self.sort
    }

    #[inline]
    pub fn data(&self) -> &ItemData {
        &self.data
    }

    /// Explicit `identifier` field if set, else the slugged name.
    pub fn identifier(&self) -> String {
        match self.data.string("identifier").trim() {
            "" => slugify(&self.name),
            explicit => slugify(explicit),
        }
    }

    pub(crate) fn set_owner(&mut self, owner: Option<CharacterId>) {
        self.owner = owner;
    }

    pub(crate) fn set_field(&mut self, path: &str, value: Value) {
        self.data.set(path, value);
    }

    /// Back to the stored shape; migrating the result again yields this record.
    pub fn to_raw(&self) -> RawItemRecord {
        RawItemRecord {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind.as_str().to_string(),
            owner: self.owner,
            sort: self.sort,
            system: self.data.to_value(),
        }
    }
}
