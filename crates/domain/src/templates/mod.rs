//! Template registry: the composed record shape of every item kind.
//!
//! Shapes are composed once, when the registry is built, from each kind's
//! ordered fragment list. Nothing downstream probes records for fields; it asks
//! the kind's template which capabilities it carries.

mod field;
pub mod fragments;
mod kinds;
pub(crate) mod path;

use std::collections::BTreeSet;

use serde_json::{Map, Value};

pub use field::{FieldBounds, FieldDecl, FieldDiagnostic, FieldMap, FieldType};
pub use fragments::{Capability, Fragment};
pub use kinds::ItemKind;

use crate::error::DomainError;
use crate::value_objects::RulesConfig;

/// The composed shape of one item kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    kind: ItemKind,
    fragment_names: Vec<&'static str>,
    fields: FieldMap,
    capabilities: BTreeSet<Capability>,
}

impl ItemTemplate {
    /// Compose a template, rejecting fragment lists that are not total.
    pub fn compose(kind: ItemKind, fragments: &[Fragment]) -> Result<Self, DomainError> {
        let fields = FieldMap::compose(fragments);

        for fragment in fragments {
            for required in fragment.required_fields() {
                if !fields.contains(required) {
                    return Err(DomainError::template(
                        kind.as_str(),
                        format!(
                            "fragment {} requires field {} which no included fragment declares",
                            fragment.name(),
                            required
                        ),
                    ));
                }
            }
        }

        if let Some((outer, inner)) = fields.structural_conflict() {
            return Err(DomainError::template(
                kind.as_str(),
                format!("field {} cannot also contain field {}", outer, inner),
            ));
        }

        Ok(Self {
            kind,
            fragment_names: fragments.iter().map(Fragment::name).collect(),
            fields,
            capabilities: fragments
                .iter()
                .flat_map(|f| f.capabilities().iter().copied())
                .collect(),
        })
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn fragment_names(&self) -> &[&'static str] {
        &self.fragment_names
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fields owned by a resource linked to an item of this kind.
    pub fn linked_fields(&self) -> &'static [&'static str] {
        if self.has(Capability::LimitedUses) {
            &["quantity", "uses.value", "uses.max"]
        } else if self.has(Capability::Physical) {
            &["quantity"]
        } else {
            &[]
        }
    }

    /// The count a linked resource's value writes through to.
    pub fn linked_counter(&self) -> Option<&'static str> {
        if self.has(Capability::LimitedUses) {
            Some("uses.value")
        } else if self.has(Capability::Physical) {
            Some("quantity")
        } else {
            None
        }
    }

    /// Whether the template declares `path` itself or any field nested under it.
    pub fn declares(&self, path: &str) -> bool {
        self.fields.iter().any(|decl| {
            let p = decl.path();
            p == path || (p.starts_with(path) && p.as_bytes().get(path.len()) == Some(&b'.'))
        })
    }

    /// A fresh record holding every field's initial value.
    pub fn default_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        for decl in self.fields.iter() {
            path::set(&mut data, decl.path(), decl.initial().clone());
        }
        data
    }

    /// Strictly validate a single field update.
    pub fn validate_update(&self, path: &str, value: &Value) -> Result<Value, FieldDiagnostic> {
        let decl = self.fields.get(path).ok_or_else(|| {
            FieldDiagnostic::new(
                path,
                format!("{} items have no such field", self.kind),
                Some(value.clone()),
            )
        })?;
        decl.validate(value)
    }
}

/// Every item kind's composed template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRegistry {
    // Indexed by `ItemKind::index`; construction guarantees one entry per kind.
    templates: Vec<ItemTemplate>,
}

impl TemplateRegistry {
    /// Compose the D&D 5e item templates.
    pub fn dnd5e(rules: &RulesConfig) -> Result<Self, DomainError> {
        let templates = ItemKind::ALL
            .into_iter()
            .map(|kind| ItemTemplate::compose(kind, &kind.fragments(rules.max_level)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { templates })
    }

    pub fn template(&self, kind: ItemKind) -> &ItemTemplate {
        &self.templates[kind.index()]
    }

    /// Strictly validate an update to one field of a `kind` item.
    pub fn validate_update(
        &self,
        kind: ItemKind,
        path: &str,
        value: &Value,
    ) -> Result<Value, FieldDiagnostic> {
        self.template(kind).validate_update(path, value)
    }

    pub fn templates(&self) -> impl Iterator<Item = &ItemTemplate> {
        self.templates.iter()
    }
}
