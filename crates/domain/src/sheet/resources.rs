//! Resource display list and link locks.
//!
//! A resource linked to an item owns that item's count: the resource's own
//! fields (other than its value) and the item's count fields are shown
//! read-only, so only one edit path touches the shared number.

use std::collections::BTreeMap;

use crate::aggregates::Character;
use crate::templates::TemplateRegistry;
use crate::ItemId;

use super::view::{ResourceField, ResourceView};

/// Every field a linked resource locks: all but its value.
const LINK_LOCKED: [ResourceField; 4] = [
    ResourceField::Label,
    ResourceField::Max,
    ResourceField::ShortRest,
    ResourceField::LongRest,
];

pub(crate) struct ResourceLocks {
    pub views: Vec<ResourceView>,
    /// Item id → fields locked on that item
    pub item_locks: BTreeMap<ItemId, Vec<&'static str>>,
    pub warnings: Vec<String>,
}

pub(crate) fn resource_views(character: &Character, registry: &TemplateRegistry) -> ResourceLocks {
    let mut views = Vec::with_capacity(character.resources().len());
    let mut item_locks: BTreeMap<ItemId, Vec<&'static str>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for resource in character.resources() {
        let mut view = ResourceView {
            resource: resource.clone(),
            linked_item_name: None,
            locked: Vec::new(),
            hidden: Vec::new(),
        };

        if let Some(item_id) = resource.linked_item_id {
            match character.item(item_id) {
                Some(item) => {
                    let template = registry.template(item.kind());
                    view.linked_item_name = Some(item.name().to_string());
                    view.locked = LINK_LOCKED.to_vec();
                    if template.linked_counter() != Some("uses.value") {
                        view.hidden = vec![ResourceField::Separator, ResourceField::Max];
                    }
                    let locks = item_locks.entry(item_id).or_default();
                    for field in template.linked_fields() {
                        if !locks.contains(field) {
                            locks.push(*field);
                        }
                    }
                }
                None => warnings.push(format!(
                    "Resource {} is linked to item {} which the character does not own",
                    resource.id, item_id
                )),
            }
        }
        views.push(view);
    }

    ResourceLocks {
        views,
        item_locks,
        warnings,
    }
}
