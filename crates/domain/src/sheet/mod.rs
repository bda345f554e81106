//! Character aggregation: partition, filter, pair, and summarize a
//! character's items into a [`CharacterSheetView`].
//!
//! `prepare` is a pure recomputation over one snapshot. Per-item work
//! (proficiency, chat labels, weight) has no cross-item dependency; class and
//! subclass pairing runs as a single ordered pass once it is done.

mod classes;
mod filters;
mod labels;
mod resources;
mod spellbook;
mod view;

use std::collections::BTreeMap;

pub use filters::{passes, FilterPredicate, FilterSet};
pub use view::{
    CharacterSheetView, Encumbrance, ExperienceLabel, Features, InventorySection, ItemView,
    LevelOption, ResourceField, ResourceView, SheetLabels, SpellSection, Spellbook,
};

use crate::aggregates::{class_levels, Character, CharacterSnapshot};
use crate::derived::Resolver;
use crate::entities::ItemRecord;
use crate::error::DomainError;
use crate::templates::{Capability, ItemKind};

/// Inventory sections, in display order.
pub const INVENTORY_KINDS: [ItemKind; 6] = [
    ItemKind::Weapon,
    ItemKind::Equipment,
    ItemKind::Consumable,
    ItemKind::Tool,
    ItemKind::Loot,
    ItemKind::Container,
];

/// Display partition an item kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Inventory(ItemKind),
    Spellbook,
    Features,
    Background,
    Classes,
    Subclasses,
}

impl Bucket {
    /// Fixed kind → bucket table; kinds without an entry are not displayed.
    pub fn for_kind(kind: ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Weapon
            | ItemKind::Equipment
            | ItemKind::Consumable
            | ItemKind::Tool
            | ItemKind::Loot
            | ItemKind::Container => Some(Self::Inventory(kind)),
            ItemKind::Spell => Some(Self::Spellbook),
            ItemKind::Feat => Some(Self::Features),
            ItemKind::Background => Some(Self::Background),
            ItemKind::Class => Some(Self::Classes),
            ItemKind::Subclass => Some(Self::Subclasses),
            ItemKind::Race => None,
        }
    }
}

#[derive(Default)]
struct Partitions<'a> {
    inventory: BTreeMap<ItemKind, Vec<&'a ItemRecord>>,
    spells: Vec<&'a ItemRecord>,
    features: Vec<&'a ItemRecord>,
    backgrounds: Vec<&'a ItemRecord>,
    classes: Vec<&'a ItemRecord>,
    subclasses: Vec<&'a ItemRecord>,
}

/// Build the sheet view for `character`.
pub fn prepare(character: &Character, resolver: Resolver<'_>, filters: &FilterSet) -> CharacterSheetView {
    let rules = resolver.rules();
    let registry = resolver.registry();
    let locks = resources::resource_views(character, registry);
    let mut warnings = locks.warnings;

    // Per-item work
    let mut items: Vec<&ItemRecord> = character.items().iter().collect();
    items.sort_by_key(|item| item.sort());
    let weight_of = |item: &ItemRecord| -> Option<f64> {
        registry.template(item.kind()).has(Capability::Physical).then(|| {
            labels::total_weight(
                item.data().number("quantity").unwrap_or(0.0),
                item.data().number("weight").unwrap_or(0.0),
            )
        })
    };
    let view_of = |item: &ItemRecord| -> ItemView {
        ItemView {
            id: item.id(),
            name: item.name().to_string(),
            kind: item.kind(),
            sort: item.sort(),
            system: item.data().clone(),
            proficiency: resolver.proficiency(item, Some(character)),
            chat_properties: resolver.chat_properties(item, Some(character)),
            total_weight: weight_of(item),
            locked_fields: locks.item_locks.get(&item.id()).cloned().unwrap_or_default(),
            level_options: None,
        }
    };

    // Partition
    let mut parts = Partitions::default();
    for item in items {
        match Bucket::for_kind(item.kind()) {
            Some(Bucket::Inventory(kind)) => parts.inventory.entry(kind).or_default().push(item),
            Some(Bucket::Spellbook) => parts.spells.push(item),
            Some(Bucket::Features) => parts.features.push(item),
            Some(Bucket::Background) => parts.backgrounds.push(item),
            Some(Bucket::Classes) => parts.classes.push(item),
            Some(Bucket::Subclasses) => parts.subclasses.push(item),
            None => {}
        }
    }

    // Inventory
    let carried: f64 = parts
        .inventory
        .values()
        .flatten()
        .filter_map(|item| weight_of(*item))
        .sum();
    let inventory = INVENTORY_KINDS
        .iter()
        .map(|kind| InventorySection {
            kind: *kind,
            label: rules
                .labels
                .item_kinds
                .get(kind.as_str())
                .cloned()
                .unwrap_or_else(|| kind.to_string()),
            items: parts
                .inventory
                .get(kind)
                .into_iter()
                .flatten()
                .filter(|item| passes(&filters.inventory, item))
                .map(|item| view_of(*item))
                .collect(),
        })
        .collect();

    // Spellbook
    let prepared = spellbook::prepared_count(parts.spells.iter().copied());
    let visible_spells = parts
        .spells
        .iter()
        .filter(|item| passes(&filters.spellbook, item))
        .map(|item| (*item, view_of(*item)))
        .collect();
    let spellbook = spellbook::spellbook(visible_spells, prepared, rules);

    // Classes and subclasses
    let mut sorted_classes = parts.classes.clone();
    sorted_classes.sort_by_key(|class| std::cmp::Reverse(class_levels(class)));
    let class_label = classes::class_label(&sorted_classes);
    let pairing = classes::pair(parts.classes, parts.subclasses);
    warnings.extend(pairing.warnings);
    let total_level = character.total_level();
    let class_views = pairing
        .ordered
        .iter()
        .map(|item| {
            let mut view = view_of(*item);
            if item.kind() == ItemKind::Class {
                view.level_options = Some(classes::level_options(
                    class_levels(item),
                    total_level,
                    rules.max_level,
                ));
            }
            view
        })
        .collect();

    // Features: filtered feats plus orphaned subclasses, split on activation
    let (active, passive): (Vec<ItemView>, Vec<ItemView>) = parts
        .features
        .iter()
        .filter(|item| passes(&filters.features, item))
        .chain(pairing.orphans.iter())
        .map(|item| view_of(*item))
        .partition(|view| !view.system.string("activation.type").is_empty());

    let features = Features {
        background: parts.backgrounds.iter().map(|item| view_of(*item)).collect(),
        classes: class_views,
        active,
        passive,
    };

    CharacterSheetView {
        character_id: character.id(),
        name: character.name().to_string(),
        inventory,
        spellbook,
        features,
        resources: locks.views,
        labels: SheetLabels {
            classes: class_label,
            level: total_level,
            experience: labels::experience(character, rules),
            encumbrance: labels::encumbrance(character, carried, rules),
        },
        warnings,
        diagnostics: Vec::new(),
    }
}

/// Import a stored snapshot and build its view, carrying import anomalies along.
///
/// # Errors
///
/// Fails only when the snapshot's character profile is invalid.
pub fn prepare_snapshot(
    snapshot: CharacterSnapshot,
    resolver: Resolver<'_>,
    filters: &FilterSet,
) -> Result<(Character, CharacterSheetView), DomainError> {
    let imported = snapshot.import(resolver.registry(), resolver.rules())?;
    let mut view = prepare(&imported.character, resolver, filters);
    view.warnings.splice(0..0, imported.warnings);
    view.diagnostics = imported.diagnostics;
    Ok((imported.character, view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::CharacterKind;
    use crate::entities::Resource;
    use crate::migration::migrate;
    use crate::templates::TemplateRegistry;
    use crate::value_objects::{CharacterName, RulesConfig};
    use crate::ItemId;
    use serde_json::{json, Value};

    struct Fixture {
        rules: RulesConfig,
        registry: TemplateRegistry,
        character: Character,
    }

    impl Fixture {
        fn new() -> Self {
            let rules = RulesConfig::default();
            let registry = TemplateRegistry::dnd5e(&rules).unwrap();
            let character =
                Character::new(CharacterName::new("Vistra").unwrap(), CharacterKind::Player);
            Self {
                rules,
                registry,
                character,
            }
        }

        fn add(&mut self, kind: ItemKind, name: &str, system: Value) -> ItemId {
            let data = migrate(self.registry.template(kind), &system);
            let item = ItemRecord::new(ItemId::new(), name, kind, data);
            let id = item.id();
            self.character.add_item(item, &self.rules).unwrap();
            id
        }

        fn prepare(&self, filters: &FilterSet) -> CharacterSheetView {
            prepare(
                &self.character,
                Resolver::new(&self.rules, &self.registry),
                filters,
            )
        }
    }

    fn section<'a>(view: &'a CharacterSheetView, kind: ItemKind) -> &'a InventorySection {
        view.inventory.iter().find(|s| s.kind == kind).unwrap()
    }

    #[test]
    fn every_item_lands_in_at_most_one_bucket() {
        let mut f = Fixture::new();
        let ids = [
            f.add(ItemKind::Weapon, "Sword", json!({})),
            f.add(ItemKind::Container, "Pack", json!({})),
            f.add(ItemKind::Spell, "Shield", json!({"level": 1})),
            f.add(ItemKind::Feat, "Alert", json!({})),
            f.add(ItemKind::Background, "Sage", json!({})),
            f.add(ItemKind::Class, "Wizard", json!({"levels": 1})),
        ];
        let race = f.add(ItemKind::Race, "Elf", json!({}));
        let view = f.prepare(&FilterSet::default());

        let shown: Vec<ItemId> = view.all_items().map(|i| i.id).collect();
        assert_eq!(shown.len(), ids.len());
        for id in ids {
            assert_eq!(shown.iter().filter(|s| **s == id).count(), 1);
        }
        assert!(view.find_item(race).is_none());
        assert_eq!(view.inventory.len(), INVENTORY_KINDS.len());
    }

    #[test]
    fn class_subclass_pairing_and_orphan_warning() {
        let mut f = Fixture::new();
        let wizard = f.add(ItemKind::Class, "Wizard", json!({"identifier": "wizard", "levels": 3}));
        let fighter = f.add(ItemKind::Class, "Fighter", json!({"identifier": "fighter", "levels": 5}));
        let s1 = f.add(ItemKind::Subclass, "Champion", json!({"classIdentifier": "fighter"}));
        let s2 = f.add(ItemKind::Subclass, "Thief", json!({"classIdentifier": "rogue"}));

        let view = f.prepare(&FilterSet::default());
        let order: Vec<_> = view.features.classes.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![fighter, s1, wizard]);
        assert_eq!(view.features.passive.len(), 1);
        assert_eq!(view.features.passive[0].id, s2);
        assert!(view.warnings.iter().any(|w| w.contains("rogue")));
        assert_eq!(view.labels.classes, "Fighter 5 / Wizard 3");
        assert_eq!(view.labels.level, 8);
    }

    #[test]
    fn explicit_mixed_case_identifier_keeps_its_subclass() {
        let mut f = Fixture::new();
        let fighter = f.add(ItemKind::Class, "Fighter", json!({"identifier": "Fighter", "levels": 3}));
        let champion = f.add(ItemKind::Subclass, "Champion", json!({"classIdentifier": "Fighter"}));

        let view = f.prepare(&FilterSet::default());
        let order: Vec<_> = view.features.classes.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![fighter, champion]);
        assert!(view.features.passive.is_empty());
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn class_views_carry_level_options() {
        let mut f = Fixture::new();
        f.add(ItemKind::Class, "Fighter", json!({"levels": 12}));
        let rogue = f.add(ItemKind::Class, "Rogue", json!({"levels": 3}));
        let view = f.prepare(&FilterSet::default());
        let rogue = view.find_item(rogue).unwrap();
        let options = rogue.level_options.as_ref().unwrap();
        let enabled_raises: Vec<u8> = options
            .iter()
            .filter(|o| o.delta > 0 && !o.disabled)
            .map(|o| o.level)
            .collect();
        assert_eq!(enabled_raises, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn features_split_on_activation() {
        let mut f = Fixture::new();
        let rage = f.add(ItemKind::Feat, "Rage", json!({"activation": {"type": "bonus"}}));
        let tough = f.add(ItemKind::Feat, "Tough", json!({}));
        let view = f.prepare(&FilterSet::default());
        assert_eq!(view.features.active[0].id, rage);
        assert_eq!(view.features.passive[0].id, tough);
    }

    #[test]
    fn filters_apply_per_partition() {
        let mut f = Fixture::new();
        let worn = f.add(ItemKind::Equipment, "Chain Mail", json!({"equipped": true}));
        f.add(ItemKind::Equipment, "Spare Shield", json!({"equipped": false}));
        let ritual = f.add(
            ItemKind::Spell,
            "Detect Magic",
            json!({"level": 1, "components": {"ritual": true}}),
        );
        f.add(ItemKind::Spell, "Magic Missile", json!({"level": 1}));
        let filters = FilterSet::parse("inventory=equipped;spellbook=ritual").unwrap();

        let view = f.prepare(&filters);
        let armor: Vec<_> = section(&view, ItemKind::Equipment).items.iter().map(|i| i.id).collect();
        assert_eq!(armor, vec![worn]);
        let spells: Vec<_> = view.spellbook.sections[0].items.iter().map(|i| i.id).collect();
        assert_eq!(spells, vec![ritual]);
    }

    #[test]
    fn spellbook_groups_by_level_with_prepared_count() {
        let mut f = Fixture::new();
        f.add(ItemKind::Spell, "Fire Bolt", json!({"level": 0}));
        f.add(ItemKind::Spell, "Shield", json!({"level": 1, "preparation": {"prepared": true}}));
        f.add(ItemKind::Spell, "Misty Step", json!({"level": 2, "preparation": {"prepared": true}}));
        f.add(ItemKind::Spell, "Sleep", json!({"level": 1}));
        let view = f.prepare(&FilterSet::default());
        let levels: Vec<_> = view.spellbook.sections.iter().map(|s| (s.level, s.items.len())).collect();
        assert_eq!(levels, vec![(0, 1), (1, 2), (2, 1)]);
        assert_eq!(view.spellbook.sections[0].label, "Cantrip");
        assert_eq!(view.spellbook.prepared_count, 2);
    }

    #[test]
    fn weights_are_rounded_per_item_without_mutation() {
        let mut f = Fixture::new();
        let darts = f.add(ItemKind::Weapon, "Darts", json!({"quantity": 3, "weight": 0.33}));
        let view = f.prepare(&FilterSet::default());
        let shown = view.find_item(darts).unwrap();
        assert_eq!(shown.total_weight, Some(1.0));
        assert_eq!(shown.system.number("weight"), Some(0.33));
        assert_eq!(view.labels.encumbrance.value, 1.0);
    }

    #[test]
    fn linked_resource_locks_in_view() {
        let mut f = Fixture::new();
        let x = f.add(ItemKind::Consumable, "X", json!({"uses": {"value": 1, "max": "1"}}));
        f.character
            .add_resource(Resource::new("luck", "Luck").unwrap())
            .unwrap();
        f.character.link_resource("luck", x).unwrap();
        let view = f.prepare(&FilterSet::default());
        let luck = view.resources.iter().find(|r| r.resource.id == "luck").unwrap();
        assert!(!luck.is_locked(ResourceField::Value));
        assert!(luck.is_locked(ResourceField::Max));
        assert_eq!(
            view.find_item(x).unwrap().locked_fields,
            vec!["quantity", "uses.value", "uses.max"]
        );
    }

    #[test]
    fn prepare_snapshot_reports_import_anomalies() {
        let rules = RulesConfig::default();
        let registry = TemplateRegistry::dnd5e(&rules).unwrap();
        let snapshot: CharacterSnapshot = serde_json::from_value(json!({
            "character": {
                "id": "0b6f2d3a-4f3e-4d0e-9b7a-1c2d3e4f5a6b",
                "name": "Vistra",
                "resources": [{"id": "luck", "linkedItemId": "5a4b3c2d-1e0f-4a9b-8c7d-6e5f4a3b2c1d"}]
            },
            "items": [
                {"id": "8d1f0a52-2b6c-4a3e-9c11-5b7c8d9e0f12", "name": "Rope", "type": "loot",
                 "system": {"quantity": "lots"}},
                {"id": "9e2a1b63-3c7d-4b4f-8d22-6c8d9e0f1a23", "name": "Cart", "type": "vehicle"}
            ]
        }))
        .unwrap();
        let (character, view) =
            prepare_snapshot(snapshot, Resolver::new(&rules, &registry), &FilterSet::default())
                .unwrap();
        assert_eq!(character.items().len(), 1);
        assert_eq!(view.diagnostics.len(), 1);
        assert!(view.warnings[0].contains("Cart"));
        assert!(view.warnings.iter().any(|w| w.contains("luck")));
    }

    #[test]
    fn prepare_is_deterministic() {
        let mut f = Fixture::new();
        f.add(ItemKind::Weapon, "Sword", json!({}));
        f.add(ItemKind::Class, "Fighter", json!({"levels": 2}));
        assert_eq!(f.prepare(&FilterSet::default()), f.prepare(&FilterSet::default()));
    }
}
