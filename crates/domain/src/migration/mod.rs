//! Migration pipeline: raw item data of any vintage into the current shape.
//!
//! Migration is total. Generic rules run first, then the kind's own rules,
//! and finally every declared field is cleaned against its declaration, so
//! anything unrecognized degrades to the field's initial value and undeclared
//! keys are dropped. Running it twice changes nothing.

mod rules;

use serde::Serialize;
use serde_json::{Map, Value};

pub use rules::{kind_rules, MigrationRule, GENERIC_RULES};

use crate::entities::{ItemData, ItemRecord, RawItemRecord};
use crate::error::DomainError;
use crate::templates::{path, FieldDiagnostic, ItemKind, ItemTemplate, TemplateRegistry};

/// Normalized data plus everything that had to be replaced on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub data: ItemData,
    /// Names of the rules that changed a value
    pub applied: Vec<&'static str>,
    pub diagnostics: Vec<FieldDiagnostic>,
}

/// Normalize `raw` into `template`'s shape.
pub fn migrate(template: &ItemTemplate, raw: &Value) -> ItemData {
    migrate_with_report(template, raw).data
}

pub fn migrate_with_report(template: &ItemTemplate, raw: &Value) -> MigrationReport {
    let mut diagnostics = Vec::new();
    let mut working = match raw {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            diagnostics.push(FieldDiagnostic::new(
                "system",
                "record data is not an object",
                Some(other.clone()),
            ));
            Map::new()
        }
    };

    let mut applied = Vec::new();
    let generic = GENERIC_RULES
        .iter()
        .filter(|rule| template.declares(rule.path));
    for rule in generic.chain(kind_rules(template.kind())) {
        if rule.apply(&mut working) {
            applied.push(rule.name);
        }
    }

    let mut data = Map::new();
    for decl in template.fields().iter() {
        let (value, diagnostic) = decl.clean(path::get(&working, decl.path()));
        path::set(&mut data, decl.path(), value);
        diagnostics.extend(diagnostic);
    }

    MigrationReport {
        data: ItemData::from_map(data),
        applied,
        diagnostics,
    }
}

/// Run the rules bound to `field` over a single incoming value.
///
/// Strict field updates go through this before validation so a stored value
/// is always one that migration would leave alone.
pub fn normalize_field(template: &ItemTemplate, field: &str, value: &Value) -> Value {
    let mut working = Map::new();
    path::set(&mut working, field, value.clone());
    let generic = GENERIC_RULES
        .iter()
        .filter(|rule| template.declares(rule.path));
    for rule in generic
        .chain(kind_rules(template.kind()))
        .filter(|rule| rule.path == field)
    {
        rule.apply(&mut working);
    }
    path::get(&working, field).cloned().unwrap_or(Value::Null)
}

/// Migrate a stored record, resolving its kind tag against the registry.
///
/// # Errors
///
/// Returns `DomainError::Parse` when the kind tag names no known item kind.
pub fn migrate_record(
    registry: &TemplateRegistry,
    raw: &RawItemRecord,
) -> Result<(ItemRecord, Vec<FieldDiagnostic>), DomainError> {
    let kind: ItemKind = raw.kind.parse()?;
    let report = migrate_with_report(registry.template(kind), &raw.system);
    let record = ItemRecord::new(raw.id, raw.name.clone(), kind, report.data)
        .with_owner(raw.owner)
        .with_sort(raw.sort);
    Ok((record, report.diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RulesConfig;
    use crate::ItemId;
    use serde_json::json;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::dnd5e(&RulesConfig::default()).unwrap()
    }

    fn migrated(kind: ItemKind, raw: Value) -> ItemData {
        migrate(registry().template(kind), &raw)
    }

    #[test]
    fn weapon_properties_drop_stale_entries() {
        let data = migrated(
            ItemKind::Weapon,
            json!({"properties": {"fin": true, "old": "legacy"}}),
        );
        assert_eq!(data.get("properties"), Some(&json!({"fin": true})));
    }

    #[test]
    fn null_weapon_type_defaults_to_simple_melee() {
        let data = migrated(ItemKind::Weapon, json!({"weaponType": null}));
        assert_eq!(data.string("weaponType"), "simpleM");
    }

    #[test]
    fn legacy_proficient_flag_becomes_numeric() {
        let data = migrated(ItemKind::Weapon, json!({"proficient": true}));
        assert_eq!(data.get("proficient"), Some(&json!(1)));
        let data = migrated(ItemKind::Equipment, json!({"proficient": false}));
        assert_eq!(data.get("proficient"), Some(&json!(0)));
    }

    #[test]
    fn bonus_armor_becomes_trinket() {
        let data = migrated(ItemKind::Equipment, json!({"armor": {"type": "bonus", "value": 1}}));
        assert_eq!(data.string("armor.type"), "trinket");
        assert_eq!(data.number("armor.value"), Some(1.0));
    }

    #[test]
    fn blank_optional_numbers_become_null() {
        let data = migrated(
            ItemKind::Equipment,
            json!({"armor": {"dex": ""}, "strength": "", "weight": "4.5"}),
        );
        assert_eq!(data.get("armor.dex"), Some(&Value::Null));
        assert_eq!(data.get("strength"), Some(&Value::Null));
        assert_eq!(data.number("weight"), Some(4.5));
    }

    #[test]
    fn ability_array_collapses_to_scalar() {
        let data = migrated(ItemKind::Feat, json!({"ability": ["wis", "cha"]}));
        assert_eq!(data.string("ability"), "wis");
    }

    #[test]
    fn legacy_price_and_rarity_are_normalized() {
        let data = migrated(ItemKind::Loot, json!({"price": 25, "rarity": "Very Rare"}));
        assert_eq!(data.get("price"), Some(&json!({"value": 25, "denomination": "gp"})));
        assert_eq!(data.string("rarity"), "veryRare");
    }

    #[test]
    fn legacy_spellcasting_string_becomes_progression() {
        let data = migrated(ItemKind::Class, json!({"levels": 3, "spellcasting": "half"}));
        assert_eq!(data.string("spellcasting.progression"), "half");
        assert_eq!(data.number("levels"), Some(3.0));
    }

    #[test]
    fn subclass_parent_identifier_is_slugged() {
        let data = migrated(ItemKind::Subclass, json!({"classIdentifier": "Fighter"}));
        assert_eq!(data.string("classIdentifier"), "fighter");
    }

    #[test]
    fn explicit_identifiers_are_slugged() {
        let class = migrated(ItemKind::Class, json!({"identifier": "Fighter", "levels": 3}));
        assert_eq!(class.string("identifier"), "fighter");
        let sub = migrated(ItemKind::Subclass, json!({"identifier": "Battle Master"}));
        assert_eq!(sub.string("identifier"), "battle-master");
    }

    #[test]
    fn normalize_field_applies_only_that_fields_rules() {
        let registry = registry();
        let subclass = registry.template(ItemKind::Subclass);
        assert_eq!(
            normalize_field(subclass, "classIdentifier", &json!("Fighter")),
            json!("fighter")
        );
        let weapon = registry.template(ItemKind::Weapon);
        assert_eq!(normalize_field(weapon, "proficient", &json!(true)), json!(1));
        assert_eq!(normalize_field(weapon, "equipped", &json!(true)), json!(true));
    }

    #[test]
    fn blank_preparation_mode_defaults_to_prepared() {
        let data = migrated(ItemKind::Spell, json!({"preparation": {"mode": ""}}));
        assert_eq!(data.string("preparation.mode"), "prepared");
    }

    #[test]
    fn invalid_values_degrade_with_diagnostics() {
        let registry = registry();
        let report = migrate_with_report(
            registry.template(ItemKind::Tool),
            &json!({"quantity": -2, "proficient": 0.7, "junk": 1}),
        );
        assert_eq!(report.data.number("quantity"), Some(1.0));
        assert_eq!(report.data.get("proficient"), Some(&Value::Null));
        assert!(report.data.get("junk").is_none());
        let fields: Vec<_> = report.diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["quantity", "proficient"]);
    }

    #[test]
    fn non_object_input_yields_defaults() {
        let registry = registry();
        let report = migrate_with_report(registry.template(ItemKind::Loot), &json!([1, 2]));
        assert_eq!(report.data.as_map(), &registry.template(ItemKind::Loot).default_data());
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn migration_is_idempotent_on_legacy_record() {
        let registry = registry();
        let template = registry.template(ItemKind::Weapon);
        let once = migrate(
            template,
            &json!({
                "ability": ["str"],
                "attackBonus": 2,
                "uses": {"max": 3, "value": "2"},
                "price": "15",
                "range": {"value": "", "long": 60},
                "properties": ["fin", "lgt"],
                "proficient": false
            }),
        );
        let twice = migrate(template, &once.to_value());
        assert_eq!(once, twice);
        assert_eq!(once.string("attackBonus"), "2");
        assert_eq!(once.string("uses.max"), "3");
        assert_eq!(once.get("properties"), Some(&json!({"fin": true, "lgt": true})));
    }

    #[test]
    fn migrate_record_rejects_unknown_kind() {
        let raw = RawItemRecord {
            id: ItemId::new(),
            name: "Cart".into(),
            kind: "vehicle".into(),
            owner: None,
            sort: 0,
            system: Value::Null,
        };
        assert!(migrate_record(&registry(), &raw).is_err());
    }

    #[test]
    fn migrate_record_accepts_legacy_container_tag() {
        let raw = RawItemRecord {
            id: ItemId::new(),
            name: "Backpack".into(),
            kind: "backpack".into(),
            owner: None,
            sort: 7,
            system: json!({"capacity": {"value": 30}}),
        };
        let (record, diagnostics) = migrate_record(&registry(), &raw).unwrap();
        assert_eq!(record.kind(), ItemKind::Container);
        assert_eq!(record.sort(), 7);
        assert!(diagnostics.is_empty());
    }
}
