//! Chat card property labels.

use std::collections::BTreeMap;

use crate::entities::ItemRecord;
use crate::templates::{Capability, ItemKind, ItemTemplate};
use crate::value_objects::RulesConfig;

/// Spell component flags in display order.
const COMPONENT_ORDER: [&str; 5] = ["vocal", "somatic", "material", "concentration", "ritual"];

/// Ordered display labels for an item's chat card.
///
/// Kind-specific labels come first, then equippable traits, then the
/// activated-effect summary. Absent values are omitted.
pub fn chat_properties(
    item: &ItemRecord,
    template: &ItemTemplate,
    proficiency: f64,
    rules: &RulesConfig,
) -> Vec<String> {
    let data = item.data();
    let labels = &rules.labels;
    let mut props = Vec::new();

    match item.kind() {
        ItemKind::Weapon => {
            props.extend(label(&labels.weapon_types, data.string("weaponType")));
            props.extend(
                labels
                    .weapon_properties
                    .iter()
                    .filter(|(key, _)| data.has_flag("properties", key))
                    .map(|(_, name)| name.clone()),
            );
        }
        ItemKind::Equipment => {
            props.extend(label(&labels.armor_types, data.string("armor.type")));
            if let Some(ac) = data.number("armor.value").filter(|ac| *ac > 0.0) {
                props.push(format!("{} AC", ac));
            }
            if data.flag("stealth") {
                props.push("Stealth Disadvantage".to_string());
            }
        }
        ItemKind::Consumable => {
            props.extend(label(&labels.consumable_types, data.string("consumableType")));
            let max = data.string("uses.max").trim();
            if let (Some(value), false) = (data.number("uses.value"), max.is_empty()) {
                props.push(format!("{}/{} Charges", value, max));
            }
        }
        ItemKind::Tool => {
            props.extend(label(&labels.abilities, data.string("ability")));
            props.extend(labels.proficiency_level(proficiency).map(str::to_string));
        }
        ItemKind::Spell => {
            if let Some(level) = data.number("level") {
                props.extend(labels.spell_levels.get(&(level as u8)).cloned());
            }
            props.extend(
                COMPONENT_ORDER
                    .iter()
                    .filter(|key| data.has_flag("components", key))
                    .filter_map(|key| label(&labels.spell_components, key)),
            );
        }
        ItemKind::Feat => {
            props.extend(non_empty(data.string("requirements")));
        }
        _ => {}
    }

    if template.has(Capability::Equippable) {
        if data.string("attunement") == "required" && !data.flag("attuned") {
            props.extend(label(&labels.attunement, "required"));
        }
        props.push(if data.flag("equipped") { "Equipped" } else { "Not Equipped" }.to_string());
    }

    if template.has(Capability::Activation) {
        props.extend(activation_label(item, rules));
        props.extend(target_label(item));
        props.extend(range_label(item));
        props.extend(duration_label(item, rules));
    }

    props
}

fn label(table: &BTreeMap<String, String>, key: &str) -> Option<String> {
    table.get(key).cloned()
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn activation_label(item: &ItemRecord, rules: &RulesConfig) -> Option<String> {
    let data = item.data();
    let name = label(&rules.labels.activation_types, data.string("activation.type"))?;
    Some(match data.number("activation.cost") {
        Some(cost) => format!("{} {}", cost, name),
        None => name,
    })
}

fn target_label(item: &ItemRecord) -> Option<String> {
    let data = item.data();
    let kind = non_empty(data.string("target.type"))?;
    Some(match data.number("target.value") {
        Some(value) => format!("{} {}", value, kind),
        None => kind,
    })
}

fn range_label(item: &ItemRecord) -> Option<String> {
    let data = item.data();
    let units = data.string("range.units").trim();
    match (data.number("range.value"), data.number("range.long")) {
        (Some(near), Some(far)) => Some(format!("{}/{} {}", near, far, units).trim().to_string()),
        (Some(near), None) => Some(format!("{} {}", near, units).trim().to_string()),
        (None, _) => non_empty(units),
    }
}

fn duration_label(item: &ItemRecord, rules: &RulesConfig) -> Option<String> {
    let data = item.data();
    let units = label(&rules.labels.time_units, data.string("duration.units"))?;
    Some(match non_empty(data.string("duration.value")) {
        Some(value) => format!("{} {}", value, units),
        None => units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::migrate;
    use crate::templates::TemplateRegistry;
    use crate::ItemId;
    use serde_json::{json, Value};

    fn props(kind: ItemKind, system: Value, proficiency: f64) -> Vec<String> {
        let rules = RulesConfig::default();
        let registry = TemplateRegistry::dnd5e(&rules).unwrap();
        let template = registry.template(kind);
        let item = ItemRecord::new(ItemId::new(), "Thing", kind, migrate(template, &system));
        chat_properties(&item, template, proficiency, &rules)
    }

    #[test]
    fn armor_lists_category_then_traits() {
        let props = props(
            ItemKind::Equipment,
            json!({"armor": {"type": "heavy", "value": 18}, "stealth": true, "equipped": true}),
            1.0,
        );
        assert_eq!(
            props,
            vec!["Heavy Armor", "18 AC", "Stealth Disadvantage", "Equipped"]
        );
    }

    #[test]
    fn consumable_shows_charges_and_activation() {
        let props = props(
            ItemKind::Consumable,
            json!({
                "consumableType": "wand",
                "uses": {"value": 3, "max": "7"},
                "activation": {"type": "action", "cost": 1},
                "range": {"value": 120, "units": "ft"}
            }),
            0.0,
        );
        assert_eq!(
            props,
            vec!["Wand", "3/7 Charges", "Not Equipped", "1 Action", "120 ft"]
        );
    }

    #[test]
    fn absent_values_are_omitted() {
        let props = props(ItemKind::Feat, json!({}), 1.0);
        assert!(props.is_empty());
    }

    #[test]
    fn spell_components_follow_display_order() {
        let props = props(
            ItemKind::Spell,
            json!({
                "level": 3,
                "components": {"ritual": true, "vocal": true, "somatic": false, "material": true},
                "duration": {"value": "10", "units": "minute"}
            }),
            1.0,
        );
        assert_eq!(props, vec!["3rd Level", "V", "M", "Ritual", "10 Minute"]);
    }

    #[test]
    fn tool_reports_proficiency_label() {
        let props = props(ItemKind::Tool, json!({"ability": "dex"}), 0.5);
        assert_eq!(props, vec!["Dexterity", "Half Proficient", "Not Equipped"]);
    }

    #[test]
    fn weapon_lists_enabled_properties() {
        let props = props(
            ItemKind::Weapon,
            json!({"weaponType": "martialM", "properties": {"ver": true, "fin": true, "hvy": false}}),
            1.0,
        );
        assert_eq!(
            props,
            vec!["Martial Melee", "Finesse", "Versatile", "Not Equipped"]
        );
    }
}
