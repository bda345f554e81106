//! Declared migration rules.
//!
//! Every rule is a pure `Value -> Value` transform bound to one field path.
//! A rule must leave an already-normalized value untouched so that migration
//! stays idempotent.

use serde_json::{json, Value};

use crate::templates::fragments::RARITIES;
use crate::templates::{path, ItemKind};
use crate::value_objects::slugify;

/// A transform bound to one field path.
#[derive(Debug, Clone, Copy)]
pub struct MigrationRule {
    pub name: &'static str,
    pub path: &'static str,
    transform: fn(Value) -> Value,
}

impl MigrationRule {
    const fn new(name: &'static str, path: &'static str, transform: fn(Value) -> Value) -> Self {
        Self {
            name,
            path,
            transform,
        }
    }

    /// Rewrite the value at this rule's path; returns whether the value changed.
    pub(crate) fn apply(&self, data: &mut serde_json::Map<String, Value>) -> bool {
        let Some(current) = path::get(data, self.path).cloned() else {
            return false;
        };
        let next = (self.transform)(current.clone());
        if next == current {
            return false;
        }
        path::set(data, self.path, next);
        true
    }
}

// =============================================================================
// Rule tables
// =============================================================================

/// Cross-kind rules; each runs only when the kind's template declares its path.
pub const GENERIC_RULES: &[MigrationRule] = &[
    MigrationRule::new("abilityArrayToScalar", "ability", first_element),
    MigrationRule::new("attackBonusToFormula", "attackBonus", number_to_formula),
    MigrationRule::new("usesMaxToFormula", "uses.max", number_to_formula),
    MigrationRule::new("blankRangeToNull", "range.value", blank_to_null),
    MigrationRule::new("blankLongRangeToNull", "range.long", blank_to_null),
    MigrationRule::new("blankTargetToNull", "target.value", blank_to_null),
    MigrationRule::new("priceToDenominated", "price", price_to_object),
    MigrationRule::new("rarityToKey", "rarity", rarity_key),
    MigrationRule::new("identifierSlug", "identifier", slug),
];

const WEAPON_RULES: &[MigrationRule] = &[
    MigrationRule::new("proficientToMultiplier", "proficient", bool_to_multiplier),
    MigrationRule::new("stripStaleProperties", "properties", strip_non_boolean),
    MigrationRule::new("weaponTypeDefault", "weaponType", null_to_simple_melee),
];

const EQUIPMENT_RULES: &[MigrationRule] = &[
    MigrationRule::new("armorBonusToTrinket", "armor.type", bonus_to_trinket),
    MigrationRule::new("proficientToMultiplier", "proficient", bool_to_multiplier),
    MigrationRule::new("blankDexCapToNull", "armor.dex", blank_to_null),
    MigrationRule::new("blankStrengthToNull", "strength", blank_to_null),
];

const TOOL_RULES: &[MigrationRule] = &[MigrationRule::new(
    "proficientToMultiplier",
    "proficient",
    bool_to_multiplier,
)];

const SPELL_RULES: &[MigrationRule] = &[MigrationRule::new(
    "preparationModeDefault",
    "preparation.mode",
    blank_to_prepared,
)];

const CLASS_RULES: &[MigrationRule] = &[MigrationRule::new(
    "spellcastingToProgression",
    "spellcasting",
    spellcasting_object,
)];

const SUBCLASS_RULES: &[MigrationRule] = &[
    MigrationRule::new("spellcastingToProgression", "spellcasting", spellcasting_object),
    MigrationRule::new("classIdentifierSlug", "classIdentifier", slug),
];

/// Kind-specific rules in their declared order.
pub fn kind_rules(kind: ItemKind) -> &'static [MigrationRule] {
    match kind {
        ItemKind::Weapon => WEAPON_RULES,
        ItemKind::Equipment => EQUIPMENT_RULES,
        ItemKind::Tool => TOOL_RULES,
        ItemKind::Spell => SPELL_RULES,
        ItemKind::Class => CLASS_RULES,
        ItemKind::Subclass => SUBCLASS_RULES,
        _ => &[],
    }
}

// =============================================================================
// Transforms
// =============================================================================

fn first_element(value: Value) -> Value {
    match value {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    }
}

fn number_to_formula(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        other => other,
    }
}

fn blank_to_null(value: Value) -> Value {
    match value {
        Value::String(s) if s.trim().is_empty() => Value::Null,
        other => other,
    }
}

fn price_to_object(value: Value) -> Value {
    let amount = match &value {
        Value::Number(_) => value.clone(),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => json!(n),
            _ => return value,
        },
        _ => return value,
    };
    json!({ "value": amount, "denomination": "gp" })
}

/// `"Very Rare"` → `"veryRare"`; already-normalized keys pass through.
fn rarity_key(value: Value) -> Value {
    let Value::String(label) = &value else {
        return value;
    };
    let camel: String = label
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        })
        .collect();
    RARITIES
        .iter()
        .find(|key| key.eq_ignore_ascii_case(&camel))
        .map(|key| Value::from(*key))
        .unwrap_or(value)
}

fn bool_to_multiplier(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::from(u8::from(b)),
        other => other,
    }
}

fn strip_non_boolean(value: Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .filter(|(_, v)| v.is_boolean())
                .collect(),
        ),
        other => other,
    }
}

fn null_to_simple_melee(value: Value) -> Value {
    match value {
        Value::Null => Value::from("simpleM"),
        other => other,
    }
}

fn bonus_to_trinket(value: Value) -> Value {
    match value {
        Value::String(s) if s == "bonus" => Value::from("trinket"),
        other => other,
    }
}

fn blank_to_prepared(value: Value) -> Value {
    match value {
        Value::Null => Value::from("prepared"),
        Value::String(s) if s.trim().is_empty() => Value::from("prepared"),
        other => other,
    }
}

fn spellcasting_object(value: Value) -> Value {
    match value {
        Value::String(progression) => json!({ "progression": progression }),
        other => other,
    }
}

fn slug(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(slugify(&s)),
        Value::Number(n) => Value::String(slugify(&n.to_string())),
        other => other,
    }
}
