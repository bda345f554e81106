//! Item kinds and the fragment list each kind is composed from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::field::FieldDecl;
use super::fragments::{self, Fragment};
use crate::error::DomainError;

/// Fixed tag determining an item's composed field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Weapon,
    Equipment,
    Consumable,
    Tool,
    Loot,
    #[serde(alias = "backpack")]
    Container,
    Spell,
    Feat,
    Background,
    Class,
    Subclass,
    Race,
}

impl ItemKind {
    pub const ALL: [ItemKind; 12] = [
        ItemKind::Weapon,
        ItemKind::Equipment,
        ItemKind::Consumable,
        ItemKind::Tool,
        ItemKind::Loot,
        ItemKind::Container,
        ItemKind::Spell,
        ItemKind::Feat,
        ItemKind::Background,
        ItemKind::Class,
        ItemKind::Subclass,
        ItemKind::Race,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Equipment => "equipment",
            Self::Consumable => "consumable",
            Self::Tool => "tool",
            Self::Loot => "loot",
            Self::Container => "container",
            Self::Spell => "spell",
            Self::Feat => "feat",
            Self::Background => "background",
            Self::Class => "class",
            Self::Subclass => "subclass",
            Self::Race => "race",
        }
    }

    /// Position of this kind in [`ItemKind::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Ordered fragment list for this kind; the kind's own fields come last.
    pub fn fragments(self, max_level: u8) -> Vec<Fragment> {
        use fragments::*;

        match self {
            Self::Weapon => vec![
                item_description(),
                physical_item(),
                equippable_item(),
                activated_effect(),
                action(),
                mountable(),
                Fragment::new("weapon")
                    .field(FieldDecl::choice("weaponType", WEAPON_TYPES, "simpleM"))
                    .field(FieldDecl::string("baseItem", ""))
                    .field(FieldDecl::flags("properties"))
                    .field(proficiency_override(1.0, 1.0)),
            ],
            Self::Equipment => vec![
                item_description(),
                physical_item(),
                equippable_item(),
                activated_effect(),
                action(),
                mountable(),
                Fragment::new("equipment")
                    .field(FieldDecl::choice("armor.type", ARMOR_TYPES, "light"))
                    .field(FieldDecl::number("armor.value", 0.0).integer().min(0.0))
                    .field(FieldDecl::nullable_number("armor.dex").integer().min(0.0))
                    .field(FieldDecl::string("baseItem", ""))
                    .field(FieldDecl::nullable_number("speed.value").min(0.0))
                    .field(FieldDecl::nullable_number("strength").integer().min(0.0))
                    .field(FieldDecl::boolean("stealth", false))
                    .field(FieldDecl::flags("properties"))
                    .field(proficiency_override(1.0, 1.0)),
            ],
            Self::Consumable => vec![
                item_description(),
                physical_item(),
                equippable_item(),
                activated_effect(),
                action(),
                Fragment::new("consumable")
                    .field(FieldDecl::choice("consumableType", CONSUMABLE_TYPES, "potion"))
                    .field(FieldDecl::boolean("uses.autoDestroy", false))
                    .field(FieldDecl::flags("properties")),
            ],
            Self::Tool => vec![
                item_description(),
                physical_item(),
                equippable_item(),
                Fragment::new("tool")
                    .field(FieldDecl::choice("toolType", TOOL_TYPES, "").allow_blank())
                    .field(FieldDecl::string("baseItem", ""))
                    .field(FieldDecl::choice("ability", ABILITIES, "int"))
                    .field(FieldDecl::string("chatFlavor", ""))
                    .field(FieldDecl::string("bonus", ""))
                    .field(FieldDecl::flags("properties"))
                    .field(proficiency_override(2.0, 0.5)),
            ],
            Self::Loot => vec![
                item_description(),
                physical_item(),
                Fragment::new("loot").field(FieldDecl::flags("properties")),
            ],
            Self::Container => vec![
                item_description(),
                physical_item(),
                equippable_item(),
                Fragment::new("container")
                    .field(FieldDecl::choice("capacity.type", CAPACITY_TYPES, "weight"))
                    .field(FieldDecl::number("capacity.value", 0.0).min(0.0))
                    .field(FieldDecl::boolean("capacity.weightless", false))
                    .field(FieldDecl::number("currency.pp", 0.0).integer().min(0.0))
                    .field(FieldDecl::number("currency.gp", 0.0).integer().min(0.0))
                    .field(FieldDecl::number("currency.ep", 0.0).integer().min(0.0))
                    .field(FieldDecl::number("currency.sp", 0.0).integer().min(0.0))
                    .field(FieldDecl::number("currency.cp", 0.0).integer().min(0.0)),
            ],
            Self::Spell => vec![
                item_description(),
                activated_effect(),
                action(),
                Fragment::new("spell")
                    .field(FieldDecl::number("level", 1.0).integer().min(0.0).max(9.0))
                    .field(FieldDecl::choice("school", SPELL_SCHOOLS, "").allow_blank())
                    .field(FieldDecl::flags("components"))
                    .field(FieldDecl::string("materials.value", ""))
                    .field(FieldDecl::choice("preparation.mode", PREPARATION_MODES, "prepared"))
                    .field(FieldDecl::boolean("preparation.prepared", false)),
            ],
            Self::Feat => vec![
                item_description(),
                activated_effect(),
                action(),
                Fragment::new("feat")
                    .field(FieldDecl::choice("type.value", FEAT_TYPES, "").allow_blank())
                    .field(FieldDecl::string("type.subtype", ""))
                    .field(FieldDecl::string("requirements", ""))
                    .field(
                        FieldDecl::nullable_number("recharge.value")
                            .integer()
                            .min(1.0)
                            .max(6.0),
                    )
                    .field(FieldDecl::boolean("recharge.charged", false))
                    .field(FieldDecl::flags("properties")),
            ],
            Self::Background => vec![
                item_description(),
                Fragment::new("background").field(FieldDecl::string("identifier", "")),
            ],
            Self::Class => vec![
                item_description(),
                Fragment::new("class")
                    .field(FieldDecl::string("identifier", ""))
                    .field(
                        FieldDecl::number("levels", 1.0)
                            .integer()
                            .min(1.0)
                            .max(f64::from(max_level))
                            .required(),
                    )
                    .field(FieldDecl::choice("hitDice", HIT_DICE, "d8"))
                    .field(FieldDecl::number("hitDiceUsed", 0.0).integer().min(0.0))
                    .field(FieldDecl::choice(
                        "spellcasting.progression",
                        SPELL_PROGRESSIONS,
                        "none",
                    ))
                    .field(FieldDecl::choice("spellcasting.ability", ABILITIES, "").allow_blank())
                    .field(FieldDecl::string_set("saves")),
            ],
            Self::Subclass => vec![
                item_description(),
                Fragment::new("subclass")
                    .field(FieldDecl::string("identifier", ""))
                    .field(FieldDecl::string("classIdentifier", "").required())
                    .field(FieldDecl::choice(
                        "spellcasting.progression",
                        SPELL_PROGRESSIONS,
                        "none",
                    )),
            ],
            Self::Race => vec![
                item_description(),
                Fragment::new("race")
                    .field(FieldDecl::string("identifier", ""))
                    .field(FieldDecl::number("movement.walk", 30.0).min(0.0))
                    .field(FieldDecl::number("senses.darkvision", 0.0).min(0.0)),
            ],
        }
    }
}

/// Nullable per-item override; `null` means "derive from the owner".
fn proficiency_override(max: f64, step: f64) -> FieldDecl {
    FieldDecl::nullable_number("proficient")
        .min(0.0)
        .max(max)
        .step(step)
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "backpack" => Ok(Self::Container),
            other => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == other)
                .ok_or_else(|| DomainError::parse(format!("Unknown item kind: {}", s))),
        }
    }
}
