//! Global rule constants passed into every pipeline call.
//!
//! Nothing in the core reads ambient state: the category→tag tables, label
//! tables, and level limits all travel in a [`RulesConfig`]. The default is
//! D&D 5th Edition; a JSON document may override any subset of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// XP thresholds for each level in D&D 5e.
/// Index is level - 1 (so level 1 = index 0).
const XP_THRESHOLDS: [u32; 20] = [
    0,      // Level 1
    300,    // Level 2
    900,    // Level 3
    2700,   // Level 4
    6500,   // Level 5
    14000,  // Level 6
    23000,  // Level 7
    34000,  // Level 8
    48000,  // Level 9
    64000,  // Level 10
    85000,  // Level 11
    100000, // Level 12
    120000, // Level 13
    140000, // Level 14
    165000, // Level 15
    195000, // Level 16
    225000, // Level 17
    265000, // Level 18
    305000, // Level 19
    355000, // Level 20
];

/// What a proficiency category maps to on the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryGrant {
    /// The character must hold this tag
    Tag(String),
    /// `true`: every character is proficient; `false`: none is
    Innate(bool),
}

/// A labelled proficiency multiplier (e.g. 0.5 → "Half Proficient").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProficiencyLabel {
    pub multiplier: f64,
    pub label: String,
}

/// Carrying capacity per point of Strength, per unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarryingCapacity {
    pub imperial: f64,
    pub metric: f64,
}

/// Display labels keyed by the schema's choice values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelTables {
    pub item_kinds: BTreeMap<String, String>,
    pub weapon_types: BTreeMap<String, String>,
    pub weapon_properties: BTreeMap<String, String>,
    pub armor_types: BTreeMap<String, String>,
    pub consumable_types: BTreeMap<String, String>,
    pub tool_types: BTreeMap<String, String>,
    pub spell_levels: BTreeMap<u8, String>,
    pub spell_schools: BTreeMap<String, String>,
    pub spell_components: BTreeMap<String, String>,
    pub activation_types: BTreeMap<String, String>,
    pub time_units: BTreeMap<String, String>,
    pub abilities: BTreeMap<String, String>,
    pub attunement: BTreeMap<String, String>,
    pub currencies: BTreeMap<String, String>,
    pub proficiency_levels: Vec<ProficiencyLabel>,
}

impl LabelTables {
    /// Label for a multiplier, matched exactly; the range is not rounded.
    pub fn proficiency_level(&self, multiplier: f64) -> Option<&str> {
        self.proficiency_levels
            .iter()
            .find(|p| p.multiplier == multiplier)
            .map(|p| p.label.as_str())
    }

    fn dnd5e() -> Self {
        Self {
            item_kinds: table(&[
                ("weapon", "Weapons"),
                ("equipment", "Equipment"),
                ("consumable", "Consumables"),
                ("tool", "Tools"),
                ("loot", "Loot"),
                ("container", "Containers"),
                ("spell", "Spells"),
                ("feat", "Features"),
                ("background", "Background"),
                ("class", "Classes"),
                ("subclass", "Subclasses"),
                ("race", "Race"),
            ]),
            weapon_types: table(&[
                ("simpleM", "Simple Melee"),
                ("simpleR", "Simple Ranged"),
                ("martialM", "Martial Melee"),
                ("martialR", "Martial Ranged"),
                ("natural", "Natural"),
                ("improvised", "Improvised"),
                ("siege", "Siege Weapon"),
            ]),
            weapon_properties: table(&[
                ("amm", "Ammunition"),
                ("fin", "Finesse"),
                ("hvy", "Heavy"),
                ("lgt", "Light"),
                ("lod", "Loading"),
                ("mgc", "Magical"),
                ("rch", "Reach"),
                ("ret", "Returning"),
                ("thr", "Thrown"),
                ("two", "Two-Handed"),
                ("ver", "Versatile"),
            ]),
            armor_types: table(&[
                ("light", "Light Armor"),
                ("medium", "Medium Armor"),
                ("heavy", "Heavy Armor"),
                ("natural", "Natural Armor"),
                ("shield", "Shield"),
                ("clothing", "Clothing"),
                ("trinket", "Trinket"),
                ("vehicle", "Vehicle Equipment"),
            ]),
            consumable_types: table(&[
                ("ammo", "Ammunition"),
                ("potion", "Potion"),
                ("poison", "Poison"),
                ("food", "Food"),
                ("scroll", "Scroll"),
                ("wand", "Wand"),
                ("rod", "Rod"),
                ("trinket", "Trinket"),
            ]),
            tool_types: table(&[
                ("art", "Artisan's Tools"),
                ("game", "Gaming Set"),
                ("music", "Musical Instrument"),
            ]),
            spell_levels: [
                "Cantrip",
                "1st Level",
                "2nd Level",
                "3rd Level",
                "4th Level",
                "5th Level",
                "6th Level",
                "7th Level",
                "8th Level",
                "9th Level",
            ]
            .iter()
            .enumerate()
            .map(|(level, label)| (level as u8, label.to_string()))
            .collect(),
            spell_schools: table(&[
                ("abj", "Abjuration"),
                ("con", "Conjuration"),
                ("div", "Divination"),
                ("enc", "Enchantment"),
                ("evo", "Evocation"),
                ("ill", "Illusion"),
                ("nec", "Necromancy"),
                ("trs", "Transmutation"),
            ]),
            spell_components: table(&[
                ("vocal", "V"),
                ("somatic", "S"),
                ("material", "M"),
                ("concentration", "Concentration"),
                ("ritual", "Ritual"),
            ]),
            activation_types: table(&[
                ("action", "Action"),
                ("bonus", "Bonus Action"),
                ("reaction", "Reaction"),
                ("minute", "Minute"),
                ("hour", "Hour"),
                ("day", "Day"),
                ("special", "Special"),
                ("legendary", "Legendary Action"),
                ("lair", "Lair Action"),
                ("crew", "Crew Action"),
            ]),
            time_units: table(&[
                ("inst", "Instantaneous"),
                ("turn", "Turn"),
                ("round", "Round"),
                ("minute", "Minute"),
                ("hour", "Hour"),
                ("day", "Day"),
                ("month", "Month"),
                ("year", "Year"),
                ("perm", "Permanent"),
                ("spec", "Special"),
            ]),
            abilities: table(&[
                ("str", "Strength"),
                ("dex", "Dexterity"),
                ("con", "Constitution"),
                ("int", "Intelligence"),
                ("wis", "Wisdom"),
                ("cha", "Charisma"),
            ]),
            attunement: table(&[
                ("required", "Attunement Required"),
                ("optional", "Attunement Optional"),
            ]),
            currencies: table(&[
                ("pp", "Platinum"),
                ("gp", "Gold"),
                ("ep", "Electrum"),
                ("sp", "Silver"),
                ("cp", "Copper"),
            ]),
            proficiency_levels: vec![
                ProficiencyLabel {
                    multiplier: 0.0,
                    label: "Not Proficient".into(),
                },
                ProficiencyLabel {
                    multiplier: 0.5,
                    label: "Half Proficient".into(),
                },
                ProficiencyLabel {
                    multiplier: 1.0,
                    label: "Proficient".into(),
                },
                ProficiencyLabel {
                    multiplier: 2.0,
                    label: "Expertise".into(),
                },
            ],
        }
    }
}

/// Game rule constants for one ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfig {
    /// Maximum total character level across all classes
    pub max_level: u8,
    /// XP required to reach each level (index = level - 1)
    pub xp_thresholds: Vec<u32>,
    /// Weapon category (`weaponType`) → granted proficiency tag
    pub weapon_proficiencies: BTreeMap<String, CategoryGrant>,
    /// Armor category (`armor.type`) → granted proficiency tag
    pub armor_proficiencies: BTreeMap<String, CategoryGrant>,
    /// Character flag that makes improvised weapons proficient
    pub improvised_weapon_flag: String,
    pub carrying_capacity: CarryingCapacity,
    pub labels: LabelTables,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_level: 20,
            xp_thresholds: XP_THRESHOLDS.to_vec(),
            weapon_proficiencies: grants(&[
                ("simpleM", CategoryGrant::Tag("sim".into())),
                ("simpleR", CategoryGrant::Tag("sim".into())),
                ("martialM", CategoryGrant::Tag("mar".into())),
                ("martialR", CategoryGrant::Tag("mar".into())),
            ]),
            armor_proficiencies: grants(&[
                ("natural", CategoryGrant::Innate(true)),
                ("clothing", CategoryGrant::Innate(true)),
                ("light", CategoryGrant::Tag("lgt".into())),
                ("medium", CategoryGrant::Tag("med".into())),
                ("heavy", CategoryGrant::Tag("hvy".into())),
                ("shield", CategoryGrant::Tag("shl".into())),
            ]),
            improvised_weapon_flag: "tavernBrawlerFeat".into(),
            carrying_capacity: CarryingCapacity {
                imperial: 15.0,
                metric: 7.5,
            },
            labels: LabelTables::dnd5e(),
        }
    }
}

impl RulesConfig {
    /// XP required to reach `level`, if the level is in range.
    pub fn xp_for_level(&self, level: u8) -> Option<u32> {
        if level == 0 {
            return None;
        }
        self.xp_thresholds.get(usize::from(level) - 1).copied()
    }

    /// XP needed for the level after `current_level`; capped at the final threshold.
    pub fn xp_for_next_level(&self, current_level: u8) -> u32 {
        self.xp_thresholds
            .get(usize::from(current_level))
            .or_else(|| self.xp_thresholds.last())
            .copied()
            .unwrap_or(0)
    }
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn grants(entries: &[(&str, CategoryGrant)]) -> BTreeMap<String, CategoryGrant> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
