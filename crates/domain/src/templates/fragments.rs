//! Capability fragments: reusable groups of field declarations.
//!
//! Each item kind lists the fragments it is built from (see `kinds.rs`);
//! fragments never change once declared.

use super::field::FieldDecl;

/// Statically known capabilities a fragment grants to every kind that includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Stackable quantity, unit weight, and price
    Physical,
    /// Can be equipped and attuned
    Equippable,
    /// Has an activation cost, target, range, and duration
    Activation,
    /// Exposes a limited-use counter (`uses.value` / `uses.max`)
    LimitedUses,
}

/// A named group of field declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    name: &'static str,
    fields: Vec<FieldDecl>,
    requires: Vec<&'static str>,
    capabilities: Vec<Capability>,
}

impl Fragment {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            requires: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    /// Declare a field this fragment depends on but another fragment must provide.
    pub fn requires(mut self, path: &'static str) -> Self {
        self.requires.push(path);
        self
    }

    pub fn grants(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn required_fields(&self) -> &[&'static str] {
        &self.requires
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

// =============================================================================
// Choice tables
// =============================================================================

pub const ABILITIES: &[&str] = &["str", "dex", "con", "int", "wis", "cha"];
pub const DENOMINATIONS: &[&str] = &["pp", "gp", "ep", "sp", "cp"];
pub const RARITIES: &[&str] = &[
    "common",
    "uncommon",
    "rare",
    "veryRare",
    "legendary",
    "artifact",
];
pub const ATTUNEMENT: &[&str] = &["required", "optional"];
pub const ACTIVATION_TYPES: &[&str] = &[
    "action", "bonus", "reaction", "minute", "hour", "day", "special", "legendary", "lair",
    "crew", "none",
];
pub const TIME_UNITS: &[&str] = &[
    "inst", "turn", "round", "minute", "hour", "day", "month", "year", "perm", "spec",
];
pub const RECOVERY_PERIODS: &[&str] = &["sr", "lr", "day", "charges", "dawn", "dusk"];
pub const ACTION_TYPES: &[&str] = &[
    "mwak", "rwak", "msak", "rsak", "save", "heal", "abil", "util", "other",
];
pub const WEAPON_TYPES: &[&str] = &[
    "simpleM",
    "simpleR",
    "martialM",
    "martialR",
    "natural",
    "improvised",
    "siege",
];
pub const ARMOR_TYPES: &[&str] = &[
    "light", "medium", "heavy", "natural", "shield", "clothing", "trinket", "vehicle",
];
pub const CONSUMABLE_TYPES: &[&str] = &[
    "ammo", "potion", "poison", "food", "scroll", "wand", "rod", "trinket",
];
pub const TOOL_TYPES: &[&str] = &["art", "game", "music"];
pub const SPELL_SCHOOLS: &[&str] = &["abj", "con", "div", "enc", "evo", "ill", "nec", "trs"];
pub const PREPARATION_MODES: &[&str] = &["prepared", "always", "atwill", "innate", "pact"];
pub const FEAT_TYPES: &[&str] = &["class", "race", "feat", "background", "monster"];
pub const HIT_DICE: &[&str] = &["d6", "d8", "d10", "d12"];
pub const SPELL_PROGRESSIONS: &[&str] = &["none", "full", "half", "third", "pact", "artificer"];
pub const CAPACITY_TYPES: &[&str] = &["weight", "items"];

// =============================================================================
// Shared fragments
// =============================================================================

pub fn item_description() -> Fragment {
    Fragment::new("itemDescription")
        .field(FieldDecl::string("description.value", ""))
        .field(FieldDecl::string("description.chat", ""))
        .field(FieldDecl::string("source", ""))
}

pub fn physical_item() -> Fragment {
    Fragment::new("physicalItem")
        .grants(Capability::Physical)
        .field(FieldDecl::number("quantity", 1.0).integer().min(0.0))
        .field(FieldDecl::number("weight", 0.0).min(0.0))
        .field(FieldDecl::number("price.value", 0.0).min(0.0))
        .field(FieldDecl::choice("price.denomination", DENOMINATIONS, "gp"))
        .field(FieldDecl::choice("rarity", RARITIES, "").allow_blank())
        .field(FieldDecl::boolean("identified", true))
        .field(FieldDecl::string("container", "").nullable())
}

pub fn equippable_item() -> Fragment {
    Fragment::new("equippableItem")
        .grants(Capability::Equippable)
        .field(FieldDecl::choice("attunement", ATTUNEMENT, "").allow_blank())
        .field(FieldDecl::boolean("attuned", false))
        .field(FieldDecl::boolean("equipped", false))
}

pub fn activated_effect() -> Fragment {
    Fragment::new("activatedEffect")
        .grants(Capability::Activation)
        .grants(Capability::LimitedUses)
        .field(FieldDecl::choice("activation.type", ACTIVATION_TYPES, "").allow_blank())
        .field(FieldDecl::nullable_number("activation.cost").min(0.0))
        .field(FieldDecl::string("activation.condition", ""))
        .field(FieldDecl::string("duration.value", ""))
        .field(FieldDecl::choice("duration.units", TIME_UNITS, "").allow_blank())
        .field(FieldDecl::nullable_number("target.value").min(0.0))
        .field(FieldDecl::string("target.type", ""))
        .field(FieldDecl::nullable_number("range.value").min(0.0))
        .field(FieldDecl::nullable_number("range.long").min(0.0))
        .field(FieldDecl::string("range.units", ""))
        .field(FieldDecl::nullable_number("uses.value").integer().min(0.0))
        .field(FieldDecl::string("uses.max", ""))
        .field(FieldDecl::choice("uses.per", RECOVERY_PERIODS, "").allow_blank().nullable())
        .field(FieldDecl::string("consume.type", ""))
        .field(FieldDecl::string("consume.target", "").nullable())
        .field(FieldDecl::nullable_number("consume.amount"))
}

pub fn action() -> Fragment {
    Fragment::new("action")
        .requires("activation.type")
        .field(FieldDecl::choice("ability", ABILITIES, "").allow_blank().nullable())
        .field(FieldDecl::choice("actionType", ACTION_TYPES, "").allow_blank().nullable())
        .field(FieldDecl::string("attackBonus", ""))
        .field(FieldDecl::string("chatFlavor", ""))
        .field(FieldDecl::nullable_number("critical.threshold").integer().min(1.0))
        .field(FieldDecl::string("damage.formula", ""))
        .field(FieldDecl::string("damage.versatile", ""))
        .field(FieldDecl::choice("save.ability", ABILITIES, "").allow_blank())
        .field(FieldDecl::nullable_number("save.dc").integer().min(0.0))
}

/// Items that can be mounted on a vehicle carry their own armor and hit points.
pub fn mountable() -> Fragment {
    Fragment::new("mountable")
        .field(FieldDecl::number("armor.value", 10.0).integer().min(0.0))
        .field(FieldDecl::nullable_number("hp.value").integer().min(0.0))
        .field(FieldDecl::nullable_number("hp.max").integer().min(0.0))
}
