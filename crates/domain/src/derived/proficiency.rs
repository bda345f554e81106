//! Proficiency multiplier resolution.

use crate::aggregates::{Character, CharacterKind};
use crate::entities::ItemRecord;
use crate::templates::ItemKind;
use crate::value_objects::{CategoryGrant, RulesConfig, MAX_TOOL_MULTIPLIER};

/// How proficient `owner` is with `item`, as a multiplier of the proficiency bonus.
///
/// First match wins:
/// 1. an explicit finite per-item `proficient` override
/// 2. no owning character: 0
/// 3. a non-player owner: 1
/// 4. the owner's granted tags, by category and by base item
///
/// Owned spells and feats are always proficient. Every other kind without
/// tag grants resolves to 0, consumables included.
///
/// `owner` is only honoured when it is the character the item points at.
pub fn proficiency_multiplier(
    item: &ItemRecord,
    owner: Option<&Character>,
    rules: &RulesConfig,
) -> f64 {
    if let Some(explicit) = item.data().number("proficient") {
        return explicit;
    }
    let Some(character) = owner.filter(|c| item.owner() == Some(c.id())) else {
        return 0.0;
    };
    if character.kind() == CharacterKind::NonPlayer {
        return 1.0;
    }

    let data = item.data();
    let granted = character.proficiencies();
    match item.kind() {
        ItemKind::Weapon => {
            let proficient = match data.string("weaponType") {
                "natural" => true,
                "improvised" => character.has_flag(&rules.improvised_weapon_flag),
                category => {
                    grants(rules.weapon_proficiencies.get(category), |tag| {
                        granted.has_weapon(tag)
                    }) || granted.has_weapon(data.string("baseItem"))
                }
            };
            multiplier(proficient)
        }
        ItemKind::Equipment => {
            let category = rules.armor_proficiencies.get(data.string("armor.type"));
            multiplier(
                grants(category, |tag| granted.has_armor(tag))
                    || granted.has_armor(data.string("baseItem")),
            )
        }
        ItemKind::Tool => granted
            .tool(data.string("baseItem"))
            .max(granted.tool(data.string("toolType")))
            .clamp(0.0, MAX_TOOL_MULTIPLIER),
        ItemKind::Spell | ItemKind::Feat => 1.0,
        _ => 0.0,
    }
}

fn grants(grant: Option<&CategoryGrant>, has: impl Fn(&str) -> bool) -> bool {
    match grant {
        Some(CategoryGrant::Innate(always)) => *always,
        Some(CategoryGrant::Tag(tag)) => has(tag),
        None => false,
    }
}

fn multiplier(proficient: bool) -> f64 {
    if proficient {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::migrate;
    use crate::templates::TemplateRegistry;
    use crate::value_objects::{CharacterName, GrantedProficiencies};
    use crate::ItemId;
    use serde_json::{json, Value};

    fn rules() -> RulesConfig {
        RulesConfig::default()
    }

    fn owned(character: &Character, kind: ItemKind, system: Value) -> ItemRecord {
        let registry = TemplateRegistry::dnd5e(&rules()).unwrap();
        let data = migrate(registry.template(kind), &system);
        ItemRecord::new(ItemId::new(), "Thing", kind, data).with_owner(Some(character.id()))
    }

    fn fighter(grants: GrantedProficiencies) -> Character {
        Character::new(CharacterName::new("Bruenor").unwrap(), CharacterKind::Player)
            .with_proficiencies(grants)
    }

    fn grants(weapons: &[&str], armor: &[&str]) -> GrantedProficiencies {
        GrantedProficiencies {
            weapons: weapons.iter().map(|s| s.to_string()).collect(),
            armor: armor.iter().map(|s| s.to_string()).collect(),
            ..GrantedProficiencies::default()
        }
    }

    #[test]
    fn explicit_override_wins_regardless_of_owner() {
        let character = fighter(grants(&["mar"], &[]));
        let item = owned(&character, ItemKind::Weapon, json!({"weaponType": "martialM", "proficient": 0}));
        assert_eq!(proficiency_multiplier(&item, Some(&character), &rules()), 0.0);
        assert_eq!(proficiency_multiplier(&item, None, &rules()), 0.0);
        let tool = owned(&character, ItemKind::Tool, json!({"proficient": 1.5}));
        assert_eq!(proficiency_multiplier(&tool, None, &rules()), 1.5);
    }

    #[test]
    fn unowned_items_are_not_proficient() {
        let character = fighter(grants(&["sim"], &[]));
        let item = owned(&character, ItemKind::Weapon, json!({})).with_owner(None);
        assert_eq!(proficiency_multiplier(&item, Some(&character), &rules()), 0.0);
    }

    #[test]
    fn npc_owners_are_always_proficient() {
        let npc = Character::new(CharacterName::new("Goblin").unwrap(), CharacterKind::NonPlayer);
        let item = owned(&npc, ItemKind::Weapon, json!({"weaponType": "martialR"}));
        assert_eq!(proficiency_multiplier(&item, Some(&npc), &rules()), 1.0);
    }

    #[test]
    fn weapon_category_and_base_item_tags() {
        let character = fighter(grants(&["sim", "longsword"], &[]));
        let club = owned(&character, ItemKind::Weapon, json!({"weaponType": "simpleM"}));
        let longsword = owned(
            &character,
            ItemKind::Weapon,
            json!({"weaponType": "martialM", "baseItem": "longsword"}),
        );
        let rapier = owned(
            &character,
            ItemKind::Weapon,
            json!({"weaponType": "martialM", "baseItem": "rapier"}),
        );
        assert_eq!(proficiency_multiplier(&club, Some(&character), &rules()), 1.0);
        assert_eq!(proficiency_multiplier(&longsword, Some(&character), &rules()), 1.0);
        assert_eq!(proficiency_multiplier(&rapier, Some(&character), &rules()), 0.0);
    }

    #[test]
    fn natural_and_improvised_weapons() {
        let plain = fighter(grants(&[], &[]));
        let brawler = fighter(grants(&[], &[])).with_flag("tavernBrawlerFeat");
        for (character, improvised) in [(&plain, 0.0), (&brawler, 1.0)] {
            let claws = owned(character, ItemKind::Weapon, json!({"weaponType": "natural"}));
            let bottle = owned(character, ItemKind::Weapon, json!({"weaponType": "improvised"}));
            assert_eq!(proficiency_multiplier(&claws, Some(character), &rules()), 1.0);
            assert_eq!(proficiency_multiplier(&bottle, Some(character), &rules()), improvised);
        }
    }

    #[test]
    fn armor_categories() {
        let character = fighter(grants(&[], &["lgt"]));
        let leather = owned(&character, ItemKind::Equipment, json!({"armor": {"type": "light"}}));
        let plate = owned(&character, ItemKind::Equipment, json!({"armor": {"type": "heavy"}}));
        let robe = owned(&character, ItemKind::Equipment, json!({"armor": {"type": "clothing"}}));
        let ring = owned(&character, ItemKind::Equipment, json!({"armor": {"type": "trinket"}}));
        assert_eq!(proficiency_multiplier(&leather, Some(&character), &rules()), 1.0);
        assert_eq!(proficiency_multiplier(&plate, Some(&character), &rules()), 0.0);
        assert_eq!(proficiency_multiplier(&robe, Some(&character), &rules()), 1.0);
        assert_eq!(proficiency_multiplier(&ring, Some(&character), &rules()), 0.0);
    }

    #[test]
    fn tools_take_best_grant() {
        let mut granted = GrantedProficiencies::default();
        granted.tools.insert("thief".into(), 2.0);
        granted.tools.insert("art".into(), 0.5);
        let character = fighter(granted);
        let picks = owned(&character, ItemKind::Tool, json!({"baseItem": "thief"}));
        let brushes = owned(&character, ItemKind::Tool, json!({"toolType": "art", "baseItem": "painter"}));
        let lute = owned(&character, ItemKind::Tool, json!({"toolType": "music"}));
        assert_eq!(proficiency_multiplier(&picks, Some(&character), &rules()), 2.0);
        assert_eq!(proficiency_multiplier(&brushes, Some(&character), &rules()), 0.5);
        assert_eq!(proficiency_multiplier(&lute, Some(&character), &rules()), 0.0);
    }

    #[test]
    fn tool_grants_stay_within_expertise() {
        let mut granted = GrantedProficiencies::default();
        granted.tools.insert("thief".into(), 7.0);
        let character = fighter(granted);
        let picks = owned(&character, ItemKind::Tool, json!({"baseItem": "thief"}));
        assert_eq!(proficiency_multiplier(&picks, Some(&character), &rules()), 2.0);
    }

    #[test]
    fn owned_spells_and_features_are_proficient() {
        let character = fighter(grants(&[], &[]));
        let spell = owned(&character, ItemKind::Spell, json!({}));
        let loot = owned(&character, ItemKind::Loot, json!({}));
        assert_eq!(proficiency_multiplier(&spell, Some(&character), &rules()), 1.0);
        assert_eq!(proficiency_multiplier(&loot, Some(&character), &rules()), 0.0);
        let potion = owned(&character, ItemKind::Consumable, json!({}));
        assert_eq!(proficiency_multiplier(&potion, Some(&character), &rules()), 0.0);
    }

    #[test]
    fn owner_must_match_back_reference() {
        let owner = fighter(grants(&["sim"], &[]));
        let stranger = fighter(grants(&["sim"], &[]));
        let club = owned(&owner, ItemKind::Weapon, json!({"weaponType": "simpleM"}));
        assert_eq!(proficiency_multiplier(&club, Some(&stranger), &rules()), 0.0);
    }
}
