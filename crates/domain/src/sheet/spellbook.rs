//! Spellbook grouping.

use std::collections::BTreeMap;

use crate::entities::ItemRecord;
use crate::value_objects::RulesConfig;

use super::view::{ItemView, SpellSection, Spellbook};

fn spell_level(item: &ItemRecord) -> u8 {
    item.data()
        .number("level")
        .map(|l| l.clamp(0.0, 9.0) as u8)
        .unwrap_or(0)
}

/// Spells above level 0 prepared under the "prepared" mode.
pub(crate) fn prepared_count<'a>(spells: impl IntoIterator<Item = &'a ItemRecord>) -> usize {
    spells
        .into_iter()
        .filter(|spell| {
            let data = spell.data();
            spell_level(spell) > 0
                && data.string("preparation.mode") == "prepared"
                && data.flag("preparation.prepared")
        })
        .count()
}

/// Group visible spells by level, lowest first.
pub(crate) fn spellbook(
    visible: Vec<(&ItemRecord, ItemView)>,
    prepared_count: usize,
    rules: &RulesConfig,
) -> Spellbook {
    let mut by_level: BTreeMap<u8, Vec<ItemView>> = BTreeMap::new();
    for (record, view) in visible {
        by_level.entry(spell_level(record)).or_default().push(view);
    }
    let sections = by_level
        .into_iter()
        .map(|(level, items)| SpellSection {
            level,
            label: rules
                .labels
                .spell_levels
                .get(&level)
                .cloned()
                .unwrap_or_else(|| format!("Level {}", level)),
            items,
        })
        .collect();
    Spellbook {
        sections,
        prepared_count,
    }
}
