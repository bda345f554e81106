//! Class and subclass ordering, pairing, and level choices.

use crate::aggregates::class_levels;
use crate::entities::ItemRecord;
use crate::value_objects::slugify;

use super::view::LevelOption;

/// Result of pairing classes with their subclasses.
#[derive(Debug, Default)]
pub(crate) struct Pairing<'a> {
    /// Classes by descending level, each followed by its subclass
    pub ordered: Vec<&'a ItemRecord>,
    /// Subclasses whose parent class is not on the character
    pub orphans: Vec<&'a ItemRecord>,
    pub warnings: Vec<String>,
}

/// Sort classes by level (highest first) and place each matching subclass after its class.
///
/// The sort is stable, so classes of equal level keep their input order.
pub(crate) fn pair<'a>(
    mut classes: Vec<&'a ItemRecord>,
    subclasses: Vec<&'a ItemRecord>,
) -> Pairing<'a> {
    classes.sort_by_key(|class| std::cmp::Reverse(class_levels(class)));

    let mut unmatched: Vec<Option<&ItemRecord>> = subclasses.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(classes.len() + unmatched.len());
    for class in classes {
        ordered.push(class);
        let identifier = class.identifier();
        let found = unmatched.iter_mut().find(|slot| {
            slot.is_some_and(|sub| slugify(sub.data().string("classIdentifier")) == identifier)
        });
        if let Some(subclass) = found.and_then(Option::take) {
            ordered.push(subclass);
        }
    }

    let orphans: Vec<&ItemRecord> = unmatched.into_iter().flatten().collect();
    let warnings = orphans
        .iter()
        .map(|sub| {
            format!(
                "Subclass {} has no matching class with identifier {:?}",
                sub.name(),
                sub.data().string("classIdentifier")
            )
        })
        .collect();
    Pairing {
        ordered,
        orphans,
        warnings,
    }
}

/// Level choices `1..=max_level` for a class currently at `current`.
///
/// An option is disabled when it would raise the total past `max_level`.
pub(crate) fn level_options(current: u8, total_level: u32, max_level: u8) -> Vec<LevelOption> {
    let headroom = i64::from(max_level) - i64::from(total_level);
    (1..=max_level)
        .map(|level| {
            let delta = i16::from(level) - i16::from(current);
            LevelOption {
                level,
                delta,
                disabled: i64::from(delta) > headroom,
            }
        })
        .collect()
}

/// `"Fighter 5 / Wizard 3"` for classes already ordered by level.
pub(crate) fn class_label(classes: &[&ItemRecord]) -> String {
    classes
        .iter()
        .map(|class| format!("{} {}", class.name(), class_levels(class)))
        .collect::<Vec<_>>()
        .join(" / ")
}
