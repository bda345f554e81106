//! Summary labels: experience progress and encumbrance.

use crate::aggregates::Character;
use crate::value_objects::{RulesConfig, UnitSystem};

use super::view::{Encumbrance, ExperienceLabel};

/// `quantity × unit weight`, rounded to the nearest 0.1.
pub(crate) fn total_weight(quantity: f64, weight: f64) -> f64 {
    (quantity * weight * 10.0).round() / 10.0
}

/// Progress toward the next level; `None` when experience is not tracked.
pub(crate) fn experience(character: &Character, rules: &RulesConfig) -> Option<ExperienceLabel> {
    if !character.settings().track_experience {
        return None;
    }
    let level = u8::try_from(character.total_level().max(1)).unwrap_or(u8::MAX);
    let min = rules.xp_for_level(level).unwrap_or(0);
    let max = rules.xp_for_next_level(level);
    let value = character.experience();
    let pct = if max > min {
        let progress = f64::from(value.saturating_sub(min)) / f64::from(max - min);
        (progress * 100.0).clamp(0.0, 100.0).round() as u8
    } else {
        100
    };
    Some(ExperienceLabel {
        value,
        min,
        max,
        pct,
    })
}

/// Carried weight against strength-based capacity.
pub(crate) fn encumbrance(character: &Character, carried: f64, rules: &RulesConfig) -> Encumbrance {
    let units = character.settings().units;
    let per_point = match units {
        UnitSystem::Imperial => rules.carrying_capacity.imperial,
        UnitSystem::Metric => rules.carrying_capacity.metric,
    };
    let max = f64::from(character.abilities().strength) * per_point;
    let value = (carried * 10.0).round() / 10.0;
    let pct = if max > 0.0 {
        ((value / max) * 100.0).clamp(0.0, 100.0).round()
    } else {
        100.0
    };
    Encumbrance {
        value,
        max,
        pct,
        units: units.weight_label(),
        encumbered: value > max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::CharacterKind;
    use crate::value_objects::{AbilityScores, CharacterName, SheetSettings};

    fn character() -> Character {
        Character::new(CharacterName::new("Kethra").unwrap(), CharacterKind::Player)
    }

    #[test]
    fn weight_rounds_to_tenths() {
        assert_eq!(total_weight(3.0, 0.33), 1.0);
        assert_eq!(total_weight(2.0, 1.25), 2.5);
        assert_eq!(total_weight(0.0, 5.0), 0.0);
    }

    #[test]
    fn experience_hidden_when_untracked() {
        let character = character().with_settings(SheetSettings {
            track_experience: false,
            ..SheetSettings::default()
        });
        assert!(experience(&character, &RulesConfig::default()).is_none());
    }

    #[test]
    fn experience_progress_between_thresholds() {
        let character = character().with_experience(150);
        let label = experience(&character, &RulesConfig::default()).unwrap();
        assert_eq!((label.min, label.max, label.pct), (0, 300, 50));
    }

    #[test]
    fn encumbrance_uses_unit_multiplier() {
        let abilities = AbilityScores {
            strength: 10,
            ..AbilityScores::default()
        };
        let character = character().with_abilities(abilities);
        let imperial = encumbrance(&character, 75.0, &RulesConfig::default());
        assert_eq!((imperial.max, imperial.pct, imperial.units), (150.0, 50.0, "lb"));
        assert!(!imperial.encumbered);

        let metric = character.with_settings(SheetSettings {
            units: UnitSystem::Metric,
            ..SheetSettings::default()
        });
        let metric = encumbrance(&metric, 80.0, &RulesConfig::default());
        assert_eq!((metric.max, metric.units), (75.0, "kg"));
        assert!(metric.encumbered);
        assert_eq!(metric.pct, 100.0);
    }
}
