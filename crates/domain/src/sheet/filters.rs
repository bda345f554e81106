//! Named filter predicates supplied by the presentation layer.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::ItemRecord;
use crate::error::DomainError;
use crate::templates::ItemKind;

/// A boolean predicate over one item. Items must pass every active predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterPredicate {
    /// Activation costs an action
    Action,
    /// Activation costs a bonus action
    Bonus,
    /// Activation costs a reaction
    Reaction,
    Ritual,
    Concentration,
    /// Spells that are usable now (cantrips, prepared, or not needing preparation)
    Prepared,
    Equipped,
    /// Hides items whose limited-use counter is empty
    Charged,
    /// Magical items
    #[serde(rename = "mgc")]
    Magical,
}

impl FilterPredicate {
    pub const ALL: [FilterPredicate; 9] = [
        FilterPredicate::Action,
        FilterPredicate::Bonus,
        FilterPredicate::Reaction,
        FilterPredicate::Ritual,
        FilterPredicate::Concentration,
        FilterPredicate::Prepared,
        FilterPredicate::Equipped,
        FilterPredicate::Charged,
        FilterPredicate::Magical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Bonus => "bonus",
            Self::Reaction => "reaction",
            Self::Ritual => "ritual",
            Self::Concentration => "concentration",
            Self::Prepared => "prepared",
            Self::Equipped => "equipped",
            Self::Charged => "charged",
            Self::Magical => "mgc",
        }
    }

    pub fn accepts(&self, item: &ItemRecord) -> bool {
        let data = item.data();
        match self {
            Self::Action => data.string("activation.type") == "action",
            Self::Bonus => data.string("activation.type") == "bonus",
            Self::Reaction => data.string("activation.type") == "reaction",
            Self::Ritual => data.has_flag("components", "ritual"),
            Self::Concentration => data.has_flag("components", "concentration"),
            Self::Prepared => {
                if item.kind() != ItemKind::Spell {
                    return true;
                }
                let cantrip = data.number("level") == Some(0.0);
                let needs_preparation = data.string("preparation.mode") == "prepared";
                cantrip || !needs_preparation || data.flag("preparation.prepared")
            }
            Self::Equipped => data.flag("equipped"),
            Self::Charged => {
                data.string("uses.max").trim().is_empty()
                    || data.number("uses.value").is_some_and(|v| v > 0.0)
            }
            Self::Magical => data.has_flag("properties", "mgc"),
        }
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterPredicate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| DomainError::parse(format!("Unknown filter: {}", s)))
    }
}

/// Active predicates for each filterable partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    pub inventory: BTreeSet<FilterPredicate>,
    pub spellbook: BTreeSet<FilterPredicate>,
    pub features: BTreeSet<FilterPredicate>,
}

impl FilterSet {
    /// Parse `inventory=equipped;spellbook=prepared,ritual`.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let mut filters = Self::default();
        for clause in input.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            let (partition, names) = clause.split_once('=').ok_or_else(|| {
                DomainError::parse(format!("Filter clause {:?} is missing '='", clause))
            })?;
            let target = match partition.trim() {
                "inventory" => &mut filters.inventory,
                "spellbook" => &mut filters.spellbook,
                "features" => &mut filters.features,
                other => {
                    return Err(DomainError::parse(format!("Unknown partition: {}", other)))
                }
            };
            for name in names.split(',').filter(|n| !n.trim().is_empty()) {
                target.insert(name.parse()?);
            }
        }
        Ok(filters)
    }
}

/// Whether `item` passes every predicate in `active`.
pub fn passes(active: &BTreeSet<FilterPredicate>, item: &ItemRecord) -> bool {
    active.iter().all(|predicate| predicate.accepts(item))
}
