//! Coin purse and denomination conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coin denominations, smallest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Pp,
    Gp,
    Ep,
    Sp,
    Cp,
}

impl Denomination {
    pub const ALL: [Denomination; 5] = [
        Denomination::Pp,
        Denomination::Gp,
        Denomination::Ep,
        Denomination::Sp,
        Denomination::Cp,
    ];

    /// Value of one coin in copper pieces.
    pub fn copper_value(self) -> u64 {
        match self {
            Self::Pp => 1000,
            Self::Gp => 100,
            Self::Ep => 50,
            Self::Sp => 10,
            Self::Cp => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pp => "pp",
            Self::Gp => "gp",
            Self::Ep => "ep",
            Self::Sp => "sp",
            Self::Cp => "cp",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coins carried by a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub pp: u64,
    pub gp: u64,
    pub ep: u64,
    pub sp: u64,
    pub cp: u64,
}

impl Currency {
    pub fn get(&self, denomination: Denomination) -> u64 {
        match denomination {
            Denomination::Pp => self.pp,
            Denomination::Gp => self.gp,
            Denomination::Ep => self.ep,
            Denomination::Sp => self.sp,
            Denomination::Cp => self.cp,
        }
    }

    fn slot(&mut self, denomination: Denomination) -> &mut u64 {
        match denomination {
            Denomination::Pp => &mut self.pp,
            Denomination::Gp => &mut self.gp,
            Denomination::Ep => &mut self.ep,
            Denomination::Sp => &mut self.sp,
            Denomination::Cp => &mut self.cp,
        }
    }

    /// Total wealth expressed in copper pieces.
    pub fn total_copper(&self) -> u64 {
        Denomination::ALL
            .iter()
            .map(|d| self.get(*d).saturating_mul(d.copper_value()))
            .fold(0, u64::saturating_add)
    }

    /// Roll smaller coins up into the largest denominations that hold them.
    ///
    /// Total wealth is preserved; any remainder stays in the smaller coin.
    pub fn consolidated(&self) -> Self {
        let mut out = *self;
        // Smallest first so each step can carry into the next
        for pair in Denomination::ALL.windows(2).rev() {
            let (larger, smaller) = (pair[0], pair[1]);
            let rate = larger.copper_value() / smaller.copper_value();
            let carried = out.get(smaller) / rate;
            *out.slot(smaller) -= carried * rate;
            let slot = out.slot(larger);
            *slot = slot.saturating_add(carried);
        }
        out
    }

    pub fn is_consolidated(&self) -> bool {
        self.consolidated() == *self
    }
}
