//! Water and energy source mix forms

use serde::{Deserialize, Serialize};

/// Share groups edited on the WEFE analysis page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceGroup {
    Water,
    Energy,
}

impl std::fmt::Display for SourceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceGroup::Water => write!(f, "Water"),
            SourceGroup::Energy => write!(f, "Energy"),
        }
    }
}

/// Share group that does not sum to 100%. A warning, never a failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShareWarning {
    Incomplete { group: SourceGroup, total: u32 },
    Exceeded { group: SourceGroup, total: u32 },
}

impl ShareWarning {
    /// Classify a share total; `None` when it is exactly 100
    pub fn check(group: SourceGroup, total: u32) -> Option<Self> {
        match total {
            100 => None,
            t if t > 100 => Some(ShareWarning::Exceeded { group, total }),
            _ => Some(ShareWarning::Incomplete { group, total }),
        }
    }

    pub fn total(&self) -> u32 {
        match self {
            ShareWarning::Incomplete { total, .. } | ShareWarning::Exceeded { total, .. } => *total,
        }
    }
}

impl std::fmt::Display for ShareWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareWarning::Incomplete { group, total } => {
                write!(f, "{} shares total {}%. Adjust to 100%.", group, total)
            }
            ShareWarning::Exceeded { group, total } => {
                write!(f, "{} shares total {}%. Reduce values to 100%.", group, total)
            }
        }
    }
}

/// Sum of the share values, saturating at `u32::MAX`
fn saturating_total(entries: &[(&'static str, u32)]) -> u32 {
    entries.iter().fold(0u32, |acc, (_, v)| acc.saturating_add(*v))
}

/// Water supply mix, percent per source
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaterSourceShares {
    pub groundwater: u32,
    pub treated_wastewater: u32,
    pub surface_water: u32,
}

impl WaterSourceShares {
    pub fn entries(&self) -> [(&'static str, u32); 3] {
        [
            ("groundwater", self.groundwater),
            ("treated_wastewater", self.treated_wastewater),
            ("surface_water", self.surface_water),
        ]
    }

    pub fn total(&self) -> u32 {
        saturating_total(&self.entries())
    }

    pub fn warning(&self) -> Option<ShareWarning> {
        ShareWarning::check(SourceGroup::Water, self.total())
    }
}

/// Energy supply mix, percent per source
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnergySourceShares {
    pub gasoline: u32,
    pub hydropower: u32,
    pub wind: u32,
    pub solar: u32,
    pub diesel: u32,
}

impl EnergySourceShares {
    pub fn entries(&self) -> [(&'static str, u32); 5] {
        [
            ("gasoline", self.gasoline),
            ("hydropower", self.hydropower),
            ("wind", self.wind),
            ("solar", self.solar),
            ("diesel", self.diesel),
        ]
    }

    pub fn total(&self) -> u32 {
        saturating_total(&self.entries())
    }

    pub fn warning(&self) -> Option<ShareWarning> {
        ShareWarning::check(SourceGroup::Energy, self.total())
    }
}
