//! Living lab and site land-cover records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::de;
use crate::error::EstimateResult;
use crate::types::{GeoArea, LandCover};

/// Sentinel crop-distribution entry for green area left unallocated
pub const UNUSED_GREENLAND: &str = "Unused Greenland";

/// Share of a site's green area given to one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropShare {
    #[serde(default)]
    pub name: String,
    /// Percentage of the site's green area (0-100)
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub green_share_percent: f64,
}

impl CropShare {
    pub fn is_unused_greenland(&self) -> bool {
        self.name.eq_ignore_ascii_case(UNUSED_GREENLAND)
    }
}

/// One site of a living lab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteRecord {
    #[serde(default)]
    pub name: String,
    /// Total site area. Source files label it `surface_m3`, but it is an area.
    #[serde(default, alias = "surface_m3", deserialize_with = "de::number_or_zero")]
    pub surface_m2: f64,
    /// Land-cover category → percentage of the site (expected to sum to ~100)
    #[serde(default, deserialize_with = "de::number_map")]
    pub land_cover_percent: BTreeMap<String, f64>,
    #[serde(default)]
    pub crop_distribution: Vec<CropShare>,
}

impl SiteRecord {
    /// Total area, negative source values read as empty
    pub fn total_area_m2(&self) -> f64 {
        self.surface_m2.max(0.0)
    }

    /// Percentage recorded for a land-cover key; unknown keys are 0
    pub fn land_cover(&self, key: &str) -> f64 {
        self.land_cover_percent.get(key).copied().unwrap_or(0.0)
    }

    pub fn land_cover_total(&self) -> f64 {
        self.land_cover_percent.values().sum()
    }
}

/// Land-use table row for the lab overview
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LandUseShare {
    pub land_use: LandCover,
    pub surface_m2: f64,
    pub share_percent: f64,
}

/// A living lab and its sites
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivingLab {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub climate_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub geolocation_area: Option<GeoArea>,
    #[serde(default, alias = "surface_m3", deserialize_with = "de::positive_number")]
    pub surface_m2: Option<f64>,
    #[serde(
        default,
        alias = "land_use_surfaces_m3",
        deserialize_with = "de::number_map"
    )]
    pub land_use_surfaces_m2: BTreeMap<String, f64>,
    #[serde(default)]
    pub sites: Vec<SiteRecord>,
}

impl LivingLab {
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the list of all living labs
    pub fn list_from_json_str(json: &str) -> EstimateResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn site(&self, name: &str) -> Option<&SiteRecord> {
        self.sites.iter().find(|site| site.name == name)
    }

    /// Land-use surfaces with their share of the lab's total surface.
    ///
    /// The total falls back to the sum of the land-use surfaces when the lab
    /// has no surface of its own. Empty when no land-use surfaces are recorded.
    pub fn land_use_shares(&self) -> Vec<LandUseShare> {
        if self.land_use_surfaces_m2.is_empty() {
            return Vec::new();
        }
        let total = self
            .surface_m2
            .unwrap_or_else(|| self.land_use_surfaces_m2.values().sum());

        LandCover::ALL
            .into_iter()
            .map(|land_use| {
                let surface_m2 = self
                    .land_use_surfaces_m2
                    .get(land_use.key())
                    .copied()
                    .unwrap_or(0.0);
                let share_percent = if total > 0.0 {
                    surface_m2 / total * 100.0
                } else {
                    0.0
                };
                LandUseShare {
                    land_use,
                    surface_m2,
                    share_percent,
                }
            })
            .collect()
    }
}
