//! Crop agronomy records

use serde::{Deserialize, Deserializer, Serialize};

use super::de;
use crate::error::{EstimateError, EstimateResult};
use crate::types::ValueRange;

/// Static agronomic parameters of one crop
///
/// The three numeric agronomy fields are `None` when the source record was
/// missing, non-numeric or non-positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    pub name: String,
    #[serde(default, deserialize_with = "de::positive_number")]
    pub space_m2_per_seed: Option<f64>,
    #[serde(default, deserialize_with = "de::positive_number")]
    pub average_yield_g_per_week: Option<f64>,
    /// Length of one harvest cycle
    #[serde(default, deserialize_with = "de::positive_number")]
    pub yield_period_days: Option<f64>,
    #[serde(default, deserialize_with = "de::finite_number")]
    pub water_required_l_per_kg_per_month: Option<f64>,
    #[serde(default)]
    pub ideal_soil_ph: Option<ValueRange>,
    #[serde(default)]
    pub ideal_temp_c: Option<ValueRange>,
}

/// Validated agronomy parameters, every field strictly positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropAgronomy {
    pub space_m2_per_seed: f64,
    pub weekly_yield_g: f64,
    pub yield_period_days: f64,
}

impl CropProfile {
    /// Profile with only a name, as produced for bare-string catalog entries
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            space_m2_per_seed: None,
            average_yield_g_per_week: None,
            yield_period_days: None,
            water_required_l_per_kg_per_month: None,
            ideal_soil_ph: None,
            ideal_temp_c: None,
        }
    }

    /// Validated parameters using the crop's own weekly yield
    pub fn agronomy(&self) -> EstimateResult<CropAgronomy> {
        let weekly = self
            .average_yield_g_per_week
            .ok_or_else(|| EstimateError::missing(&self.name, "average_yield_g_per_week"))?;
        self.agronomy_with_weekly_yield(weekly)
    }

    /// Validated parameters with the weekly yield replaced, e.g. after a
    /// productivity change
    pub fn agronomy_with_weekly_yield(&self, weekly_yield_g: f64) -> EstimateResult<CropAgronomy> {
        let space_m2_per_seed = self
            .space_m2_per_seed
            .ok_or_else(|| EstimateError::missing(&self.name, "space_m2_per_seed"))?;
        if !(weekly_yield_g.is_finite() && weekly_yield_g > 0.0) {
            return Err(EstimateError::missing(&self.name, "average_yield_g_per_week"));
        }
        let yield_period_days = self
            .yield_period_days
            .ok_or_else(|| EstimateError::missing(&self.name, "yield_period_days"))?;

        Ok(CropAgronomy {
            space_m2_per_seed,
            weekly_yield_g,
            yield_period_days,
        })
    }

    /// Lines shown in the crop info popover; unknown values print as `-`
    pub fn summary_lines(&self) -> Vec<String> {
        fn show(value: Option<f64>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        let ph = self.ideal_soil_ph.unwrap_or_default();
        let temp = self.ideal_temp_c.unwrap_or_default();

        let mut lines = vec![
            format!("pH ideal range: {} - {}", show(ph.min), show(ph.max)),
            format!("Water: {} L/kg/month", show(self.water_required_l_per_kg_per_month)),
            format!("Spacing: {} m²/seed", show(self.space_m2_per_seed)),
            format!("Temp ideal: {} - {} °C", show(temp.min), show(temp.max)),
        ];
        if let Some(days) = self.yield_period_days {
            lines.push(format!("Yield period: {} days", days));
        }
        if let Some(grams) = self.average_yield_g_per_week {
            lines.push(format!("Avg. yield: {} g/week", grams));
        }
        lines
    }
}

/// Crop grouping used by the crop selection form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CropGroup {
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "non-food")]
    NonFood,
}

/// All crops known to the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CropCatalog {
    #[serde(default, deserialize_with = "crop_entries")]
    pub food: Vec<CropProfile>,
    #[serde(default, rename = "non-food", deserialize_with = "crop_entries")]
    pub non_food: Vec<CropProfile>,
}

/// Catalog entries are either full profiles or bare crop names
#[derive(Deserialize)]
#[serde(untagged)]
enum CropEntry {
    Name(String),
    Profile(CropProfile),
}

fn crop_entries<'de, D>(deserializer: D) -> Result<Vec<CropProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<CropEntry>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            CropEntry::Name(name) => CropProfile::named(name),
            CropEntry::Profile(profile) => profile,
        })
        .filter(|crop| !crop.name.is_empty())
        .collect())
}

impl CropCatalog {
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn group(&self, group: CropGroup) -> &[CropProfile] {
        match group {
            CropGroup::Food => &self.food,
            CropGroup::NonFood => &self.non_food,
        }
    }

    /// Food crops first, then non-food, in file order
    pub fn iter(&self) -> impl Iterator<Item = &CropProfile> {
        self.food.iter().chain(self.non_food.iter())
    }

    pub fn get(&self, name: &str) -> Option<&CropProfile> {
        self.iter().find(|crop| crop.name == name)
    }

    pub fn group_of(&self, name: &str) -> Option<CropGroup> {
        if self.food.iter().any(|c| c.name == name) {
            Some(CropGroup::Food)
        } else if self.non_food.iter().any(|c| c.name == name) {
            Some(CropGroup::NonFood)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.food.len() + self.non_food.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
