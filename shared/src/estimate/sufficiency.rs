//! Self-sufficiency calculator

use std::collections::BTreeMap;

use serde::Serialize;

use super::agronomy::annual_yield_per_area;
use crate::models::{ConsumptionTable, CropCatalog, CropProfile};

/// Local annual production as a percentage of annual consumption.
///
/// `None` when the area is not positive, the consumption is missing or not
/// positive, or the crop lacks agronomy data. Never negative, and not capped
/// at 100.
pub fn self_sufficiency_percent(
    crop: &CropProfile,
    area_m2: f64,
    annual_consumption_kg: Option<f64>,
    weekly_yield_override: Option<f64>,
) -> Option<f64> {
    if !(area_m2 > 0.0) {
        return None;
    }
    let consumption_kg = annual_consumption_kg.filter(|kg| kg.is_finite() && *kg > 0.0)?;
    let yield_per_m2 = annual_yield_per_area(crop, weekly_yield_override).ok()?;
    let total_production_kg = yield_per_m2 * area_m2;

    Some((total_production_kg / consumption_kg * 100.0).max(0.0))
}

/// Baseline weekly yield scaled by a productivity multiplier
pub fn adjusted_weekly_yield(crop: &CropProfile, multiplier: f64) -> Option<f64> {
    crop.average_yield_g_per_week.map(|grams| grams * multiplier)
}

/// Starting and productivity-adjusted self-sufficiency of one crop
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductionRow {
    pub crop: String,
    pub productivity_increase_percent: f64,
    pub starting_self_sufficiency: Option<f64>,
    pub new_self_sufficiency: Option<f64>,
}

/// Evaluate each selected crop over its allocated area, before and after
/// applying `multiplier` to its weekly yield. Rows keep selection order.
pub fn production_rows<S: AsRef<str>>(
    selected_crops: &[S],
    catalog: &CropCatalog,
    areas: &BTreeMap<String, f64>,
    consumption: &ConsumptionTable,
    multiplier: f64,
) -> Vec<ProductionRow> {
    selected_crops
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let area_m2 = areas.get(name).copied().unwrap_or(0.0);
            let consumption_kg = consumption.annual_kg(name);
            let (starting, new) = match catalog.get(name) {
                Some(crop) => (
                    self_sufficiency_percent(crop, area_m2, consumption_kg, None),
                    adjusted_weekly_yield(crop, multiplier).and_then(|grams| {
                        self_sufficiency_percent(crop, area_m2, consumption_kg, Some(grams))
                    }),
                ),
                None => (None, None),
            };
            ProductionRow {
                crop: name.to_string(),
                productivity_increase_percent: (multiplier - 1.0) * 100.0,
                starting_self_sufficiency: starting,
                new_self_sufficiency: new,
            }
        })
        .collect()
}
