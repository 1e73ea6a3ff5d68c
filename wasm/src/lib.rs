//! WebAssembly module for the WEFE living-lab dashboard
//!
//! Provides client-side computation for:
//! - Strategy impact previews and aggregates
//! - Crop yield and self-sufficiency
//! - Water and energy share checks
//! - Map zoom estimation
//!
//! Records cross the boundary as JSON strings.

use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use wefe_shared::models::*;
pub use wefe_shared::types::*;
pub use wefe_shared::validation::*;

use wefe_shared::estimate;
use wefe_shared::geo::{estimate_zoom, Bounds};

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(Serialize)]
struct ApplicationPreview {
    impact: ImpactMetrics,
    per_site: Vec<estimate::SiteImpact>,
}

#[derive(Serialize)]
struct ApplicationsAggregate {
    impact: ImpactMetrics,
    effective_multiplier: f64,
}

fn preview(sites: &[SiteRecord], strategy: &StrategyDefinition, assumptions: &ImpactAssumptions, scope: &str) -> ApplicationPreview {
    let per_site = estimate::evaluate_per_site(
        sites,
        &Scope::from(scope),
        &strategy.affected_land_types,
        strategy.unit_cost_usd(),
        assumptions,
    );
    ApplicationPreview {
        impact: per_site.iter().map(|row| row.metrics).sum(),
        per_site,
    }
}

/// Impact of one strategy over `scope` ("ALL" or a site name).
/// Returns `{impact, per_site}`.
#[wasm_bindgen]
pub fn evaluate_application_json(
    sites_json: &str,
    strategy_json: &str,
    assumptions_json: &str,
    scope: &str,
) -> Result<String, JsValue> {
    let sites: Vec<SiteRecord> = parse(sites_json, "sites")?;
    let strategy: StrategyDefinition = parse(strategy_json, "strategy")?;
    let assumptions: ImpactAssumptions = parse(assumptions_json, "assumptions")?;

    to_json(&preview(&sites, &strategy, &assumptions, scope))
}

/// Totals over a list of applied strategies.
/// Returns `{impact, effective_multiplier}`.
#[wasm_bindgen]
pub fn aggregate_applications_json(applications_json: &str, sites_json: &str) -> Result<String, JsValue> {
    let applications: Vec<StrategyApplication> = parse(applications_json, "applications")?;
    let sites: Vec<SiteRecord> = parse(sites_json, "sites")?;

    to_json(&ApplicationsAggregate {
        impact: estimate::aggregate(&applications, &sites),
        effective_multiplier: estimate::effective_productivity_multiplier(&applications),
    })
}

/// Self-sufficiency percentage of a crop, after a productivity increase.
/// `undefined` when it cannot be computed.
#[wasm_bindgen]
pub fn calculate_self_sufficiency(
    crop_json: &str,
    area_m2: f64,
    annual_consumption_kg: f64,
    productivity_increase_percent: f64,
) -> Result<Option<f64>, JsValue> {
    let crop: CropProfile = parse(crop_json, "crop")?;
    let multiplier = 1.0 + productivity_increase_percent.max(0.0) / 100.0;
    let weekly = estimate::adjusted_weekly_yield(&crop, multiplier);

    Ok(estimate::self_sufficiency_percent(&crop, area_m2, Some(annual_consumption_kg), weekly))
}

/// Annual yield in kg per m², `undefined` for non-positive inputs
#[wasm_bindgen]
pub fn calculate_annual_yield_per_area(
    space_m2_per_seed: f64,
    average_yield_g_per_week: f64,
    yield_period_days: f64,
) -> Option<f64> {
    let positive = |v: f64| Some(v).filter(|v| v.is_finite() && *v > 0.0);
    let crop = CropProfile {
        space_m2_per_seed: positive(space_m2_per_seed),
        average_yield_g_per_week: positive(average_yield_g_per_week),
        yield_period_days: positive(yield_period_days),
        ..CropProfile::named("crop")
    };
    estimate::annual_yield_per_area(&crop, None).ok()
}

/// Product of `1 + p/100` over the given increases
#[wasm_bindgen]
pub fn effective_multiplier_from_percents(percents: &[f64]) -> f64 {
    percents
        .iter()
        .map(|p| 1.0 + p.max(0.0) / 100.0)
        .product()
}

fn report(warning: Option<ShareWarning>) -> Option<String> {
    let message = warning?.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&message));
    Some(message)
}

/// Warning text when the water mix does not total 100%
#[wasm_bindgen]
pub fn check_water_shares(groundwater: u32, treated_wastewater: u32, surface_water: u32) -> Option<String> {
    report(
        WaterSourceShares {
            groundwater,
            treated_wastewater,
            surface_water,
        }
        .warning(),
    )
}

/// Warning text when the energy mix does not total 100%
#[wasm_bindgen]
pub fn check_energy_shares(gasoline: u32, hydropower: u32, wind: u32, solar: u32, diesel: u32) -> Option<String> {
    report(
        EnergySourceShares {
            gasoline,
            hydropower,
            wind,
            solar,
            diesel,
        }
        .warning(),
    )
}

#[wasm_bindgen]
pub fn estimate_map_zoom(
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
    map_width_px: u32,
    map_height_px: u32,
    tile_size_px: u32,
) -> u8 {
    let bounds = Bounds {
        min_lat,
        min_lon,
        max_lat,
        max_lon,
    };
    estimate_zoom(&bounds, map_width_px, map_height_px, tile_size_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITES: &str = r#"[
        {"name": "A", "surface_m3": 1000, "land_cover_percent": {"green": 50, "water": 10}},
        {"name": "B", "surface_m2": 400, "land_cover_percent": {"green": "25"}}
    ]"#;

    #[test]
    fn test_evaluate_application_json() {
        let strategy = r#"{"key": "agroforestry", "affected_land_types": ["green"], "cost_per_sqm_usd": 2}"#;
        let json = evaluate_application_json(SITES, strategy, "{}", "A").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["impact"]["affected_m2"], 500.0);
        assert_eq!(value["impact"]["total_cost_usd"], 1000.0);
        assert_eq!(value["per_site"][0]["site"], "A");

        let all = evaluate_application_json(SITES, strategy, "{}", "ALL").unwrap();
        let value: serde_json::Value = serde_json::from_str(&all).unwrap();
        assert_eq!(value["impact"]["affected_m2"], 600.0);
    }

    #[test]
    fn test_aggregate_applications_json() {
        let applications = r#"[
            {"id": "6f1c1f8e-2b8e-4a57-9a1e-0d6a5c1f4b10", "strategy_key": "a", "strategy_name": "A",
             "scope": "ALL", "affected_land_types": ["green"], "unit_cost_usd": 1.0,
             "assumptions": {"productivity_increase_percent": 20}, "applied_at": "2025-01-01T00:00:00Z"},
            {"id": "0c5d0e1a-3f4b-4c2d-8e9f-1a2b3c4d5e6f", "strategy_key": "b", "strategy_name": "B",
             "scope": "B", "affected_land_types": ["green"], "unit_cost_usd": 2.0,
             "assumptions": {"productivity_increase_percent": 10}, "applied_at": "2025-01-01T00:00:00Z"}
        ]"#;
        let json = aggregate_applications_json(applications, SITES).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["impact"]["affected_m2"], 600.0 + 100.0);
        assert_eq!(value["impact"]["total_cost_usd"], 600.0 + 200.0);
        let multiplier = value["effective_multiplier"].as_f64().unwrap();
        assert!((multiplier - 1.32).abs() < 1e-12);
    }

    #[test]
    fn test_self_sufficiency() {
        let crop = r#"{"name": "Maize", "space_m2_per_seed": 0.25,
                       "average_yield_g_per_week": 200, "yield_period_days": 70}"#;
        let base = calculate_self_sufficiency(crop, 100.0, 500.0, 0.0).unwrap().unwrap();
        assert!((base - 834.2864).abs() < 1e-3);
        let boosted = calculate_self_sufficiency(crop, 100.0, 500.0, 50.0).unwrap().unwrap();
        assert!((boosted / base - 1.5).abs() < 1e-9);
        assert_eq!(calculate_self_sufficiency(crop, 0.0, 500.0, 0.0).unwrap(), None);
    }

    #[test]
    fn test_annual_yield_per_area() {
        let y = calculate_annual_yield_per_area(0.25, 200.0, 70.0).unwrap();
        assert!((y - 41.71432).abs() < 1e-4);
        assert_eq!(calculate_annual_yield_per_area(0.0, 200.0, 70.0), None);
        assert_eq!(calculate_annual_yield_per_area(0.25, f64::NAN, 70.0), None);
    }

    #[test]
    fn test_multiplier_from_percents() {
        assert_eq!(effective_multiplier_from_percents(&[]), 1.0);
        assert!((effective_multiplier_from_percents(&[20.0, 20.0]) - 1.44).abs() < 1e-12);
    }

    #[test]
    fn test_share_checks() {
        assert_eq!(check_water_shares(50, 30, 20), None);
        assert_eq!(
            check_water_shares(50, 30, 0).as_deref(),
            Some("Water shares total 80%. Adjust to 100%.")
        );
        assert_eq!(
            check_energy_shares(50, 50, 10, 0, 0).as_deref(),
            Some("Energy shares total 110%. Reduce values to 100%.")
        );
    }

    #[test]
    fn test_share_checks_with_extreme_values() {
        let message = check_water_shares(u32::MAX, 1, 0).unwrap();
        assert!(message.contains("Reduce values to 100%"));
        assert!(check_energy_shares(u32::MAX, u32::MAX, 0, 0, 1).is_some());
    }

    #[test]
    fn test_map_zoom() {
        assert_eq!(estimate_map_zoom(10.0, -3.0, 11.0, -2.0, 700, 900, 256), 9);
    }
}
