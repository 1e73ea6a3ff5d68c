//! Browser-side tests, run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wefe_dashboard_wasm::{
    calculate_self_sufficiency, check_energy_shares, check_water_shares, estimate_map_zoom,
};

wasm_bindgen_test_configure!(run_in_browser);

const MAIZE: &str = r#"{"name": "Maize", "space_m2_per_seed": 0.25,
                        "average_yield_g_per_week": 200, "yield_period_days": 70}"#;

#[wasm_bindgen_test]
fn share_checks_report_to_console() {
    assert_eq!(check_water_shares(60, 20, 20), None);
    assert_eq!(
        check_water_shares(60, 20, 0).as_deref(),
        Some("Water shares total 80%. Adjust to 100%.")
    );
    assert!(check_energy_shares(u32::MAX, 1, 0, 0, 0).is_some());
}

#[wasm_bindgen_test]
fn self_sufficiency_in_browser() {
    let pct = calculate_self_sufficiency(MAIZE, 100.0, 500.0, 0.0).unwrap().unwrap();
    assert!((pct - 834.2864).abs() < 1e-3);
    assert_eq!(calculate_self_sufficiency(MAIZE, 100.0, 0.0, 0.0).unwrap(), None);
    assert!(calculate_self_sufficiency("not json", 100.0, 500.0, 0.0).is_err());
}

#[wasm_bindgen_test]
fn map_zoom_in_browser() {
    assert_eq!(estimate_map_zoom(10.0, -3.0, 11.0, -2.0, 700, 900, 256), 9);
}
