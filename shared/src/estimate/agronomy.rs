//! Crop agronomy model

use serde::Serialize;

use crate::error::EstimateResult;
use crate::models::{CropAgronomy, CropProfile};

/// Average weeks per year (365 / 7)
pub const WEEKS_PER_YEAR: f64 = 52.1429;
pub const DAYS_PER_WEEK: f64 = 7.0;
pub const GRAMS_PER_KG: f64 = 1000.0;
/// Floor applied to the cycle length before dividing by it
pub const MIN_WEEKS_PER_CYCLE: f64 = 1e-6;

/// Intermediate quantities of the annual yield estimate
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct YieldBreakdown {
    pub plants_per_m2: f64,
    pub weeks_per_cycle: f64,
    pub cycles_per_year: f64,
    pub annual_yield_per_plant_kg: f64,
    pub annual_yield_per_m2_kg: f64,
}

impl CropAgronomy {
    /// Decompose yield into harvest cycles per year.
    ///
    /// Algebraically `weeks_per_cycle * cycles_per_year` is `WEEKS_PER_YEAR`,
    /// but the cycle terms are kept so weekly-yield overrides compose per cycle.
    pub fn breakdown(&self) -> YieldBreakdown {
        let plants_per_m2 = 1.0 / self.space_m2_per_seed;
        let weeks_per_cycle = self.yield_period_days / DAYS_PER_WEEK;
        let cycles_per_year = WEEKS_PER_YEAR / weeks_per_cycle.max(MIN_WEEKS_PER_CYCLE);
        let annual_yield_per_plant_kg =
            (self.weekly_yield_g / GRAMS_PER_KG) * weeks_per_cycle * cycles_per_year;

        YieldBreakdown {
            plants_per_m2,
            weeks_per_cycle,
            cycles_per_year,
            annual_yield_per_plant_kg,
            annual_yield_per_m2_kg: plants_per_m2 * annual_yield_per_plant_kg,
        }
    }
}

/// Yield breakdown of a crop, optionally with its weekly yield overridden
pub fn yield_breakdown(
    crop: &CropProfile,
    weekly_yield_override: Option<f64>,
) -> EstimateResult<YieldBreakdown> {
    let agronomy = match weekly_yield_override {
        Some(weekly_yield_g) => crop.agronomy_with_weekly_yield(weekly_yield_g)?,
        None => crop.agronomy()?,
    };
    Ok(agronomy.breakdown())
}

/// Annual yield in kg per m² per year.
///
/// Fails with `MissingData` when spacing, weekly yield or yield period is
/// missing or not positive.
pub fn annual_yield_per_area(
    crop: &CropProfile,
    weekly_yield_override: Option<f64>,
) -> EstimateResult<f64> {
    yield_breakdown(crop, weekly_yield_override).map(|b| b.annual_yield_per_m2_kg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimateError;
    use proptest::prelude::*;

    fn crop(space: f64, weekly_g: f64, days: f64) -> CropProfile {
        CropProfile {
            space_m2_per_seed: Some(space),
            average_yield_g_per_week: Some(weekly_g),
            yield_period_days: Some(days),
            ..CropProfile::named("Test crop")
        }
    }

    #[test]
    fn test_reference_crop_breakdown() {
        let b = yield_breakdown(&crop(0.25, 200.0, 70.0), None).unwrap();
        assert!((b.plants_per_m2 - 4.0).abs() < 1e-12);
        assert!((b.weeks_per_cycle - 10.0).abs() < 1e-12);
        assert!((b.cycles_per_year - 5.21429).abs() < 1e-9);
        assert!((b.annual_yield_per_plant_kg - 10.42858).abs() < 1e-6);
        assert!((b.annual_yield_per_m2_kg - 41.71432).abs() < 1e-5);
    }

    #[test]
    fn test_override_replaces_weekly_yield() {
        let maize = crop(0.25, 200.0, 70.0);
        let base = annual_yield_per_area(&maize, None).unwrap();
        let boosted = annual_yield_per_area(&maize, Some(240.0)).unwrap();
        assert!((boosted / base - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_missing_fields_signal_insufficient_data() {
        let mut no_spacing = crop(0.25, 200.0, 70.0);
        no_spacing.space_m2_per_seed = None;
        assert!(matches!(
            annual_yield_per_area(&no_spacing, None),
            Err(EstimateError::MissingData { field: "space_m2_per_seed", .. })
        ));

        let mut no_yield = crop(0.25, 200.0, 70.0);
        no_yield.average_yield_g_per_week = None;
        assert!(annual_yield_per_area(&no_yield, None).is_err());
        // An explicit override still needs spacing and period, but not a baseline yield
        assert!(annual_yield_per_area(&no_yield, Some(100.0)).is_ok());

        assert!(annual_yield_per_area(&crop(0.25, 200.0, 70.0), Some(-5.0)).is_err());
    }

    #[test]
    fn test_tiny_yield_period_is_floored() {
        let b = crop(1.0, 100.0, 1e-9).agronomy().unwrap().breakdown();
        assert!(b.cycles_per_year.is_finite());
        assert!(b.annual_yield_per_m2_kg.is_finite());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Yield per area grows strictly with weekly yield
        #[test]
        fn property_yield_increasing_in_weekly_yield(
            spacing_cm2 in 1u32..10_000,
            weekly_g in 1u32..5_000,
            delta in 1u32..1_000,
            days in 1u32..400,
        ) {
            let space = spacing_cm2 as f64 / 10_000.0;
            let low = annual_yield_per_area(&crop(space, weekly_g as f64, days as f64), None).unwrap();
            let high = annual_yield_per_area(&crop(space, (weekly_g + delta) as f64, days as f64), None).unwrap();
            prop_assert!(high > low, "expected {} > {}", high, low);
        }

        /// Yield per area shrinks strictly as plants are spaced further apart
        #[test]
        fn property_yield_decreasing_in_spacing(
            spacing_cm2 in 1u32..10_000,
            delta in 1u32..1_000,
            weekly_g in 1u32..5_000,
            days in 1u32..400,
        ) {
            let tight = annual_yield_per_area(
                &crop(spacing_cm2 as f64 / 10_000.0, weekly_g as f64, days as f64), None).unwrap();
            let wide = annual_yield_per_area(
                &crop((spacing_cm2 + delta) as f64 / 10_000.0, weekly_g as f64, days as f64), None).unwrap();
            prop_assert!(wide < tight, "expected {} < {}", wide, tight);
        }
    }
}
