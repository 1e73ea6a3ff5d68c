//! Validation utilities for the dashboard forms and the loaded data files

use crate::models::{
    EnergySourceShares, ImpactAssumptions, SiteRecord, WaterSourceShares,
    MAX_CARBON_SEQ_KGCO2E_PER_M2, MAX_ENERGY_SAVED_KWH_PER_M3, MAX_WATER_GAIN_L_PER_M2,
};

/// Allowed drift of percentage groups that are expected to total 100
pub const PERCENT_TOTAL_TOLERANCE: f64 = 0.5;

// ============================================================================
// Source Mix Validations
// ============================================================================

/// Validate a single share slider value
pub fn validate_share_percent(value: u32) -> Result<(), &'static str> {
    if value > 100 {
        return Err("Share values must be between 0 and 100");
    }
    Ok(())
}

/// Validate every water share. The total is not checked here; an
/// unbalanced total is a warning, see [`WaterSourceShares::warning`].
pub fn validate_water_shares(shares: &WaterSourceShares) -> Result<(), &'static str> {
    shares
        .entries()
        .iter()
        .try_for_each(|(_, value)| validate_share_percent(*value))
}

pub fn validate_energy_shares(shares: &EnergySourceShares) -> Result<(), &'static str> {
    shares
        .entries()
        .iter()
        .try_for_each(|(_, value)| validate_share_percent(*value))
}

// ============================================================================
// Strategy Assumption Validations
// ============================================================================

/// Validate assumptions against the form bounds
pub fn validate_assumption_bounds(assumptions: &ImpactAssumptions) -> Result<(), &'static str> {
    if assumptions.validate().is_err() {
        return Err("Assumptions must be finite, non-negative numbers");
    }
    if assumptions.water_gain_l_per_m2 > MAX_WATER_GAIN_L_PER_M2 {
        return Err("Water gain must be between 0 and 200 L/m²");
    }
    if assumptions.energy_saved_kwh_per_m3 > MAX_ENERGY_SAVED_KWH_PER_M3 {
        return Err("Energy saved must be between 0 and 5 kWh/m³");
    }
    if assumptions.carbon_seq_kgco2e_per_m2 > MAX_CARBON_SEQ_KGCO2E_PER_M2 {
        return Err("Carbon sequestration must be between 0 and 20 kg CO₂e/m²");
    }
    Ok(())
}

// ============================================================================
// Site Data Validations
// ============================================================================

/// Check that land-cover percentages total roughly 100
pub fn land_cover_is_balanced(site: &SiteRecord) -> bool {
    (site.land_cover_total() - 100.0).abs() <= PERCENT_TOTAL_TOLERANCE
}

/// Validate a site's crop distribution: no negative share and no more than
/// the whole green area handed out
pub fn validate_crop_distribution(site: &SiteRecord) -> Result<(), &'static str> {
    if site
        .crop_distribution
        .iter()
        .any(|share| share.green_share_percent < 0.0)
    {
        return Err("Crop shares cannot be negative");
    }
    let total: f64 = site
        .crop_distribution
        .iter()
        .map(|share| share.green_share_percent)
        .sum();
    if total > 100.0 + PERCENT_TOTAL_TOLERANCE {
        return Err("Crop shares exceed the site's green area");
    }
    Ok(())
}

/// Validate a living lab or site name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CropShare;

    fn site(cover: &[(&str, f64)], crops: &[(&str, f64)]) -> SiteRecord {
        SiteRecord {
            name: "Site".to_string(),
            surface_m2: 100.0,
            land_cover_percent: cover.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            crop_distribution: crops
                .iter()
                .map(|(name, share)| CropShare {
                    name: name.to_string(),
                    green_share_percent: *share,
                })
                .collect(),
        }
    }

    // ========================================================================
    // Source Mix Tests
    // ========================================================================

    #[test]
    fn test_share_percent_range() {
        assert!(validate_share_percent(0).is_ok());
        assert!(validate_share_percent(100).is_ok());
        assert!(validate_share_percent(101).is_err());
    }

    #[test]
    fn test_unbalanced_shares_still_valid() {
        let water = WaterSourceShares {
            groundwater: 70,
            treated_wastewater: 70,
            surface_water: 0,
        };
        assert!(validate_water_shares(&water).is_ok());
        assert!(water.warning().is_some());

        let energy = EnergySourceShares {
            solar: 150,
            ..Default::default()
        };
        assert!(validate_energy_shares(&energy).is_err());
    }

    // ========================================================================
    // Assumption Tests
    // ========================================================================

    #[test]
    fn test_assumption_bounds() {
        assert!(validate_assumption_bounds(&ImpactAssumptions::default()).is_ok());

        let at_max = ImpactAssumptions {
            water_gain_l_per_m2: 200.0,
            energy_saved_kwh_per_m3: 5.0,
            carbon_seq_kgco2e_per_m2: 20.0,
            productivity_increase_percent: 250.0,
        };
        assert!(validate_assumption_bounds(&at_max).is_ok());

        let too_wet = ImpactAssumptions {
            water_gain_l_per_m2: 200.5,
            ..Default::default()
        };
        assert!(validate_assumption_bounds(&too_wet).is_err());

        let negative = ImpactAssumptions {
            energy_saved_kwh_per_m3: -0.1,
            ..Default::default()
        };
        assert!(validate_assumption_bounds(&negative).is_err());
    }

    // ========================================================================
    // Site Data Tests
    // ========================================================================

    #[test]
    fn test_land_cover_balance() {
        assert!(land_cover_is_balanced(&site(
            &[("residential", 20.0), ("mixed", 10.0), ("green", 60.0), ("water", 10.0)],
            &[]
        )));
        assert!(land_cover_is_balanced(&site(&[("green", 99.7)], &[])));
        assert!(!land_cover_is_balanced(&site(&[("green", 80.0)], &[])));
    }

    #[test]
    fn test_crop_distribution() {
        assert!(validate_crop_distribution(&site(&[], &[("Maize", 40.0), ("Unused Greenland", 60.0)])).is_ok());
        assert!(validate_crop_distribution(&site(&[], &[("Maize", -1.0)])).is_err());
        assert!(validate_crop_distribution(&site(&[], &[("Maize", 70.0), ("Teff", 40.0)])).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ghana").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }
}
