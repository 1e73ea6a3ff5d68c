//! Strategy impact calculator

use serde::Serialize;

use super::land::{affected_area, sites_in_scope};
use crate::models::{
    ImpactAssumptions, ImpactMetrics, Scope, SiteRecord, StrategyApplication, StrategyDefinition,
};

pub const LITRES_PER_M3: f64 = 1000.0;

/// Impact of one strategy on one site
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SiteImpact {
    pub site: String,
    #[serde(flatten)]
    pub metrics: ImpactMetrics,
}

/// Cost and savings of acting on `affected_land_types` of a single site.
///
/// Energy savings are derived from the water saved, not from the area.
/// Negative coefficients are read as zero.
pub fn evaluate_site<S: AsRef<str>>(
    site: &SiteRecord,
    affected_land_types: &[S],
    unit_cost_usd: f64,
    assumptions: &ImpactAssumptions,
) -> ImpactMetrics {
    let affected_m2 = affected_area(site, affected_land_types);
    let saved_water_m3_per_year =
        affected_m2 * assumptions.water_gain_l_per_m2.max(0.0) / LITRES_PER_M3;

    ImpactMetrics {
        affected_m2,
        total_cost_usd: affected_m2 * unit_cost_usd.max(0.0),
        saved_water_m3_per_year,
        saved_energy_kwh_per_year: saved_water_m3_per_year
            * assumptions.energy_saved_kwh_per_m3.max(0.0),
        carbon_sequestration_kgco2e_per_year: affected_m2
            * assumptions.carbon_seq_kgco2e_per_m2.max(0.0),
    }
}

/// Per-site impacts over a scope, in site order
pub fn evaluate_per_site<S: AsRef<str>>(
    sites: &[SiteRecord],
    scope: &Scope,
    affected_land_types: &[S],
    unit_cost_usd: f64,
    assumptions: &ImpactAssumptions,
) -> Vec<SiteImpact> {
    sites_in_scope(sites, scope)
        .map(|site| SiteImpact {
            site: site.name.clone(),
            metrics: evaluate_site(site, affected_land_types, unit_cost_usd, assumptions),
        })
        .collect()
}

/// Impact of a strategy over every site in scope, summed site by site
pub fn evaluate_application(
    sites: &[SiteRecord],
    scope: &Scope,
    strategy: &StrategyDefinition,
    assumptions: &ImpactAssumptions,
) -> ImpactMetrics {
    sites_in_scope(sites, scope)
        .map(|site| {
            evaluate_site(
                site,
                &strategy.affected_land_types,
                strategy.unit_cost_usd(),
                assumptions,
            )
        })
        .sum()
}

/// Impact of an applied strategy, using its snapshotted land types and cost
pub fn evaluate_snapshot(sites: &[SiteRecord], application: &StrategyApplication) -> ImpactMetrics {
    sites_in_scope(sites, &application.scope)
        .map(|site| {
            evaluate_site(
                site,
                &application.affected_land_types,
                application.unit_cost_usd,
                &application.assumptions,
            )
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, surface: f64, green: f64, water: f64) -> SiteRecord {
        SiteRecord {
            name: name.to_string(),
            surface_m2: surface,
            land_cover_percent: [("green".to_string(), green), ("water".to_string(), water)]
                .into_iter()
                .collect(),
            crop_distribution: vec![],
        }
    }

    fn strategy(types: &[&str], cost: f64) -> StrategyDefinition {
        StrategyDefinition {
            key: "agroforestry".to_string(),
            name: None,
            description: String::new(),
            affected_land_types: types.iter().map(|t| t.to_string()).collect(),
            cost_per_sqm_usd: cost,
            impacted_indicators: vec![],
            maintenance_intensity: None,
            expected_co_benefits: vec![],
            data_assumptions: None,
            time_horizon_years: None,
        }
    }

    #[test]
    fn test_single_site_scenario() {
        let sites = vec![site("A", 1000.0, 50.0, 0.0)];
        let m = evaluate_application(
            &sites,
            &Scope::All,
            &strategy(&["green"], 2.0),
            &ImpactAssumptions::default(),
        );
        assert_eq!(m.affected_m2, 500.0);
        assert_eq!(m.total_cost_usd, 1000.0);
        assert!((m.saved_water_m3_per_year - 10.0).abs() < 1e-12);
        assert!((m.saved_energy_kwh_per_year - 2.0).abs() < 1e-12);
        assert!((m.carbon_sequestration_kgco2e_per_year - 250.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_sites_is_sum_of_per_site() {
        let sites = vec![site("A", 1000.0, 50.0, 10.0), site("B", 4000.0, 20.0, 30.0)];
        let s = strategy(&["green", "water"], 1.5);
        let a = ImpactAssumptions::default();
        let total = evaluate_application(&sites, &Scope::All, &s, &a);
        let per_site = evaluate_per_site(&sites, &Scope::All, &s.affected_land_types, 1.5, &a);
        assert_eq!(per_site.len(), 2);
        let summed: ImpactMetrics = per_site.iter().map(|p| p.metrics).sum();
        assert_eq!(total, summed);
        assert_eq!(total.affected_m2, 600.0 + 2000.0);

        let only_b = evaluate_application(&sites, &Scope::site("B"), &s, &a);
        assert_eq!(only_b, per_site[1].metrics);
    }

    #[test]
    fn test_missing_site_contributes_nothing() {
        let sites = vec![site("A", 1000.0, 50.0, 0.0)];
        let m = evaluate_application(
            &sites,
            &Scope::site("Ghost"),
            &strategy(&["green"], 2.0),
            &ImpactAssumptions::default(),
        );
        assert_eq!(m, ImpactMetrics::ZERO);
    }

    #[test]
    fn test_negative_inputs_are_clamped() {
        let s = site("A", 1000.0, 50.0, 0.0);
        let bad = ImpactAssumptions {
            water_gain_l_per_m2: -5.0,
            energy_saved_kwh_per_m3: -1.0,
            carbon_seq_kgco2e_per_m2: -2.0,
            productivity_increase_percent: 0.0,
        };
        let m = evaluate_site(&s, &["green"], -3.0, &bad);
        assert!(m.is_non_negative());
        assert_eq!(m.affected_m2, 500.0);
        assert_eq!(m.total_cost_usd, 0.0);
    }
}
