//! Aggregation across applied strategies

use super::impact::evaluate_snapshot;
use super::land::crop_area_map;
use super::sufficiency::{production_rows, ProductionRow};
use crate::models::{
    ConsumptionTable, CropCatalog, ImpactMetrics, Scope, SiteRecord, StrategyApplication,
};

/// Sum of every application's impact. Each scope is resolved against the
/// given site set, not a cached copy.
pub fn aggregate(applications: &[StrategyApplication], sites: &[SiteRecord]) -> ImpactMetrics {
    applications
        .iter()
        .map(|application| evaluate_snapshot(sites, application))
        .sum()
}

/// Compounded yield multiplier: product of `1 + p/100` over all applications.
/// Two +20% strategies give 1.44, not 1.40.
pub fn effective_productivity_multiplier(applications: &[StrategyApplication]) -> f64 {
    applications
        .iter()
        .map(|application| application.assumptions.productivity_multiplier())
        .product()
}

/// Self-sufficiency of the selected crops under the compounded multiplier.
/// Always evaluated over the crop areas of every site, whatever the
/// applications' own scopes.
pub fn aggregate_production<S: AsRef<str>>(
    applications: &[StrategyApplication],
    selected_crops: &[S],
    sites: &[SiteRecord],
    catalog: &CropCatalog,
    consumption: &ConsumptionTable,
) -> Vec<ProductionRow> {
    let areas = crop_area_map(sites, &Scope::All);
    production_rows(
        selected_crops,
        catalog,
        &areas,
        consumption,
        effective_productivity_multiplier(applications),
    )
}
