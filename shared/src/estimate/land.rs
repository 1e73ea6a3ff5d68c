//! Site land model: green-area crop allocation and strategy-affected area

use std::collections::BTreeMap;

use crate::error::{EstimateError, EstimateResult};
use crate::models::{Scope, SiteRecord};
use crate::types::LandCover;

/// Convert a percentage into a fraction clamped to [0, 1]
pub fn clamp_fraction(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

/// Green area of a site in m²
pub fn green_area_m2(site: &SiteRecord) -> f64 {
    site.total_area_m2() * clamp_fraction(site.land_cover(LandCover::Green.key()))
}

/// Area of one site allocated to a crop, in m².
///
/// Matches crop names exactly. "Unused Greenland" entries and non-positive
/// shares never contribute.
pub fn crop_area_allocation(site: &SiteRecord, crop_name: &str) -> f64 {
    let green = green_area_m2(site);
    site.crop_distribution
        .iter()
        .filter(|share| {
            share.name == crop_name && !share.is_unused_greenland() && share.green_share_percent > 0.0
        })
        .map(|share| green * clamp_fraction(share.green_share_percent))
        .sum()
}

/// Portion of a site covered by the given land-cover categories, in m².
/// Unknown categories contribute nothing.
pub fn affected_area<S: AsRef<str>>(site: &SiteRecord, affected_land_types: &[S]) -> f64 {
    let percent: f64 = affected_land_types
        .iter()
        .map(|kind| site.land_cover(kind.as_ref()))
        .sum();
    site.total_area_m2() * clamp_fraction(percent)
}

/// Sites covered by a scope. A named site that does not exist yields nothing.
pub fn sites_in_scope<'a>(
    sites: &'a [SiteRecord],
    scope: &'a Scope,
) -> impl Iterator<Item = &'a SiteRecord> + 'a {
    sites.iter().filter(move |site| scope.includes(&site.name))
}

/// Like [`sites_in_scope`], but reports a named site missing from the list
pub fn resolve_scope<'a>(sites: &'a [SiteRecord], scope: &Scope) -> EstimateResult<Vec<&'a SiteRecord>> {
    let resolved: Vec<&SiteRecord> = sites.iter().filter(|s| scope.includes(&s.name)).collect();
    match scope {
        Scope::Site(name) if resolved.is_empty() => Err(EstimateError::ScopeMismatch {
            site: name.clone(),
        }),
        _ => Ok(resolved),
    }
}

/// Area allocated to a crop across every site in scope
pub fn scoped_crop_area(sites: &[SiteRecord], scope: &Scope, crop_name: &str) -> f64 {
    sites_in_scope(sites, scope)
        .map(|site| crop_area_allocation(site, crop_name))
        .sum()
}

/// Crop name → allocated area for every crop distributed over the scope
pub fn crop_area_map(sites: &[SiteRecord], scope: &Scope) -> BTreeMap<String, f64> {
    let mut areas = BTreeMap::new();
    for site in sites_in_scope(sites, scope) {
        let green = green_area_m2(site);
        for share in &site.crop_distribution {
            if share.name.is_empty() || share.is_unused_greenland() || share.green_share_percent <= 0.0 {
                continue;
            }
            *areas.entry(share.name.clone()).or_insert(0.0) +=
                green * clamp_fraction(share.green_share_percent);
        }
    }
    areas
}
