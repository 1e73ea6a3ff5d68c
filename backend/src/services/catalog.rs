//! Read-only views over the static data: labs, crops and strategies

use std::sync::Arc;

use serde::Serialize;
use wefe_shared::geo::{Bounds, FeatureCollection, MapView};
use wefe_shared::{CropGroup, CropProfile, GeoArea, LandUseShare, LivingLab, StrategyDefinition};

use super::data::DataStore;
use crate::error::AppResult;

#[derive(Clone)]
pub struct CatalogService {
    data: Arc<DataStore>,
}

/// Lab picker entry
#[derive(Debug, Serialize)]
pub struct LabSummary {
    pub name: String,
    pub country: String,
    pub climate_type: String,
    pub site_count: usize,
    pub geolocation_area: Option<GeoArea>,
}

#[derive(Debug, Serialize)]
pub struct LabDetail {
    #[serde(flatten)]
    pub lab: LivingLab,
    pub land_use_shares: Vec<LandUseShare>,
}

#[derive(Debug, Serialize)]
pub struct CropView {
    pub group: CropGroup,
    #[serde(flatten)]
    pub profile: CropProfile,
    pub summary_lines: Vec<String>,
}

impl CatalogService {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self { data }
    }

    pub fn list_labs(&self) -> Vec<LabSummary> {
        self.data
            .labs
            .iter()
            .map(|l| LabSummary {
                name: l.lab.name.clone(),
                country: l.lab.country.clone(),
                climate_type: l.lab.climate_type.clone(),
                site_count: l.lab.sites.len(),
                geolocation_area: l.lab.geolocation_area,
            })
            .collect()
    }

    pub fn get_lab(&self, name: &str) -> AppResult<LabDetail> {
        let lab = &self.data.lab(name)?.lab;
        Ok(LabDetail {
            land_use_shares: lab.land_use_shares(),
            lab: lab.clone(),
        })
    }

    /// Map framing from the lab's site polygons, falling back to its
    /// geolocation rectangle
    pub fn lab_map(&self, name: &str) -> AppResult<MapView> {
        let lab = self.data.lab(name)?;
        let view = match (&lab.site_map, lab.lab.geolocation_area) {
            (Some(collection), _) => MapView::from_collection(collection),
            (None, Some(area)) => MapView::framing(Bounds::from_area(&area), 0),
            (None, None) => MapView::from_collection(&FeatureCollection::default()),
        };
        tracing::debug!(lab = %name, zoom = view.zoom, sites = view.site_count, "Map view computed");
        Ok(view)
    }

    pub fn crops(&self) -> Vec<CropView> {
        [CropGroup::Food, CropGroup::NonFood]
            .into_iter()
            .flat_map(|group| {
                self.data.crops.group(group).iter().map(move |profile| CropView {
                    group,
                    profile: profile.clone(),
                    summary_lines: profile.summary_lines(),
                })
            })
            .collect()
    }

    pub fn strategies(&self) -> &[StrategyDefinition] {
        &self.data.strategies.strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data::LabData;
    use wefe_shared::{CropCatalog, StrategyCatalog};

    fn service() -> CatalogService {
        let lab = LivingLab::from_json_str(
            r#"{"name": "Ghana", "country": "Ghana",
                "geolocation_area": {"upper_left": {"lat": 9.2, "lon": -1.9},
                                     "lower_right": {"lat": 9.0, "lon": -1.7}},
                "land_use_surfaces_m3": {"green": 300, "water": 100},
                "sites": [{"name": "A", "surface_m3": 1000}]}"#,
        )
        .unwrap();
        let crops = CropCatalog::from_json_str(
            r#"{"food": ["Maize", {"name": "Teff", "space_m2_per_seed": 0.1}], "non-food": ["Cotton"]}"#,
        )
        .unwrap();
        let data = DataStore::from_parts(vec![LabData::new(lab)], crops, StrategyCatalog::default(), None);
        CatalogService::new(Arc::new(data))
    }

    #[test]
    fn test_list_and_detail() {
        let service = service();
        let labs = service.list_labs();
        assert_eq!(labs.len(), 1);
        assert_eq!(labs[0].site_count, 1);

        let detail = service.get_lab("Ghana").unwrap();
        let green = detail
            .land_use_shares
            .iter()
            .find(|row| row.land_use == wefe_shared::LandCover::Green)
            .unwrap();
        assert!((green.share_percent - 75.0).abs() < 1e-9);
        assert!(service.get_lab("Tunisia").is_err());
    }

    #[test]
    fn test_map_falls_back_to_geolocation() {
        let view = service().lab_map("Ghana").unwrap();
        assert_eq!(view.site_count, 0);
        assert!((view.center.lat - 9.1).abs() < 1e-9);
        assert!((view.center.lon + 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_crops_keep_groups() {
        let crops = service().crops();
        let names: Vec<_> = crops.iter().map(|c| c.profile.name.as_str()).collect();
        assert_eq!(names, vec!["Maize", "Teff", "Cotton"]);
        assert_eq!(crops[2].group, CropGroup::NonFood);
        assert!(crops[1].summary_lines.iter().any(|l| l.contains("0.1")));
    }
}
