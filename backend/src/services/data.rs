//! Static data loaded once at startup and shared read-only

use std::path::{Path, PathBuf};

use anyhow::Context;
use wefe_shared::geo::FeatureCollection;
use wefe_shared::{
    land_cover_is_balanced, validate_crop_distribution, ConsumptionTable, CropCatalog, LivingLab,
    ScenarioData, StrategyCatalog,
};

use crate::config::DataConfig;
use crate::error::{AppError, AppResult};

const LAB_FILE: &str = "lab.json";
const RESOURCES_FILE: &str = "lab_resources_info.json";

/// A living lab with its consumption table and site map
#[derive(Debug, Clone)]
pub struct LabData {
    pub lab: LivingLab,
    pub consumption: ConsumptionTable,
    pub site_map: Option<FeatureCollection>,
}

impl LabData {
    pub fn new(lab: LivingLab) -> Self {
        Self {
            lab,
            consumption: ConsumptionTable::default(),
            site_map: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataStore {
    pub labs: Vec<LabData>,
    pub crops: CropCatalog,
    pub strategies: StrategyCatalog,
    pub default_lab: Option<String>,
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

impl DataStore {
    /// Build a store from already-parsed records. The default lab is the
    /// requested one when present, else the first lab with sites, else the
    /// first lab.
    pub fn from_parts(
        labs: Vec<LabData>,
        crops: CropCatalog,
        strategies: StrategyCatalog,
        default_lab: Option<&str>,
    ) -> Self {
        let default_lab = default_lab
            .filter(|name| labs.iter().any(|l| l.lab.name == *name))
            .map(str::to_string)
            .or_else(|| {
                labs.iter()
                    .find(|l| !l.lab.sites.is_empty())
                    .or_else(|| labs.first())
                    .map(|l| l.lab.name.clone())
            });

        Self {
            labs,
            crops,
            strategies,
            default_lab,
        }
    }

    /// Load every data file named in the configuration.
    ///
    /// The lab list, crop catalog and strategy catalog are required. The
    /// site-level lab directory and its GeoJSON are optional.
    pub fn load(config: &DataConfig) -> anyhow::Result<Self> {
        let dir = PathBuf::from(&config.dir);

        let labs_path = dir.join(&config.living_labs_file);
        let mut labs: Vec<LabData> = LivingLab::list_from_json_str(&read(&labs_path)?)
            .with_context(|| format!("Invalid living lab list {}", labs_path.display()))?
            .into_iter()
            .map(LabData::new)
            .collect();

        let crops_path = dir.join(&config.crops_file);
        let crops = CropCatalog::from_json_str(&read(&crops_path)?)
            .with_context(|| format!("Invalid crop catalog {}", crops_path.display()))?;

        let strategies_path = dir.join(&config.strategies_file);
        let strategies = StrategyCatalog::from_json_str(&read(&strategies_path)?)
            .with_context(|| format!("Invalid strategy catalog {}", strategies_path.display()))?;

        let site_map = Self::load_site_map(&dir.join(&config.sites_geojson));
        if let Some(detail) = Self::load_lab_detail(&dir.join(&config.lab_dir), site_map)? {
            match labs.iter_mut().find(|l| l.lab.name == detail.lab.name) {
                Some(existing) => *existing = detail,
                None => labs.push(detail),
            }
        }

        for lab in &labs {
            for site in &lab.lab.sites {
                if !land_cover_is_balanced(site) {
                    tracing::warn!(
                        lab = %lab.lab.name,
                        site = %site.name,
                        total = site.land_cover_total(),
                        "Land cover does not total 100%"
                    );
                }
                if let Err(message) = validate_crop_distribution(site) {
                    tracing::warn!(lab = %lab.lab.name, site = %site.name, "{}", message);
                }
            }
        }

        let store = Self::from_parts(labs, crops, strategies, config.default_lab.as_deref());
        tracing::info!(
            labs = store.labs.len(),
            crops = store.crops.len(),
            strategies = store.strategies.len(),
            default_lab = ?store.default_lab,
            "Static data loaded"
        );
        Ok(store)
    }

    /// Site polygons are display data; a missing or broken file only warns
    fn load_site_map(path: &Path) -> Option<FeatureCollection> {
        let parsed = read(path).and_then(|json| {
            FeatureCollection::from_json_str(&json)
                .with_context(|| format!("Invalid GeoJSON {}", path.display()))
        });
        match parsed {
            Ok(collection) => Some(collection),
            Err(e) => {
                tracing::warn!("Could not load site map: {:#}", e);
                None
            }
        }
    }

    fn load_lab_detail(
        lab_dir: &Path,
        site_map: Option<FeatureCollection>,
    ) -> anyhow::Result<Option<LabData>> {
        let lab_path = lab_dir.join(LAB_FILE);
        if !lab_path.exists() {
            tracing::warn!("No site-level lab data at {}", lab_path.display());
            return Ok(None);
        }
        let mut lab = LivingLab::from_json_str(&read(&lab_path)?)
            .with_context(|| format!("Invalid lab {}", lab_path.display()))?;

        if lab.sites.is_empty() {
            if let Some(collection) = &site_map {
                lab.sites = collection.site_records();
            }
        }

        let resources_path = lab_dir.join(RESOURCES_FILE);
        let consumption = if resources_path.exists() {
            ConsumptionTable::from_resources_json_str(&read(&resources_path)?)
                .with_context(|| format!("Invalid lab resources {}", resources_path.display()))?
        } else {
            tracing::warn!("No consumption data at {}", resources_path.display());
            ConsumptionTable::default()
        };

        Ok(Some(LabData {
            lab,
            consumption,
            site_map,
        }))
    }

    pub fn lab(&self, name: &str) -> AppResult<&LabData> {
        self.labs
            .iter()
            .find(|l| l.lab.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Living lab '{}'", name)))
    }

    /// The named lab, or the default lab when no name is given
    pub fn lab_or_default(&self, name: Option<&str>) -> AppResult<&LabData> {
        match name.or(self.default_lab.as_deref()) {
            Some(name) => self.lab(name),
            None => Err(AppError::NotFound("Living lab".to_string())),
        }
    }

    pub fn scenario_data<'a>(&'a self, lab: &'a LabData) -> ScenarioData<'a> {
        ScenarioData {
            sites: &lab.lab.sites,
            crops: &self.crops,
            consumption: &lab.consumption,
            strategies: &self.strategies,
        }
    }

    pub fn site_count(&self) -> usize {
        self.labs.iter().map(|l| l.lab.sites.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_data() -> DataConfig {
        DataConfig {
            dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../data").to_string(),
            ..DataConfig::default()
        }
    }

    fn lab(json: &str) -> LabData {
        LabData::new(LivingLab::from_json_str(json).unwrap())
    }

    #[test]
    fn test_load_repository_data() {
        let store = DataStore::load(&repo_data()).unwrap();
        assert!(!store.crops.is_empty());
        assert!(!store.strategies.is_empty());

        let lab = store.lab_or_default(None).unwrap();
        assert_eq!(Some(lab.lab.name.as_str()), store.default_lab.as_deref());
        assert!(!lab.lab.sites.is_empty());
        assert!(!lab.consumption.is_empty());
        assert!(lab.site_map.is_some());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let config = DataConfig {
            crops_file: "does-not-exist.json".to_string(),
            ..repo_data()
        };
        let err = DataStore::load(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("does-not-exist.json"));
    }

    #[test]
    fn test_optional_lab_dir() {
        let config = DataConfig {
            lab_dir: "livinglabs/missing".to_string(),
            sites_geojson: "geo/missing.geojson".to_string(),
            ..repo_data()
        };
        let store = DataStore::load(&config).unwrap();
        assert!(store.labs.iter().all(|l| l.site_map.is_none()));
    }

    #[test]
    fn test_default_lab_resolution() {
        let labs = vec![lab(r#"{"name": "A"}"#), lab(r#"{"name": "B", "sites": [{"name": "s"}]}"#)];
        let store = DataStore::from_parts(labs.clone(), CropCatalog::default(), StrategyCatalog::default(), None);
        assert_eq!(store.default_lab.as_deref(), Some("B"));

        let store = DataStore::from_parts(labs.clone(), CropCatalog::default(), StrategyCatalog::default(), Some("A"));
        assert_eq!(store.default_lab.as_deref(), Some("A"));

        let store = DataStore::from_parts(labs, CropCatalog::default(), StrategyCatalog::default(), Some("Z"));
        assert_eq!(store.default_lab.as_deref(), Some("B"));
        assert!(matches!(store.lab("Z"), Err(AppError::NotFound(_))));
    }
}
