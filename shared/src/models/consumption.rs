//! Annual consumption requirements per crop

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::de;
use crate::error::EstimateResult;

/// Lab resource files record consumption in tonnes per year
pub const KG_PER_TONNE: f64 = 1000.0;

/// Annual consumption requirement of one crop, in kilograms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionRecord {
    pub name: String,
    pub annual_consumption_kg: f64,
}

/// Raw lab resources document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabResources {
    #[serde(default)]
    pub food: Vec<ResourceEntry>,
}

/// Food entry of the lab resources document
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceEntry {
    #[serde(default)]
    pub name: Option<String>,
    /// Tonnes per year
    #[serde(default, deserialize_with = "de::finite_number")]
    pub annual_consumption: Option<f64>,
}

/// Crop name → annual consumption in kilograms
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ConsumptionTable {
    by_crop: BTreeMap<String, f64>,
}

impl ConsumptionTable {
    /// Build the table from a lab resources document, converting tonnes to
    /// kilograms. Entries without a name or a numeric consumption are skipped.
    pub fn from_resources(resources: &LabResources) -> Self {
        let mut table = Self::default();
        for entry in &resources.food {
            if let (Some(name), Some(tonnes)) = (&entry.name, entry.annual_consumption) {
                table.insert(name.clone(), tonnes * KG_PER_TONNE);
            }
        }
        table
    }

    pub fn from_resources_json_str(json: &str) -> EstimateResult<Self> {
        let resources: LabResources = serde_json::from_str(json)?;
        Ok(Self::from_resources(&resources))
    }

    pub fn insert(&mut self, crop: impl Into<String>, annual_consumption_kg: f64) {
        self.by_crop.insert(crop.into(), annual_consumption_kg);
    }

    pub fn annual_kg(&self, crop: &str) -> Option<f64> {
        self.by_crop.get(crop).copied()
    }

    pub fn records(&self) -> impl Iterator<Item = ConsumptionRecord> + '_ {
        self.by_crop.iter().map(|(name, kg)| ConsumptionRecord {
            name: name.clone(),
            annual_consumption_kg: *kg,
        })
    }

    pub fn len(&self) -> usize {
        self.by_crop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_crop.is_empty()
    }
}

impl FromIterator<ConsumptionRecord> for ConsumptionTable {
    fn from_iter<I: IntoIterator<Item = ConsumptionRecord>>(iter: I) -> Self {
        let mut table = Self::default();
        for record in iter {
            table.insert(record.name, record.annual_consumption_kg);
        }
        table
    }
}
