//! Land-use intervention strategies and their applications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::de;
use crate::error::{EstimateError, EstimateResult};

/// Scope label for "apply to all sites"
pub const ALL_SITES: &str = "ALL";

/// Upper bounds of the assumption form fields
pub const MAX_WATER_GAIN_L_PER_M2: f64 = 200.0;
pub const MAX_ENERGY_SAVED_KWH_PER_M3: f64 = 5.0;
pub const MAX_CARBON_SEQ_KGCO2E_PER_M2: f64 = 20.0;

/// Establishment and full-benefit horizons of a strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeHorizon {
    #[serde(default, deserialize_with = "de::finite_number")]
    pub establishment: Option<f64>,
    #[serde(default, deserialize_with = "de::finite_number")]
    pub full_benefit: Option<f64>,
}

/// Static definition of an agroforestry strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyDefinition {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Land-cover categories the strategy acts on
    #[serde(default)]
    pub affected_land_types: Vec<String>,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub cost_per_sqm_usd: f64,
    #[serde(default)]
    pub impacted_indicators: Vec<String>,
    #[serde(default)]
    pub maintenance_intensity: Option<String>,
    #[serde(default)]
    pub expected_co_benefits: Vec<String>,
    #[serde(default)]
    pub data_assumptions: Option<String>,
    #[serde(default)]
    pub time_horizon_years: Option<TimeHorizon>,
}

impl StrategyDefinition {
    /// Name shown in the strategy picker, falling back to the key
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }

    pub fn unit_cost_usd(&self) -> f64 {
        self.cost_per_sqm_usd.max(0.0)
    }
}

/// All strategies offered by the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StrategyCatalog {
    #[serde(default)]
    pub strategies: Vec<StrategyDefinition>,
}

impl StrategyCatalog {
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn by_key(&self, key: &str) -> Option<&StrategyDefinition> {
        self.strategies.iter().find(|s| s.key == key)
    }

    pub fn by_name(&self, name: &str) -> Option<&StrategyDefinition> {
        self.strategies.iter().find(|s| s.display_name() == name)
    }

    /// Look up by key, then by display name
    pub fn find(&self, key_or_name: &str) -> EstimateResult<&StrategyDefinition> {
        self.by_key(key_or_name)
            .or_else(|| self.by_name(key_or_name))
            .ok_or_else(|| EstimateError::UnknownStrategy {
                key: key_or_name.to_string(),
            })
    }

    pub fn first(&self) -> Option<&StrategyDefinition> {
        self.strategies.first()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Sites a strategy application acts on
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    #[default]
    All,
    Site(String),
}

impl Scope {
    pub fn site(name: impl Into<String>) -> Self {
        Scope::Site(name.into())
    }

    pub fn includes(&self, site_name: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Site(name) => name == site_name,
        }
    }

    /// Human label: "all sites" or the site name
    pub fn label(&self) -> &str {
        match self {
            Scope::All => "all sites",
            Scope::Site(name) => name,
        }
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            Scope::All
        } else {
            Scope::Site(value)
        }
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Scope::from(value.to_string())
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => ALL_SITES.to_string(),
            Scope::Site(name) => name,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::All => write!(f, "{}", ALL_SITES),
            Scope::Site(name) => write!(f, "{}", name),
        }
    }
}

/// Per-application coefficients of the impact estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpactAssumptions {
    /// Water saved or infiltrated, litres per m² per year
    pub water_gain_l_per_m2: f64,
    /// Energy saved per cubic metre of water, kWh
    pub energy_saved_kwh_per_m3: f64,
    /// Carbon sequestered, kg CO₂e per m² per year
    pub carbon_seq_kgco2e_per_m2: f64,
    /// Crop productivity increase, may exceed 100
    pub productivity_increase_percent: f64,
}

impl Default for ImpactAssumptions {
    fn default() -> Self {
        Self {
            water_gain_l_per_m2: 20.0,
            energy_saved_kwh_per_m3: 0.2,
            carbon_seq_kgco2e_per_m2: 0.5,
            productivity_increase_percent: 0.0,
        }
    }
}

impl ImpactAssumptions {
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("water_gain_l_per_m2", self.water_gain_l_per_m2),
            ("energy_saved_kwh_per_m3", self.energy_saved_kwh_per_m3),
            ("carbon_seq_kgco2e_per_m2", self.carbon_seq_kgco2e_per_m2),
            (
                "productivity_increase_percent",
                self.productivity_increase_percent,
            ),
        ]
    }

    /// Reject negative and non-finite coefficients
    pub fn validate(&self) -> EstimateResult<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimateError::InvalidAssumption { field, value });
            }
        }
        Ok(())
    }

    /// Yield multiplier `1 + increase/100`
    pub fn productivity_multiplier(&self) -> f64 {
        1.0 + self.productivity_increase_percent.max(0.0) / 100.0
    }
}

/// A strategy applied by the user, frozen at the moment of application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyApplication {
    pub id: Uuid,
    pub strategy_key: String,
    pub strategy_name: String,
    pub scope: Scope,
    pub affected_land_types: Vec<String>,
    pub unit_cost_usd: f64,
    pub assumptions: ImpactAssumptions,
    pub applied_at: DateTime<Utc>,
}

impl StrategyApplication {
    /// Snapshot the strategy's land types and unit cost together with the
    /// chosen scope and assumptions
    pub fn snapshot(
        strategy: &StrategyDefinition,
        scope: Scope,
        assumptions: ImpactAssumptions,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            strategy_key: strategy.key.clone(),
            strategy_name: strategy.display_name().to_string(),
            scope,
            affected_land_types: strategy.affected_land_types.clone(),
            unit_cost_usd: strategy.unit_cost_usd(),
            assumptions,
            applied_at: Utc::now(),
        }
    }
}
