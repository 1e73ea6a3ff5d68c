//! Configuration management for the WEFE dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WEFE__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use wefe_shared::{validate_assumption_bounds, ImpactAssumptions};

/// Longest accepted idle timeout, ten years
const MAX_IDLE_TTL_SECS: u64 = 315_360_000;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Static data files
    pub data: DataConfig,

    /// Log output
    pub logging: LoggingConfig,

    /// Starting values of new sessions' strategy drafts
    pub assumptions: AssumptionsConfig,

    /// Limits of the in-memory session store
    pub sessions: SessionsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Root of the data directory; other paths are relative to it
    pub dir: String,

    pub living_labs_file: String,

    pub crops_file: String,

    pub strategies_file: String,

    /// Directory holding `lab.json` and `lab_resources_info.json` of the
    /// lab with site-level data
    pub lab_dir: String,

    /// GeoJSON with the site and boundary polygons of that lab
    pub sites_geojson: String,

    /// Lab used when a session is created without one
    #[serde(default)]
    pub default_lab: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssumptionsConfig {
    pub water_gain_l_per_m2: f64,
    pub energy_saved_kwh_per_m3: f64,
    pub carbon_seq_kgco2e_per_m2: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SessionsConfig {
    /// Live sessions kept at most; the least recently used is evicted first
    pub max: usize,

    /// Seconds without a request after which a session expires
    pub idle_ttl_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WEFE_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let data = DataConfig::default();
        let assumptions = AssumptionsConfig::default();
        let sessions = SessionsConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data.dir", data.dir)?
            .set_default("data.living_labs_file", data.living_labs_file)?
            .set_default("data.crops_file", data.crops_file)?
            .set_default("data.strategies_file", data.strategies_file)?
            .set_default("data.lab_dir", data.lab_dir)?
            .set_default("data.sites_geojson", data.sites_geojson)?
            .set_default("logging.json", false)?
            .set_default("assumptions.water_gain_l_per_m2", assumptions.water_gain_l_per_m2)?
            .set_default("assumptions.energy_saved_kwh_per_m3", assumptions.energy_saved_kwh_per_m3)?
            .set_default("assumptions.carbon_seq_kgco2e_per_m2", assumptions.carbon_seq_kgco2e_per_m2)?
            .set_default("sessions.max", sessions.max as i64)?
            .set_default("sessions.idle_ttl_secs", sessions.idle_ttl_secs as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WEFE__ prefix)
            .add_source(
                Environment::with_prefix("WEFE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break every session at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_assumption_bounds(&self.assumptions.to_assumptions())
            .map_err(|m| ConfigError::Message(format!("assumptions: {}", m)))?;
        if self.sessions.max == 0 {
            return Err(ConfigError::Message("sessions.max must be at least 1".to_string()));
        }
        if self.sessions.idle_ttl_secs == 0 || self.sessions.idle_ttl_secs > MAX_IDLE_TTL_SECS {
            return Err(ConfigError::Message(format!(
                "sessions.idle_ttl_secs must be between 1 and {}",
                MAX_IDLE_TTL_SECS
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            living_labs_file: "livinglab.json".to_string(),
            crops_file: "crops.json".to_string(),
            strategies_file: "agroforestry_strategies.json".to_string(),
            lab_dir: "livinglabs/ghana_damango".to_string(),
            sites_geojson: "geo/damongo_sites.geojson".to_string(),
            default_lab: None,
        }
    }
}

impl Default for AssumptionsConfig {
    fn default() -> Self {
        let defaults = ImpactAssumptions::default();
        Self {
            water_gain_l_per_m2: defaults.water_gain_l_per_m2,
            energy_saved_kwh_per_m3: defaults.energy_saved_kwh_per_m3,
            carbon_seq_kgco2e_per_m2: defaults.carbon_seq_kgco2e_per_m2,
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max: 1000,
            idle_ttl_secs: 4 * 60 * 60,
        }
    }
}

impl SessionsConfig {
    pub fn idle_ttl(&self) -> chrono::Duration {
        let secs = self.idle_ttl_secs.min(MAX_IDLE_TTL_SECS) as i64;
        chrono::Duration::seconds(secs)
    }
}

impl AssumptionsConfig {
    /// Draft assumptions for a new session; productivity starts at 0%
    pub fn to_assumptions(&self) -> ImpactAssumptions {
        ImpactAssumptions {
            water_gain_l_per_m2: self.water_gain_l_per_m2,
            energy_saved_kwh_per_m3: self.energy_saved_kwh_per_m3,
            carbon_seq_kgco2e_per_m2: self.carbon_seq_kgco2e_per_m2,
            productivity_increase_percent: 0.0,
        }
    }
}
