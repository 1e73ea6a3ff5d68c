//! Scenario session: crop selection, source mixes, the strategy draft and the
//! list of applied strategies for one dashboard user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EstimateError, EstimateResult};
use crate::estimate::{
    aggregate, aggregate_production, crop_area_map, effective_productivity_multiplier,
    evaluate_per_site, production_rows, ProductionRow, SiteImpact,
};
use crate::models::{
    ConsumptionTable, CropCatalog, EnergySourceShares, ImpactAssumptions, ImpactMetrics, Scope,
    ShareWarning, SiteRecord, StrategyApplication, StrategyCatalog, StrategyDefinition,
    WaterSourceShares,
};

/// Read-only inputs a session computes against
#[derive(Debug, Clone, Copy)]
pub struct ScenarioData<'a> {
    pub sites: &'a [SiteRecord],
    pub crops: &'a CropCatalog,
    pub consumption: &'a ConsumptionTable,
    pub strategies: &'a StrategyCatalog,
}

/// Strategy being configured, not yet applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StrategyDraft {
    pub strategy_key: Option<String>,
    pub scope: Scope,
    pub assumptions: ImpactAssumptions,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    /// Configuring the draft and previewing its metrics
    #[default]
    Browsing,
    /// The draft was just applied and reset; left on the next draft edit
    Applied { id: Uuid },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropToggle {
    pub name: String,
    pub enabled: bool,
}

/// Metrics of the draft before it is applied
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioPreview {
    pub strategy_key: String,
    pub scope: Scope,
    pub impact: ImpactMetrics,
    pub per_site: Vec<SiteImpact>,
    pub production: Vec<ProductionRow>,
}

/// Cumulative figures over every applied strategy
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioSummary {
    pub applications: Vec<StrategyApplication>,
    pub impact: ImpactMetrics,
    pub effective_multiplier: f64,
    pub production: Vec<ProductionRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub lab: Option<String>,
    pub crops: Vec<CropToggle>,
    pub water_shares: WaterSourceShares,
    pub energy_shares: EnergySourceShares,
    pub draft: StrategyDraft,
    pub default_assumptions: ImpactAssumptions,
    applications: Vec<StrategyApplication>,
    pub state: WorkflowState,
}

impl ScenarioSession {
    /// New session whose drafts start from `default_assumptions`
    pub fn new(lab: Option<String>, default_assumptions: ImpactAssumptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            lab,
            crops: Vec::new(),
            water_shares: WaterSourceShares::default(),
            energy_shares: EnergySourceShares::default(),
            draft: StrategyDraft {
                assumptions: default_assumptions,
                ..Default::default()
            },
            default_assumptions,
            applications: Vec::new(),
            state: WorkflowState::Browsing,
        }
    }

    // ========================================================================
    // Draft
    // ========================================================================

    /// Pick the draft's strategy by key or display name
    pub fn select_strategy(&mut self, strategies: &StrategyCatalog, key: &str) -> EstimateResult<()> {
        let strategy = strategies.find(key)?;
        self.draft.strategy_key = Some(strategy.key.clone());
        self.state = WorkflowState::Browsing;
        Ok(())
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.draft.scope = scope;
        self.state = WorkflowState::Browsing;
    }

    pub fn set_assumptions(&mut self, assumptions: ImpactAssumptions) -> EstimateResult<()> {
        assumptions.validate()?;
        self.draft.assumptions = assumptions;
        self.state = WorkflowState::Browsing;
        Ok(())
    }

    fn draft_strategy<'a>(&self, strategies: &'a StrategyCatalog) -> EstimateResult<&'a StrategyDefinition> {
        let key = self.draft.strategy_key.as_deref().unwrap_or_default();
        strategies.find(key)
    }

    // ========================================================================
    // Crops and source mixes
    // ========================================================================

    /// Enable or disable a crop; unseen crops are appended in call order
    pub fn set_crop_enabled(&mut self, name: &str, enabled: bool) {
        match self.crops.iter_mut().find(|toggle| toggle.name == name) {
            Some(toggle) => toggle.enabled = enabled,
            None => self.crops.push(CropToggle {
                name: name.to_string(),
                enabled,
            }),
        }
    }

    pub fn selected_crops(&self) -> Vec<&str> {
        self.crops
            .iter()
            .filter(|toggle| toggle.enabled)
            .map(|toggle| toggle.name.as_str())
            .collect()
    }

    pub fn set_water_shares(&mut self, shares: WaterSourceShares) -> Option<ShareWarning> {
        self.water_shares = shares;
        shares.warning()
    }

    pub fn set_energy_shares(&mut self, shares: EnergySourceShares) -> Option<ShareWarning> {
        self.energy_shares = shares;
        shares.warning()
    }

    // ========================================================================
    // Applications
    // ========================================================================

    /// Metrics of the current draft. Production uses the draft's own
    /// productivity increase over the draft's scope.
    pub fn preview(&self, data: &ScenarioData<'_>) -> EstimateResult<ScenarioPreview> {
        let strategy = self.draft_strategy(data.strategies)?;
        let assumptions = &self.draft.assumptions;
        let per_site = evaluate_per_site(
            data.sites,
            &self.draft.scope,
            &strategy.affected_land_types,
            strategy.unit_cost_usd(),
            assumptions,
        );
        let impact = per_site.iter().map(|row| row.metrics).sum();
        let areas = crop_area_map(data.sites, &self.draft.scope);
        let production = production_rows(
            &self.selected_crops(),
            data.crops,
            &areas,
            data.consumption,
            assumptions.productivity_multiplier(),
        );

        Ok(ScenarioPreview {
            strategy_key: strategy.key.clone(),
            scope: self.draft.scope.clone(),
            impact,
            per_site,
            production,
        })
    }

    /// Freeze the draft into a new application, then reset the draft's
    /// scope and assumptions. The strategy selection is kept.
    pub fn apply(&mut self, data: &ScenarioData<'_>) -> EstimateResult<&StrategyApplication> {
        let strategy = self.draft_strategy(data.strategies)?;
        self.draft.assumptions.validate()?;

        let application =
            StrategyApplication::snapshot(strategy, self.draft.scope.clone(), self.draft.assumptions);
        self.state = WorkflowState::Applied { id: application.id };
        self.draft.scope = Scope::All;
        self.draft.assumptions = self.default_assumptions;
        self.applications.push(application);

        let index = self.applications.len() - 1;
        Ok(&self.applications[index])
    }

    /// Remove the application at `index`; later ones shift down
    pub fn remove(&mut self, index: usize) -> EstimateResult<StrategyApplication> {
        let len = self.applications.len();
        if index >= len {
            return Err(EstimateError::ApplicationIndex { index, len });
        }
        Ok(self.applications.remove(index))
    }

    pub fn applications(&self) -> &[StrategyApplication] {
        &self.applications
    }

    /// Aggregate impact and compounded production over all sites
    pub fn summary(&self, data: &ScenarioData<'_>) -> ScenarioSummary {
        ScenarioSummary {
            applications: self.applications.clone(),
            impact: aggregate(&self.applications, data.sites),
            effective_multiplier: effective_productivity_multiplier(&self.applications),
            production: aggregate_production(
                &self.applications,
                &self.selected_crops(),
                data.sites,
                data.crops,
                data.consumption,
            ),
        }
    }
}
