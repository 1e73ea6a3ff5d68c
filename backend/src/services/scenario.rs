//! Scenario sessions: one `ScenarioSession` per dashboard user

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;
use wefe_shared::{
    resolve_scope, validate_assumption_bounds, validate_energy_shares, validate_name,
    validate_water_shares, EnergySourceShares, ImpactAssumptions, ScenarioPreview, ScenarioSession,
    ScenarioSummary, Scope, ShareWarning, StrategyApplication, StrategyDraft, WaterSourceShares,
    WorkflowState,
};

use super::data::{DataStore, LabData};
use crate::config::SessionsConfig;
use crate::error::{AppError, AppResult};

/// A live session and the time of its last request
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session: ScenarioSession,
    pub last_seen: DateTime<Utc>,
}

/// Live sessions keyed by id. The lock only isolates sessions from each other.
pub type SessionStore = Arc<RwLock<HashMap<Uuid, SessionEntry>>>;

#[derive(Clone)]
pub struct ScenarioService {
    data: Arc<DataStore>,
    sessions: SessionStore,
    default_assumptions: ImpactAssumptions,
    limits: SessionsConfig,
}

/// Input for creating a session
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionInput {
    pub lab: Option<String>,
    /// Crops enabled from the start
    #[serde(default)]
    pub crops: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CropToggleInput {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCropsInput {
    pub crops: Vec<CropToggleInput>,
}

#[derive(Debug, Serialize)]
pub struct CropSelectionResponse {
    pub selected_crops: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSourcesInput {
    pub water: Option<WaterSourceShares>,
    pub energy: Option<EnergySourceShares>,
}

#[derive(Debug, Serialize)]
pub struct WarningView {
    #[serde(flatten)]
    pub warning: ShareWarning,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub water: WaterSourceShares,
    pub energy: EnergySourceShares,
    pub warnings: Vec<WarningView>,
}

/// Partial draft update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDraftInput {
    pub strategy: Option<String>,
    pub scope: Option<Scope>,
    pub assumptions: Option<ImpactAssumptions>,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: StrategyDraft,
    pub state: WorkflowState,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub application: StrategyApplication,
    pub draft: StrategyDraft,
    pub state: WorkflowState,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {}", id))
}

impl ScenarioService {
    pub fn new(
        data: Arc<DataStore>,
        sessions: SessionStore,
        default_assumptions: ImpactAssumptions,
        limits: SessionsConfig,
    ) -> Self {
        Self {
            data,
            sessions,
            default_assumptions,
            limits,
        }
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now - entry.last_seen > self.limits.idle_ttl()
    }

    /// Drop expired sessions, then the least recently used ones until there
    /// is room for one more
    fn evict(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        while sessions.len() >= self.limits.max {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Idle sessions evicted");
        }
    }

    async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&ScenarioSession, &LabData) -> AppResult<R>,
    ) -> AppResult<R> {
        self.with_session_mut(id, |session, lab| f(session, lab)).await
    }

    /// Run `f` on a live session and mark it as seen. An expired session is
    /// dropped and reported as not found.
    async fn with_session_mut<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ScenarioSession, &LabData) -> AppResult<R>,
    ) -> AppResult<R> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let expired = match sessions.get(&id) {
            Some(entry) => self.is_expired(entry, now),
            None => return Err(session_not_found(id)),
        };
        if expired {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Session expired");
            return Err(session_not_found(id));
        }

        let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        entry.last_seen = now;
        let lab = self.data.lab_or_default(entry.session.lab.as_deref())?;
        f(&mut entry.session, lab)
    }

    fn check_crop(&self, name: &str) -> AppResult<()> {
        match self.data.crops.get(name) {
            Some(_) => Ok(()),
            None => Err(AppError::Validation {
                field: "crops".to_string(),
                message: format!("Unknown crop '{}'", name),
            }),
        }
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Start a session on a lab, with the first strategy of the catalog
    /// preselected
    pub async fn create_session(&self, input: CreateSessionInput) -> AppResult<ScenarioSession> {
        if let Some(name) = &input.lab {
            validate_name(name).map_err(|m| AppError::validation("lab", m))?;
        }
        let lab = self.data.lab_or_default(input.lab.as_deref())?;

        let mut session = ScenarioSession::new(Some(lab.lab.name.clone()), self.default_assumptions);
        if let Some(first) = self.data.strategies.first() {
            session.select_strategy(&self.data.strategies, &first.key)?;
        }
        for crop in &input.crops {
            self.check_crop(crop)?;
            session.set_crop_enabled(crop, true);
        }

        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        sessions.insert(
            session.id,
            SessionEntry {
                session: session.clone(),
                last_seen: now,
            },
        );
        tracing::info!(session_id = %session.id, lab = %lab.lab.name, "Session created");
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> AppResult<ScenarioSession> {
        self.with_session(id, |session, _| Ok(session.clone())).await
    }

    pub async fn delete_session(&self, id: Uuid) -> AppResult<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Session ended");
                Ok(())
            }
            None => Err(session_not_found(id)),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    // ========================================================================
    // Crops and sources
    // ========================================================================

    pub async fn set_crops(&self, id: Uuid, input: UpdateCropsInput) -> AppResult<CropSelectionResponse> {
        for toggle in &input.crops {
            self.check_crop(&toggle.name)?;
        }
        self.with_session_mut(id, |session, _| {
            for toggle in &input.crops {
                session.set_crop_enabled(&toggle.name, toggle.enabled);
            }
            Ok(CropSelectionResponse {
                selected_crops: session.selected_crops().into_iter().map(str::to_string).collect(),
            })
        })
        .await
    }

    /// Store the source mixes. Totals other than 100% come back as warnings.
    pub async fn set_sources(&self, id: Uuid, input: UpdateSourcesInput) -> AppResult<SourcesResponse> {
        if let Some(water) = &input.water {
            validate_water_shares(water).map_err(|m| AppError::validation("water", m))?;
        }
        if let Some(energy) = &input.energy {
            validate_energy_shares(energy).map_err(|m| AppError::validation("energy", m))?;
        }

        self.with_session_mut(id, |session, _| {
            if let Some(water) = input.water {
                session.set_water_shares(water);
            }
            if let Some(energy) = input.energy {
                session.set_energy_shares(energy);
            }
            let warnings: Vec<WarningView> = [session.water_shares.warning(), session.energy_shares.warning()]
                .into_iter()
                .flatten()
                .map(|warning| WarningView {
                    message: warning.to_string(),
                    warning,
                })
                .collect();
            for w in &warnings {
                tracing::warn!(session_id = %id, total = w.warning.total(), "{}", w.message);
            }
            Ok(SourcesResponse {
                water: session.water_shares,
                energy: session.energy_shares,
                warnings,
            })
        })
        .await
    }

    // ========================================================================
    // Strategy workflow
    // ========================================================================

    /// Update the draft. Every field is checked before any is applied.
    pub async fn update_draft(&self, id: Uuid, input: UpdateDraftInput) -> AppResult<DraftResponse> {
        if let Some(assumptions) = &input.assumptions {
            validate_assumption_bounds(assumptions).map_err(|m| AppError::validation("assumptions", m))?;
        }
        let strategies = &self.data.strategies;
        if let Some(key) = &input.strategy {
            strategies.find(key)?;
        }

        self.with_session_mut(id, |session, lab| {
            if let Some(scope) = &input.scope {
                resolve_scope(&lab.lab.sites, scope)?;
            }
            if let Some(key) = &input.strategy {
                session.select_strategy(strategies, key)?;
            }
            if let Some(scope) = input.scope {
                session.set_scope(scope);
            }
            if let Some(assumptions) = input.assumptions {
                session.set_assumptions(assumptions)?;
            }
            tracing::debug!(
                session_id = %id,
                strategy = ?session.draft.strategy_key,
                scope = %session.draft.scope,
                "Draft updated"
            );
            Ok(DraftResponse {
                draft: session.draft.clone(),
                state: session.state,
            })
        })
        .await
    }

    pub async fn preview(&self, id: Uuid) -> AppResult<ScenarioPreview> {
        self.with_session(id, |session, lab| {
            let preview = session.preview(&self.data.scenario_data(lab))?;
            tracing::debug!(
                session_id = %id,
                strategy = %preview.strategy_key,
                scope = %preview.scope,
                affected_m2 = preview.impact.affected_m2,
                "Preview computed"
            );
            Ok(preview)
        })
        .await
    }

    pub async fn apply(&self, id: Uuid) -> AppResult<ApplyResponse> {
        self.with_session_mut(id, |session, lab| {
            let application = session.apply(&self.data.scenario_data(lab))?.clone();
            tracing::info!(
                session_id = %id,
                strategy = %application.strategy_key,
                scope = %application.scope,
                applications = session.applications().len(),
                "Strategy applied"
            );
            Ok(ApplyResponse {
                application,
                draft: session.draft.clone(),
                state: session.state,
            })
        })
        .await
    }

    pub async fn remove_application(&self, id: Uuid, index: usize) -> AppResult<StrategyApplication> {
        self.with_session_mut(id, |session, _| {
            let removed = session.remove(index)?;
            tracing::info!(
                session_id = %id,
                strategy = %removed.strategy_key,
                index,
                "Strategy removed"
            );
            Ok(removed)
        })
        .await
    }

    pub async fn summary(&self, id: Uuid) -> AppResult<ScenarioSummary> {
        self.with_session(id, |session, lab| Ok(session.summary(&self.data.scenario_data(lab))))
            .await
    }
}
