use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::domain::{PlacementId, PlacementStatus, Program, StudentProfile};
use super::engine::PlacementOutcome;

/// Repository record containing the profile, ranking outcome, and the
/// applicant's confirmed choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub profile: StudentProfile,
    pub status: PlacementStatus,
    pub outcome: Option<PlacementOutcome>,
    pub selected_program: Option<Program>,
}

impl PlacementRecord {
    pub fn rationale(&self) -> String {
        match &self.outcome {
            Some(outcome) => match outcome.top() {
                Some(top) => format!(
                    "top recommendation {} ({}% match) via {}",
                    top.program,
                    top.score,
                    outcome.rule.label()
                ),
                None => "no eligible program".to_string(),
            },
            None => "pending recommendation".to_string(),
        }
    }

    pub fn status_view(&self) -> PlacementStatusView {
        let top = self
            .outcome
            .as_ref()
            .and_then(|outcome| outcome.top());
        PlacementStatusView {
            placement_id: self.profile.placement_id.clone(),
            lrn: self.profile.lrn.clone(),
            status: self.status.label(),
            rationale: self.rationale(),
            top_program: top.map(|rec| rec.program),
            top_score: top.map(|rec| rec.score),
            selected_program: self.selected_program,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PlacementRepository: Send + Sync {
    fn insert(&self, record: PlacementRecord) -> Result<PlacementRecord, RepositoryError>;
    fn update(&self, record: PlacementRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PlacementId) -> Result<Option<PlacementRecord>, RepositoryError>;
    fn pending(&self, limit: usize) -> Result<Vec<PlacementRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound coordinator notification hooks.
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: CoordinatorAlert) -> Result<(), AlertError>;
}

/// Notification payload surfaced to the coordinator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorAlert {
    pub template: String,
    pub placement_id: PlacementId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a placement's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementStatusView {
    pub placement_id: PlacementId,
    pub lrn: String,
    pub status: &'static str,
    pub rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_program: Option<Program>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_program: Option<Program>,
}

/// Process-local store backing the serve mode; swap in a database-backed
/// implementation through the trait for real deployments.
#[derive(Default, Clone)]
pub struct InMemoryPlacementRepository {
    records: Arc<Mutex<HashMap<PlacementId, PlacementRecord>>>,
}

impl InMemoryPlacementRepository {
    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<PlacementId, PlacementRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("placement store poisoned".to_string()))
    }
}

impl PlacementRepository for InMemoryPlacementRepository {
    fn insert(&self, record: PlacementRecord) -> Result<PlacementRecord, RepositoryError> {
        let mut records = self.guard()?;
        if records.contains_key(&record.profile.placement_id) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(record.profile.placement_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: PlacementRecord) -> Result<(), RepositoryError> {
        let mut records = self.guard()?;
        records.insert(record.profile.placement_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &PlacementId) -> Result<Option<PlacementRecord>, RepositoryError> {
        let records = self.guard()?;
        Ok(records.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<PlacementRecord>, RepositoryError> {
        let records = self.guard()?;
        let mut pending: Vec<PlacementRecord> = records
            .values()
            .filter(|record| record.status == PlacementStatus::Submitted)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.profile.placement_id.0.cmp(&b.profile.placement_id.0));
        pending.truncate(limit);
        Ok(pending)
    }
}

/// Publisher that writes alerts to the service log; stands in for the
/// portal's toast/notification channel when none is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertPublisher;

impl AlertPublisher for LogAlertPublisher {
    fn publish(&self, alert: CoordinatorAlert) -> Result<(), AlertError> {
        tracing::info!(
            template = %alert.template,
            placement_id = %alert.placement_id.0,
            "coordinator alert"
        );
        Ok(())
    }
}
