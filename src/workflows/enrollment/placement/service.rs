use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::domain::{PlacementId, PlacementStatus, Program};
use super::engine::{PlacementEngine, PlacementOutcome};
use super::intake::{profile_from_submission, PlacementSubmission};
use super::repository::{
    AlertError, AlertPublisher, CoordinatorAlert, PlacementRecord, PlacementRepository,
    RepositoryError,
};

/// Service composing intake, the ranking engine, and the repository.
pub struct PlacementService<R, A> {
    repository: Arc<R>,
    alerts: Arc<A>,
    engine: PlacementEngine,
}

static PLACEMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_placement_id() -> PlacementId {
    let id = PLACEMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PlacementId(format!("plc-{id:06}"))
}

impl<R, A> PlacementService<R, A>
where
    R: PlacementRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>) -> Self {
        Self {
            repository,
            alerts,
            engine: PlacementEngine::new(),
        }
    }

    /// Normalize and store a new submission.
    pub fn submit(
        &self,
        submission: PlacementSubmission,
    ) -> Result<PlacementRecord, PlacementServiceError> {
        let mut profile = profile_from_submission(submission);
        profile.placement_id = next_placement_id();

        let record = PlacementRecord {
            profile,
            status: PlacementStatus::Submitted,
            outcome: None,
            selected_program: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Run the ranking engine for a stored submission and persist the
    /// outcome.
    pub fn recommend(
        &self,
        placement_id: &PlacementId,
    ) -> Result<PlacementOutcome, PlacementServiceError> {
        let mut record = self
            .repository
            .fetch(placement_id)?
            .ok_or(RepositoryError::NotFound)?;

        let outcome = self.engine.evaluate(&record.profile);

        if record.status != PlacementStatus::Placed {
            record.status = PlacementStatus::Recommended;
        }
        record.outcome = Some(outcome.clone());
        self.repository.update(record)?;

        Ok(outcome)
    }

    /// Confirm one of the recommended programs as the applicant's choice and
    /// notify the coordinators.
    pub fn select(
        &self,
        placement_id: &PlacementId,
        program: Program,
    ) -> Result<PlacementRecord, PlacementServiceError> {
        let mut record = self
            .repository
            .fetch(placement_id)?
            .ok_or(RepositoryError::NotFound)?;

        let Some(outcome) = record.outcome.as_ref() else {
            return Err(SelectionError::NotYetRecommended.into());
        };
        let Some(recommendation) = outcome
            .recommendations
            .iter()
            .find(|entry| entry.program == program)
        else {
            return Err(SelectionError::NotRecommended(program).into());
        };
        let score = recommendation.score;

        record.selected_program = Some(program);
        record.status = PlacementStatus::Placed;
        self.repository.update(record.clone())?;

        let mut details = BTreeMap::new();
        details.insert("program".to_string(), program.code().to_string());
        details.insert("score".to_string(), score.to_string());
        self.alerts.publish(CoordinatorAlert {
            template: "placement_selected".to_string(),
            placement_id: placement_id.clone(),
            details,
        })?;

        Ok(record)
    }

    /// Fetch a placement and current status for API responses.
    pub fn get(
        &self,
        placement_id: &PlacementId,
    ) -> Result<PlacementRecord, PlacementServiceError> {
        let record = self
            .repository
            .fetch(placement_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Rejections for the selection step.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("recommendations have not been generated yet")]
    NotYetRecommended,
    #[error("program {0} is not among the recommendations")]
    NotRecommended(Program),
}
