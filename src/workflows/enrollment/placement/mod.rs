//! Program placement intake, ranking, and selection for enrollment applicants.
//!
//! The ranking core is a pure function of an applicant profile: intake turns
//! raw form answers into a typed [`StudentProfile`], the engine ranks the
//! section programs for it, and the service persists the outcome and the
//! applicant's confirmed choice.

pub mod catalog;
pub mod domain;
pub(crate) mod engine;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{definition, ProgramDefinition, PROGRAM_CATALOG};
pub use domain::{
    AbsenceBand, AcademicRecord, Activity, AssignmentsOnTime, Demographics, DeviceAvailability,
    DifficultLessonsResponse, DifficultyArea, DistanceBand, DostExamResult, InternetAccess,
    LearningStyle, Motivation, PlacementId, PlacementStatus, Program, StudentProfile, Subject,
    SupportRequest, SurveyResponse, TravelDifficulty,
};
pub use engine::{PlacementEngine, PlacementOutcome, PlacementRule, ProgramRecommendation};
pub use intake::{profile_from_submission, AcademicAnswers, DemographicAnswers, PlacementSubmission, SurveyAnswers};
pub use repository::{
    AlertError, AlertPublisher, CoordinatorAlert, InMemoryPlacementRepository, LogAlertPublisher,
    PlacementRecord, PlacementRepository, PlacementStatusView, RepositoryError,
};
pub use router::placement_router;
pub use service::{PlacementService, PlacementServiceError, SelectionError};
