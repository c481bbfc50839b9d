use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::enrollment::placement::intake::{
    profile_from_submission, AcademicAnswers, DemographicAnswers, PlacementSubmission,
    SurveyAnswers,
};
use crate::workflows::enrollment::placement::repository::{
    AlertError, AlertPublisher, CoordinatorAlert, InMemoryPlacementRepository,
};
use crate::workflows::enrollment::placement::{
    placement_router, PlacementEngine, PlacementService, StudentProfile,
};

pub(super) fn academic_all(grade: f32, dost: &str) -> AcademicAnswers {
    AcademicAnswers {
        mathematics: grade,
        araling_panlipunan: grade,
        english: grade,
        edukasyon_sa_pagpapakatao: grade,
        science: grade,
        edukasyon_pangkabuhayan: grade,
        filipino: grade,
        mapeh: grade,
        dost_exam_result: Some(dost.to_string()),
    }
}

pub(super) fn blank_submission() -> PlacementSubmission {
    PlacementSubmission {
        lrn: "100000000000".to_string(),
        ..PlacementSubmission::default()
    }
}

pub(super) fn elite_submission(dost: &str) -> PlacementSubmission {
    PlacementSubmission {
        lrn: "100000000001".to_string(),
        student_name: "Test Applicant".to_string(),
        academic: academic_all(95.0, dost),
        ..PlacementSubmission::default()
    }
}

pub(super) fn working_submission() -> PlacementSubmission {
    PlacementSubmission {
        lrn: "100000000002".to_string(),
        demographics: DemographicAnswers {
            is_working_student: true,
            ..DemographicAnswers::default()
        },
        ..PlacementSubmission::default()
    }
}

pub(super) fn sped_submission() -> PlacementSubmission {
    PlacementSubmission {
        lrn: "100000000003".to_string(),
        survey: SurveyAnswers {
            difficulty_areas: vec!["Social interaction".to_string()],
            ..SurveyAnswers::default()
        },
        demographics: DemographicAnswers {
            is_sped: true,
            ..DemographicAnswers::default()
        },
        ..PlacementSubmission::default()
    }
}

/// Grades averaging exactly 87.00 with strong English/Filipino, plus an
/// explicit SPFL preference.
pub(super) fn language_submission() -> PlacementSubmission {
    PlacementSubmission {
        lrn: "100000000004".to_string(),
        academic: AcademicAnswers {
            mathematics: 85.0,
            araling_panlipunan: 86.0,
            english: 90.0,
            edukasyon_sa_pagpapakatao: 87.0,
            science: 85.0,
            edukasyon_pangkabuhayan: 87.0,
            filipino: 88.0,
            mapeh: 88.0,
            dost_exam_result: None,
        },
        survey: SurveyAnswers {
            interested_program: Some("SPFL".to_string()),
            ..SurveyAnswers::default()
        },
        ..PlacementSubmission::default()
    }
}

/// No grades at all; the questionnaire leans heavily toward STE.
pub(super) fn survey_only_submission() -> PlacementSubmission {
    PlacementSubmission {
        lrn: "100000000005".to_string(),
        survey: SurveyAnswers {
            interested_program: Some("STE".to_string()),
            program_motivation: Some("Very motivated".to_string()),
            enjoyed_subjects: vec!["Math".to_string(), "Science".to_string()],
            study_hours: Some("More than 3 hours".to_string()),
            ..SurveyAnswers::default()
        },
        ..PlacementSubmission::default()
    }
}

pub(super) fn profile_of(submission: PlacementSubmission) -> StudentProfile {
    profile_from_submission(submission)
}

pub(super) fn engine() -> PlacementEngine {
    PlacementEngine::new()
}

pub(super) fn build_service() -> (
    PlacementService<InMemoryPlacementRepository, RecordingAlerts>,
    Arc<InMemoryPlacementRepository>,
    Arc<RecordingAlerts>,
) {
    let repository = Arc::new(InMemoryPlacementRepository::default());
    let alerts = Arc::new(RecordingAlerts::default());
    let service = PlacementService::new(repository.clone(), alerts.clone());
    (service, repository, alerts)
}

pub(super) fn placement_router_with_service(
    service: PlacementService<InMemoryPlacementRepository, RecordingAlerts>,
) -> axum::Router {
    placement_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct RecordingAlerts {
    events: Arc<Mutex<Vec<CoordinatorAlert>>>,
}

impl RecordingAlerts {
    pub(super) fn events(&self) -> Vec<CoordinatorAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for RecordingAlerts {
    fn publish(&self, alert: CoordinatorAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
