use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use enroll_ai::workflows::enrollment::placement::{
    profile_from_submission, AcademicAnswers, AlertError, AlertPublisher, CoordinatorAlert,
    DemographicAnswers, InMemoryPlacementRepository, PlacementEngine, PlacementService,
    PlacementStatus, PlacementSubmission, Program, SurveyAnswers,
};
use enroll_ai::workflows::masterlist::{placement_report, MasterlistImporter};

#[derive(Default, Clone)]
struct CapturedAlerts {
    events: Arc<Mutex<Vec<CoordinatorAlert>>>,
}

impl CapturedAlerts {
    fn events(&self) -> Vec<CoordinatorAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for CapturedAlerts {
    fn publish(&self, alert: CoordinatorAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

fn elite_submission() -> PlacementSubmission {
    PlacementSubmission {
        lrn: "300000000001".to_string(),
        student_name: "Sample Applicant".to_string(),
        academic: AcademicAnswers {
            mathematics: 95.0,
            araling_panlipunan: 95.0,
            english: 95.0,
            edukasyon_sa_pagpapakatao: 95.0,
            science: 95.0,
            edukasyon_pangkabuhayan: 95.0,
            filipino: 95.0,
            mapeh: 95.0,
            dost_exam_result: Some("passed".to_string()),
        },
        survey: SurveyAnswers::default(),
        demographics: DemographicAnswers::default(),
        ..PlacementSubmission::default()
    }
}

#[test]
fn full_placement_lifecycle_places_the_applicant() {
    let repository = Arc::new(InMemoryPlacementRepository::default());
    let alerts = Arc::new(CapturedAlerts::default());
    let service = PlacementService::new(repository, alerts.clone());

    let record = service
        .submit(elite_submission())
        .expect("submission succeeds");
    assert_eq!(record.status, PlacementStatus::Submitted);

    let outcome = service
        .recommend(&record.profile.placement_id)
        .expect("recommendation succeeds");
    assert_eq!(outcome.recommendations[0].program, Program::Ste);
    assert_eq!(outcome.recommendations[0].score, 99);

    let placed = service
        .select(&record.profile.placement_id, Program::Ste)
        .expect("selection succeeds");
    assert_eq!(placed.status, PlacementStatus::Placed);
    assert_eq!(placed.selected_program, Some(Program::Ste));

    let events = alerts.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "placement_selected");

    let mut expected_details = BTreeMap::new();
    expected_details.insert("program".to_string(), "STE".to_string());
    expected_details.insert("score".to_string(), "99".to_string());
    assert_eq!(events[0].details, expected_details);
}

#[test]
fn engine_is_deterministic_across_calls() {
    let profile = profile_from_submission(elite_submission());
    let engine = PlacementEngine::new();

    let first = engine.rank(&profile);
    let second = engine.rank(&profile);

    assert_eq!(first, second);
    assert!(first
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));
    assert!(first
        .iter()
        .all(|rec| (60..=100).contains(&rec.score) && !rec.reasons.is_empty()));
}

#[test]
fn masterlist_import_feeds_the_batch_report() {
    let csv = "\
LRN,Student Name,Mathematics,Araling Panlipunan,English,Edukasyon sa Pagpapakatao,Science,Edukasyon sa Pangkabuhayan,Filipino,MAPEH,DOST Exam,SPED,PWD,Working Student,Interested Program
300000000010,A,95,95,95,95,95,95,95,95,passed,No,No,No,STE
300000000011,B,70,72,71,70,73,74,70,75,not_taken,No,No,Yes,
300000000012,C,not a grade,,,,,,,,,,,,
,skipped row without lrn,,,,,,,,,,,,,
";

    let submissions = MasterlistImporter::from_reader(csv.as_bytes())
        .expect("masterlist parses");
    assert_eq!(submissions.len(), 3);

    let generated_on = NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date");
    let report = placement_report(submissions, generated_on);

    assert_eq!(report.generated_on, generated_on);
    assert_eq!(report.total_students, 3);

    let tally = |program: Program| {
        report
            .program_tallies
            .iter()
            .find(|entry| entry.program == program)
            .map(|entry| entry.top_recommendations)
    };
    assert_eq!(tally(Program::Ste), Some(1));
    assert_eq!(tally(Program::Ohsp), Some(1));
    // The gradeless row falls to the general placement bucket.
    assert_eq!(tally(Program::Regular), Some(1));

    assert_eq!(report.entries.len(), 3);
    assert!(report.entries.iter().any(|entry| {
        entry.lrn == "300000000010" && entry.program == Program::Ste && entry.score == 99
    }));
}
