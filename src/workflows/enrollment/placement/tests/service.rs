use super::common::*;
use crate::workflows::enrollment::placement::domain::{PlacementId, PlacementStatus, Program};
use crate::workflows::enrollment::placement::repository::{
    PlacementRepository, RepositoryError,
};
use crate::workflows::enrollment::placement::{PlacementServiceError, SelectionError};

#[test]
fn submit_stores_a_pending_record() {
    let (service, repository, alerts) = build_service();

    let record = service
        .submit(elite_submission("passed"))
        .expect("submission succeeds");

    assert!(record.profile.placement_id.0.starts_with("plc-"));
    assert_eq!(record.status, PlacementStatus::Submitted);
    assert!(record.outcome.is_none());

    let stored = repository
        .fetch(&record.profile.placement_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.profile.lrn, record.profile.lrn);
    assert!(alerts.events().is_empty());
}

#[test]
fn recommend_persists_the_outcome() {
    let (service, repository, _) = build_service();
    let record = service
        .submit(elite_submission("passed"))
        .expect("submission succeeds");

    let outcome = service
        .recommend(&record.profile.placement_id)
        .expect("recommendation succeeds");

    assert_eq!(outcome.recommendations[0].program, Program::Ste);

    let stored = repository
        .fetch(&record.profile.placement_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, PlacementStatus::Recommended);
    assert_eq!(stored.outcome, Some(outcome));
}

#[test]
fn select_confirms_a_recommended_program_and_alerts() {
    let (service, repository, alerts) = build_service();
    let record = service
        .submit(elite_submission("passed"))
        .expect("submission succeeds");
    service
        .recommend(&record.profile.placement_id)
        .expect("recommendation succeeds");

    let placed = service
        .select(&record.profile.placement_id, Program::Ste)
        .expect("selection succeeds");

    assert_eq!(placed.status, PlacementStatus::Placed);
    assert_eq!(placed.selected_program, Some(Program::Ste));

    let stored = repository
        .fetch(&record.profile.placement_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, PlacementStatus::Placed);

    let events = alerts.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "placement_selected");
    assert_eq!(events[0].details.get("program").map(String::as_str), Some("STE"));
}

#[test]
fn select_rejects_unranked_placements() {
    let (service, _, alerts) = build_service();
    let record = service
        .submit(elite_submission("passed"))
        .expect("submission succeeds");

    match service.select(&record.profile.placement_id, Program::Ste) {
        Err(PlacementServiceError::Selection(SelectionError::NotYetRecommended)) => {}
        other => panic!("expected not-yet-recommended error, got {other:?}"),
    }
    assert!(alerts.events().is_empty());
}

#[test]
fn select_rejects_programs_outside_the_recommendations() {
    let (service, _, alerts) = build_service();
    let record = service
        .submit(elite_submission("passed"))
        .expect("submission succeeds");
    service
        .recommend(&record.profile.placement_id)
        .expect("recommendation succeeds");

    match service.select(&record.profile.placement_id, Program::Ohsp) {
        Err(PlacementServiceError::Selection(SelectionError::NotRecommended(
            Program::Ohsp,
        ))) => {}
        other => panic!("expected not-recommended error, got {other:?}"),
    }
    assert!(alerts.events().is_empty());
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();

    match service.get(&PlacementId("missing".to_string())) {
        Err(PlacementServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn rationale_reflects_the_lifecycle() {
    let (service, _, _) = build_service();
    let record = service
        .submit(working_submission())
        .expect("submission succeeds");
    assert_eq!(record.rationale(), "pending recommendation");

    service
        .recommend(&record.profile.placement_id)
        .expect("recommendation succeeds");
    let ranked = service
        .get(&record.profile.placement_id)
        .expect("record present");
    let rationale = ranked.rationale();
    assert!(rationale.contains("OHSP"));
    assert!(rationale.contains("98"));
    assert!(rationale.contains("flexible schedule"));
}
