use super::common::*;
use crate::workflows::enrollment::placement::intake::{
    AcademicAnswers, DemographicAnswers, PlacementSubmission, SurveyAnswers,
};
use crate::workflows::enrollment::placement::{PlacementRule, Program};

#[test]
fn elite_record_with_dost_pass_ranks_ste_first() {
    let profile = profile_of(elite_submission("passed"));

    let outcome = engine().evaluate(&profile);

    assert_eq!(outcome.rule, PlacementRule::SteQualified);
    let top = &outcome.recommendations[0];
    assert_eq!(top.program, Program::Ste);
    assert_eq!(top.score, 99);
    assert!(top.reasons.iter().any(|reason| reason == "Overall >= 90"));
    assert!(top.reasons.iter().any(|reason| reason == "DOST passed"));

    assert_eq!(outcome.recommendations[1].program, Program::Spfl);
    assert_eq!(outcome.recommendations[1].score, 88);
    assert_eq!(outcome.recommendations[2].program, Program::Sptve);
    assert_eq!(outcome.recommendations[2].score, 87);
}

#[test]
fn special_needs_with_difficulty_areas_routes_to_sned() {
    let profile = profile_of(sped_submission());

    let outcome = engine().evaluate(&profile);

    assert_eq!(outcome.rule, PlacementRule::SpecialNeedsSupport);
    let top = &outcome.recommendations[0];
    assert_eq!(top.program, Program::Sned);
    assert_eq!(top.score, 100);
    assert!(top
        .reasons
        .iter()
        .any(|reason| reason == "Special needs flagged"));
}

#[test]
fn working_student_routes_to_open_high_school() {
    let profile = profile_of(working_submission());

    let outcome = engine().evaluate(&profile);

    assert_eq!(outcome.rule, PlacementRule::FlexibleSchedule);
    assert_eq!(outcome.recommendations[0].program, Program::Ohsp);
    assert_eq!(outcome.recommendations[0].score, 98);
    assert_eq!(outcome.recommendations[1].program, Program::Regular);
    assert_eq!(outcome.recommendations[1].score, 82);
    assert_eq!(outcome.recommendations[2].program, Program::Sptve);
    assert_eq!(outcome.recommendations[2].score, 78);
}

#[test]
fn empty_profile_falls_to_general_placement() {
    let profile = profile_of(blank_submission());
    assert_eq!(profile.academic.overall_average, 0.0);

    let outcome = engine().evaluate(&profile);

    assert_eq!(outcome.rule, PlacementRule::GeneralPlacement);
    let programs: Vec<Program> = outcome
        .recommendations
        .iter()
        .map(|rec| rec.program)
        .collect();
    assert_eq!(
        programs,
        vec![Program::Regular, Program::Ohsp, Program::Sned]
    );
    let scores: Vec<u8> = outcome.recommendations.iter().map(|rec| rec.score).collect();
    assert_eq!(scores, vec![70, 68, 65]);
}

#[test]
fn language_leaning_profile_ranks_spfl_first() {
    let profile = profile_of(language_submission());
    assert_eq!(profile.academic.overall_average, 87.0);

    let outcome = engine().evaluate(&profile);

    assert_eq!(outcome.rule, PlacementRule::LanguageTrack);
    assert_eq!(outcome.recommendations[0].program, Program::Spfl);
    assert_eq!(outcome.recommendations[0].score, 88);
}

#[test]
fn special_needs_takes_precedence_over_flexibility() {
    let mut submission = sped_submission();
    submission.demographics.is_working_student = true;

    let outcome = engine().evaluate(&profile_of(submission));

    assert_eq!(outcome.rule, PlacementRule::SpecialNeedsSupport);
    assert_eq!(outcome.recommendations[0].program, Program::Sned);
}

#[test]
fn elite_record_without_dost_follows_survey_preference() {
    let mut submission = elite_submission("failed");
    submission.survey = SurveyAnswers {
        interested_program: Some("SPTVE".to_string()),
        program_motivation: Some("Very motivated".to_string()),
        ..SurveyAnswers::default()
    };

    let outcome = engine().evaluate(&profile_of(submission));

    assert_eq!(outcome.rule, PlacementRule::AcademicDistinction);
    assert_eq!(outcome.recommendations[0].program, Program::Sptve);
    assert_eq!(outcome.recommendations[0].score, 92);
}

#[test]
fn elite_record_without_dost_defaults_to_ste_branch() {
    let outcome = engine().evaluate(&profile_of(elite_submission("not_taken")));

    assert_eq!(outcome.rule, PlacementRule::AcademicDistinction);
    assert_eq!(outcome.recommendations[0].program, Program::Ste);
    assert_eq!(outcome.recommendations[0].score, 93);
}

#[test]
fn incomplete_elite_record_lands_on_honors_section() {
    let mut submission = elite_submission("passed");
    submission.academic.mapeh = 0.0;

    let profile = profile_of(submission);
    assert_eq!(profile.academic.overall_average, 95.0);

    let outcome = engine().evaluate(&profile);

    assert_eq!(outcome.rule, PlacementRule::HighAchiever);
    assert_eq!(outcome.recommendations[0].program, Program::Top5);
    assert_eq!(outcome.recommendations[0].score, 90);
}

#[test]
fn technical_grades_with_hands_on_style_rank_sptve() {
    let submission = PlacementSubmission {
        lrn: "100000000006".to_string(),
        academic: AcademicAnswers {
            mathematics: 86.0,
            araling_panlipunan: 85.0,
            english: 84.0,
            edukasyon_sa_pagpapakatao: 86.0,
            science: 85.0,
            edukasyon_pangkabuhayan: 90.0,
            filipino: 84.0,
            mapeh: 90.0,
            dost_exam_result: None,
        },
        survey: SurveyAnswers {
            learning_style: Some("Kinesthetic".to_string()),
            ..SurveyAnswers::default()
        },
        demographics: DemographicAnswers::default(),
        ..PlacementSubmission::default()
    };

    let outcome = engine().evaluate(&profile_of(submission));

    assert_eq!(outcome.rule, PlacementRule::TechnicalTrack);
    assert_eq!(outcome.recommendations[0].program, Program::Sptve);
    assert_eq!(outcome.recommendations[0].score, 87);
}

#[test]
fn survey_interest_alone_produces_a_full_list() {
    let outcome = engine().evaluate(&profile_of(survey_only_submission()));

    assert_eq!(outcome.rule, PlacementRule::SurveyInterest);
    assert_eq!(outcome.recommendations.len(), 3);
    assert_eq!(outcome.recommendations[0].program, Program::Ste);
    // 14 interest points land below the 75-point slot floor.
    assert_eq!(outcome.recommendations[0].score, 75);
}

#[test]
fn survey_interest_pads_with_open_sections() {
    let submission = PlacementSubmission {
        lrn: "100000000007".to_string(),
        survey: SurveyAnswers {
            extra_support: Some("Yes".to_string()),
            ..SurveyAnswers::default()
        },
        ..PlacementSubmission::default()
    };

    let outcome = engine().evaluate(&profile_of(submission));

    assert_eq!(outcome.rule, PlacementRule::SurveyInterest);
    let programs: Vec<Program> = outcome
        .recommendations
        .iter()
        .map(|rec| rec.program)
        .collect();
    assert_eq!(programs, vec![Program::Sned, Program::Regular, Program::Ohsp]);
    let scores: Vec<u8> = outcome.recommendations.iter().map(|rec| rec.score).collect();
    assert_eq!(scores, vec![75, 70, 65]);
}

#[test]
fn mid_average_general_placement_prefers_regular() {
    let submission = PlacementSubmission {
        lrn: "100000000008".to_string(),
        academic: academic_all(78.0, "not_taken"),
        ..PlacementSubmission::default()
    };

    let outcome = engine().evaluate(&profile_of(submission));

    assert_eq!(outcome.rule, PlacementRule::GeneralPlacement);
    let programs: Vec<Program> = outcome
        .recommendations
        .iter()
        .map(|rec| rec.program)
        .collect();
    assert_eq!(
        programs,
        vec![Program::Regular, Program::Ohsp, Program::Sptve]
    );
}

#[test]
fn rankings_are_sorted_bounded_and_reasoned() {
    let fixtures = vec![
        blank_submission(),
        elite_submission("passed"),
        elite_submission("failed"),
        working_submission(),
        sped_submission(),
        language_submission(),
        survey_only_submission(),
    ];

    for submission in fixtures {
        let recommendations = engine().rank(&profile_of(submission));

        assert!(!recommendations.is_empty());
        assert!(recommendations.len() >= 2 && recommendations.len() <= 3);
        assert!(recommendations
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
        for recommendation in &recommendations {
            assert!((60..=100).contains(&recommendation.score));
            assert!(!recommendation.reasons.is_empty());
            assert!(!recommendation.name.is_empty());
        }
    }
}

#[test]
fn identical_profiles_rank_identically() {
    let profile = profile_of(language_submission());

    let first = engine().rank(&profile);
    let second = engine().rank(&profile);

    assert_eq!(first, second);
}
