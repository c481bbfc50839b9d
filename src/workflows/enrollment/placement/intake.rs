use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AbsenceBand, AcademicRecord, Activity, AssignmentsOnTime, Demographics, DeviceAvailability,
    DifficultLessonsResponse, DifficultyArea, DistanceBand, DostExamResult, InternetAccess,
    LearningStyle, Motivation, PlacementId, Program, StudentProfile, StudyHours, Subject,
    SupportRequest, SurveyResponse, TravelDifficulty,
};

/// Raw inbound payload as the enrollment forms send it. Grades tolerate
/// numbers, numeric strings, or blanks; categorical answers arrive as the
/// label text shown on the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSubmission {
    pub lrn: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub academic: AcademicAnswers,
    #[serde(default)]
    pub survey: SurveyAnswers,
    #[serde(default)]
    pub demographics: DemographicAnswers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicAnswers {
    #[serde(default, deserialize_with = "coerced_grade")]
    pub mathematics: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub araling_panlipunan: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub english: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub edukasyon_sa_pagpapakatao: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub science: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub edukasyon_pangkabuhayan: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub filipino: f32,
    #[serde(default, deserialize_with = "coerced_grade")]
    pub mapeh: f32,
    #[serde(default)]
    pub dost_exam_result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswers {
    #[serde(default)]
    pub interested_program: Option<String>,
    #[serde(default)]
    pub program_motivation: Option<String>,
    #[serde(default)]
    pub enjoyed_subjects: Vec<String>,
    #[serde(default)]
    pub enjoyed_activities: Vec<String>,
    #[serde(default)]
    pub study_hours: Option<String>,
    #[serde(default)]
    pub assignments_on_time: Option<String>,
    #[serde(default)]
    pub handle_difficult_lessons: Option<String>,
    #[serde(default)]
    pub device_availability: Option<String>,
    #[serde(default)]
    pub internet_access: Option<String>,
    #[serde(default)]
    pub absences: Option<String>,
    #[serde(default)]
    pub difficulty_areas: Vec<String>,
    #[serde(default)]
    pub extra_support: Option<String>,
    #[serde(default)]
    pub distance_from_school: Option<String>,
    #[serde(default)]
    pub travel_difficulty: Option<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicAnswers {
    #[serde(default)]
    pub is_sped: bool,
    #[serde(default)]
    pub is_pwd: bool,
    #[serde(default)]
    pub is_working_student: bool,
    #[serde(default)]
    pub family_responsibilities: bool,
}

/// Convert an inbound submission into a normalized applicant profile.
///
/// Normalization never fails: unparseable grades become 0, unknown labels
/// become the unset sentinel, and the overall average is derived from the
/// valid grades regardless of what the caller sent. Running it twice over
/// the same submission yields identical profiles.
pub fn profile_from_submission(submission: PlacementSubmission) -> StudentProfile {
    let academic = normalize_academic(&submission.academic);
    let survey = normalize_survey(&submission.survey);
    let demographics = Demographics {
        is_sped: submission.demographics.is_sped,
        is_pwd: submission.demographics.is_pwd,
        is_working_student: submission.demographics.is_working_student,
        family_responsibilities: submission.demographics.family_responsibilities,
    };

    StudentProfile {
        placement_id: PlacementId("pending".to_string()),
        lrn: submission.lrn.trim().to_string(),
        student_name: submission.student_name.trim().to_string(),
        birth_date: submission.birth_date,
        academic,
        survey,
        demographics,
    }
}

fn normalize_academic(answers: &AcademicAnswers) -> AcademicRecord {
    let mathematics = clamp_grade(answers.mathematics);
    let araling_panlipunan = clamp_grade(answers.araling_panlipunan);
    let english = clamp_grade(answers.english);
    let edukasyon_sa_pagpapakatao = clamp_grade(answers.edukasyon_sa_pagpapakatao);
    let science = clamp_grade(answers.science);
    let edukasyon_pangkabuhayan = clamp_grade(answers.edukasyon_pangkabuhayan);
    let filipino = clamp_grade(answers.filipino);
    let mapeh = clamp_grade(answers.mapeh);

    let grades = [
        mathematics,
        araling_panlipunan,
        english,
        edukasyon_sa_pagpapakatao,
        science,
        edukasyon_pangkabuhayan,
        filipino,
        mapeh,
    ];
    let overall_average = overall_average(&grades);

    let dost_exam_result = answers
        .dost_exam_result
        .as_deref()
        .map(DostExamResult::from_label)
        .unwrap_or(DostExamResult::NotTaken);

    AcademicRecord {
        mathematics,
        araling_panlipunan,
        english,
        edukasyon_sa_pagpapakatao,
        science,
        edukasyon_pangkabuhayan,
        filipino,
        mapeh,
        overall_average,
        dost_exam_result,
    }
}

/// Mean of the valid (>0) grades rounded to 2 decimals; zero-filled
/// placeholders never count toward the average.
fn overall_average(grades: &[f32]) -> f32 {
    let valid: Vec<f32> = grades.iter().copied().filter(|grade| *grade > 0.0).collect();
    if valid.is_empty() {
        return 0.0;
    }
    let mean = valid.iter().sum::<f32>() / valid.len() as f32;
    (mean * 100.0).round() / 100.0
}

fn clamp_grade(raw: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        0.0
    } else {
        raw.min(100.0)
    }
}

fn normalize_survey(answers: &SurveyAnswers) -> SurveyResponse {
    let interested_program = answers
        .interested_program
        .as_deref()
        .and_then(Program::from_code);

    let enjoyed_subjects: BTreeSet<Subject> = answers
        .enjoyed_subjects
        .iter()
        .filter_map(|label| Subject::from_label(label))
        .collect();
    let enjoyed_activities: BTreeSet<Activity> = answers
        .enjoyed_activities
        .iter()
        .filter_map(|label| Activity::from_label(label))
        .collect();
    let difficulty_areas: BTreeSet<DifficultyArea> = answers
        .difficulty_areas
        .iter()
        .filter_map(|label| DifficultyArea::from_label(label))
        .collect();

    SurveyResponse {
        interested_program,
        program_motivation: label_or_unset(&answers.program_motivation, Motivation::from_label),
        enjoyed_subjects,
        enjoyed_activities,
        study_hours: label_or_unset(&answers.study_hours, StudyHours::from_label),
        assignments_on_time: label_or_unset(
            &answers.assignments_on_time,
            AssignmentsOnTime::from_label,
        ),
        handle_difficult_lessons: label_or_unset(
            &answers.handle_difficult_lessons,
            DifficultLessonsResponse::from_label,
        ),
        device_availability: label_or_unset(
            &answers.device_availability,
            DeviceAvailability::from_label,
        ),
        internet_access: label_or_unset(&answers.internet_access, InternetAccess::from_label),
        absences: label_or_unset(&answers.absences, AbsenceBand::from_label),
        difficulty_areas,
        extra_support: label_or_unset(&answers.extra_support, SupportRequest::from_label),
        distance_from_school: label_or_unset(
            &answers.distance_from_school,
            DistanceBand::from_label,
        ),
        travel_difficulty: label_or_unset(
            &answers.travel_difficulty,
            TravelDifficulty::from_label,
        ),
        learning_style: label_or_unset(&answers.learning_style, LearningStyle::from_label),
    }
}

fn label_or_unset<T: Default>(raw: &Option<String>, parse: impl Fn(&str) -> T) -> T {
    match raw.as_deref() {
        Some(label) => parse(label),
        None => T::default(),
    }
}

/// Grade parsing shared with the masterlist importer: numeric text parses,
/// everything else counts as no grade entered.
pub(crate) fn grade_from_text(raw: &str) -> f32 {
    raw.trim().parse::<f32>().unwrap_or(0.0)
}

fn coerced_grade<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => number.as_f64().unwrap_or(0.0) as f32,
        Some(serde_json::Value::String(text)) => grade_from_text(&text),
        _ => 0.0,
    })
}
