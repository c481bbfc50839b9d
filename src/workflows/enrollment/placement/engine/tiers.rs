use serde::{Deserialize, Serialize};

use super::super::domain::{
    AbsenceBand, DostExamResult, LearningStyle, Program, StudentProfile, StudyHours, Subject,
    SupportRequest,
};
use super::survey::InterestScores;

/// Which decision rule produced a placement outcome. Rules are evaluated in
/// declaration order; the first whose predicate holds supplies the whole
/// recommendation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRule {
    SpecialNeedsSupport,
    FlexibleSchedule,
    SteQualified,
    AcademicDistinction,
    HighAchiever,
    LanguageTrack,
    TechnicalTrack,
    SurveyInterest,
    GeneralPlacement,
}

impl PlacementRule {
    pub const fn label(self) -> &'static str {
        match self {
            PlacementRule::SpecialNeedsSupport => "special needs support",
            PlacementRule::FlexibleSchedule => "flexible schedule",
            PlacementRule::SteQualified => "STE qualified",
            PlacementRule::AcademicDistinction => "academic distinction",
            PlacementRule::HighAchiever => "high achiever",
            PlacementRule::LanguageTrack => "language track",
            PlacementRule::TechnicalTrack => "technical track",
            PlacementRule::SurveyInterest => "survey interest",
            PlacementRule::GeneralPlacement => "general placement",
        }
    }
}

/// One program slot chosen by a rule, before display metadata and clamping
/// are applied.
#[derive(Debug, Clone)]
pub(crate) struct ProgramPick {
    pub program: Program,
    pub score: i32,
    pub reasons: Vec<String>,
}

impl ProgramPick {
    fn new(program: Program, score: i32) -> Self {
        Self {
            program,
            score,
            reasons: Vec::new(),
        }
    }

    fn with_reasons(program: Program, score: i32, reasons: Vec<String>) -> Self {
        Self {
            program,
            score,
            reasons,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TierDecision {
    pub rule: PlacementRule,
    pub picks: Vec<ProgramPick>,
}

/// Walk the rules in priority order and return the first that fires. The
/// general placement rule always fires, so every profile gets a decision.
pub(crate) fn decide(profile: &StudentProfile, interest: &InterestScores) -> TierDecision {
    if let Some(picks) = special_needs_support(profile) {
        return TierDecision {
            rule: PlacementRule::SpecialNeedsSupport,
            picks,
        };
    }
    if let Some(picks) = flexible_schedule(profile) {
        return TierDecision {
            rule: PlacementRule::FlexibleSchedule,
            picks,
        };
    }
    if let Some(picks) = ste_qualified(profile) {
        return TierDecision {
            rule: PlacementRule::SteQualified,
            picks,
        };
    }
    if let Some(picks) = academic_distinction(profile, interest) {
        return TierDecision {
            rule: PlacementRule::AcademicDistinction,
            picks,
        };
    }
    if let Some(picks) = high_achiever(profile) {
        return TierDecision {
            rule: PlacementRule::HighAchiever,
            picks,
        };
    }
    if let Some(picks) = language_track(profile, interest) {
        return TierDecision {
            rule: PlacementRule::LanguageTrack,
            picks,
        };
    }
    if let Some(picks) = technical_track(profile, interest) {
        return TierDecision {
            rule: PlacementRule::TechnicalTrack,
            picks,
        };
    }
    if let Some(picks) = survey_interest(interest) {
        return TierDecision {
            rule: PlacementRule::SurveyInterest,
            picks,
        };
    }
    TierDecision {
        rule: PlacementRule::GeneralPlacement,
        picks: general_placement(profile),
    }
}

fn special_needs_support(profile: &StudentProfile) -> Option<Vec<ProgramPick>> {
    let survey = &profile.survey;
    let support_signal = survey.extra_support == SupportRequest::Yes
        || survey.difficulty_needs_support();
    if !(profile.demographics.special_needs() && support_signal) {
        return None;
    }

    let mut reasons = vec!["Special needs flagged".to_string()];
    if survey.extra_support == SupportRequest::Yes {
        reasons.push("Support requested".to_string());
    }
    if survey.difficulty_needs_support() {
        reasons.push("Reported difficulty areas need dedicated support".to_string());
    }

    Some(vec![
        ProgramPick::with_reasons(Program::Sned, 100, reasons),
        ProgramPick::with_reasons(
            Program::Ohsp,
            85,
            vec!["Flexible pacing with learning support".to_string()],
        ),
        ProgramPick::with_reasons(
            Program::Regular,
            75,
            vec!["Inclusive mainstream sections available".to_string()],
        ),
    ])
}

fn flexible_schedule(profile: &StudentProfile) -> Option<Vec<ProgramPick>> {
    let survey = &profile.survey;
    let demographics = &profile.demographics;

    let mut triggers = Vec::new();
    if demographics.is_working_student {
        triggers.push("Working student schedule".to_string());
    }
    if survey.absences == AbsenceBand::MoreThanTwenty {
        triggers.push("More than 20 absences reported".to_string());
    }
    if survey.hard_commute() {
        triggers.push("Long and difficult commute".to_string());
    }
    if survey.offline_household() {
        triggers.push("No reliable device or internet at home".to_string());
    }
    if demographics.family_responsibilities && survey.study_hours == StudyHours::LessThanOne {
        triggers.push("Family responsibilities limit study time".to_string());
    }

    if triggers.is_empty() {
        return None;
    }

    Some(vec![
        ProgramPick::with_reasons(Program::Ohsp, 98, triggers),
        ProgramPick::with_reasons(
            Program::Regular,
            82,
            vec!["Full-time attendance remains an option".to_string()],
        ),
        ProgramPick::with_reasons(
            Program::Sptve,
            78,
            vec!["Practical track compatible with work experience".to_string()],
        ),
    ])
}

fn elite_record(profile: &StudentProfile) -> bool {
    profile.academic.overall_average >= 90.0 && profile.academic.complete_record_at_least(85.0)
}

fn ste_qualified(profile: &StudentProfile) -> Option<Vec<ProgramPick>> {
    if !(elite_record(profile) && profile.academic.dost_exam_result == DostExamResult::Passed) {
        return None;
    }

    Some(vec![
        ProgramPick::with_reasons(
            Program::Ste,
            99,
            vec![
                "Overall >= 90".to_string(),
                "All subjects >= 85".to_string(),
                "DOST passed".to_string(),
            ],
        ),
        ProgramPick::with_reasons(
            Program::Spfl,
            88,
            vec!["Strong academic record".to_string()],
        ),
        ProgramPick::with_reasons(
            Program::Sptve,
            87,
            vec!["Strong academic record".to_string()],
        ),
    ])
}

fn academic_distinction(
    profile: &StudentProfile,
    interest: &InterestScores,
) -> Option<Vec<ProgramPick>> {
    if !(elite_record(profile) && profile.academic.dost_exam_result != DostExamResult::Passed) {
        return None;
    }

    let grade_reasons = || {
        vec![
            "Overall >= 90".to_string(),
            "All subjects >= 85".to_string(),
        ]
    };
    let favored = interest.strongest_of(&[Program::Ste, Program::Spfl, Program::Sptve]);
    let slots: [(Program, i32); 3] = match favored {
        Program::Spfl => [
            (Program::Spfl, 92),
            (Program::Sptve, 86),
            (Program::Top5, 85),
        ],
        Program::Sptve => [
            (Program::Sptve, 92),
            (Program::Spfl, 86),
            (Program::Top5, 85),
        ],
        _ => [(Program::Ste, 93), (Program::Spfl, 87), (Program::Sptve, 86)],
    };

    let mut picks = Vec::with_capacity(3);
    for (index, (program, score)) in slots.into_iter().enumerate() {
        let mut reasons = grade_reasons();
        if index == 0 && interest.points(program) > 0 {
            reasons.push(format!("Survey interest favors {program}"));
        }
        picks.push(ProgramPick::with_reasons(program, score, reasons));
    }
    Some(picks)
}

fn high_achiever(profile: &StudentProfile) -> Option<Vec<ProgramPick>> {
    let academic = &profile.academic;
    if !(academic.overall_average >= 90.0 && academic.recorded_grades_at_least(85.0)) {
        return None;
    }

    Some(vec![
        ProgramPick::with_reasons(
            Program::Top5,
            90,
            vec![
                "Overall >= 90".to_string(),
                "Grades on record all >= 85".to_string(),
            ],
        ),
        ProgramPick::with_reasons(Program::Spfl, 86, vec!["Strong academic record".to_string()]),
        ProgramPick::with_reasons(Program::Sptve, 85, vec!["Strong academic record".to_string()]),
    ])
}

fn language_track(
    profile: &StudentProfile,
    interest: &InterestScores,
) -> Option<Vec<ProgramPick>> {
    let academic = &profile.academic;
    let grades_fit = academic.overall_average >= 85.0
        && academic.grade(Subject::English) >= 85.0
        && academic.grade(Subject::Filipino) >= 85.0;
    if !grades_fit {
        return None;
    }

    let survey = &profile.survey;
    let language_leaning = survey.enjoyed_subjects.contains(&Subject::English)
        || survey.enjoyed_subjects.contains(&Subject::Filipino);
    let interested = survey.interested_program == Some(Program::Spfl)
        || interest.points(Program::Spfl) >= 10
        || language_leaning;
    if !interested {
        return None;
    }

    let mut reasons = vec!["English and Filipino both >= 85".to_string()];
    if survey.interested_program == Some(Program::Spfl) {
        reasons.push("Listed SPFL as preferred program".to_string());
    } else if language_leaning {
        reasons.push("Enjoys language subjects".to_string());
    } else {
        reasons.push(format!(
            "Survey interest score: {}",
            interest.points(Program::Spfl)
        ));
    }

    Some(vec![
        ProgramPick::with_reasons(Program::Spfl, 88, reasons),
        ProgramPick::with_reasons(Program::Top5, 84, vec!["Strong overall average".to_string()]),
        ProgramPick::new(Program::Regular, 80),
    ])
}

fn technical_track(
    profile: &StudentProfile,
    interest: &InterestScores,
) -> Option<Vec<ProgramPick>> {
    let academic = &profile.academic;
    let grades_fit = academic.overall_average >= 85.0
        && (academic.grade(Subject::EdukasyonPangkabuhayan) >= 85.0
            || academic.grade(Subject::Mapeh) >= 85.0);
    if !grades_fit {
        return None;
    }

    let survey = &profile.survey;
    let style_fit = matches!(
        survey.learning_style,
        LearningStyle::Kinesthetic | LearningStyle::Mixed
    );
    let interested = survey.interested_program == Some(Program::Sptve)
        || interest.points(Program::Sptve) >= 10
        || style_fit;
    if !interested {
        return None;
    }

    let mut reasons = vec!["Strong technical subject grades".to_string()];
    if survey.interested_program == Some(Program::Sptve) {
        reasons.push("Listed SPTVE as preferred program".to_string());
    } else if style_fit {
        reasons.push("Hands-on learning style".to_string());
    } else {
        reasons.push(format!(
            "Survey interest score: {}",
            interest.points(Program::Sptve)
        ));
    }

    Some(vec![
        ProgramPick::with_reasons(Program::Sptve, 87, reasons),
        ProgramPick::with_reasons(Program::Top5, 84, vec!["Strong overall average".to_string()]),
        ProgramPick::new(Program::Regular, 80),
    ])
}

const SURVEY_SLOT_FLOORS: [(i32, i32); 3] = [(75, 60), (70, 55), (65, 50)];

fn survey_interest(interest: &InterestScores) -> Option<Vec<ProgramPick>> {
    let scored: Vec<(Program, u32)> = interest
        .ranked()
        .into_iter()
        .filter(|(_, points)| *points > 0)
        .collect();
    if scored.is_empty() {
        return None;
    }

    let mut picks: Vec<ProgramPick> = Vec::with_capacity(3);
    for (slot, (program, points)) in scored.iter().take(3).enumerate() {
        let (floor, base) = SURVEY_SLOT_FLOORS[slot];
        picks.push(ProgramPick::with_reasons(
            *program,
            floor.max(base + *points as i32),
            vec![format!("Survey interest score: {points}")],
        ));
    }

    // Pad to three with the open-enrollment sections.
    for filler in [Program::Regular, Program::Ohsp] {
        if picks.len() >= 3 {
            break;
        }
        if picks.iter().any(|pick| pick.program == filler) {
            continue;
        }
        let slot = picks.len();
        let (floor, base) = SURVEY_SLOT_FLOORS[slot];
        let points = interest.points(filler) as i32;
        picks.push(ProgramPick::new(filler, floor.max(base + points)));
    }

    Some(picks)
}

fn general_placement(profile: &StudentProfile) -> Vec<ProgramPick> {
    let overall = profile.academic.overall_average;
    let slots: [(Program, i32); 3] = if overall >= 85.0 {
        [
            (Program::Top5, 82),
            (Program::Regular, 78),
            (Program::Spfl, 75),
        ]
    } else if overall >= 75.0 {
        [
            (Program::Regular, 78),
            (Program::Ohsp, 74),
            (Program::Sptve, 70),
        ]
    } else {
        [
            (Program::Regular, 70),
            (Program::Ohsp, 68),
            (Program::Sned, 65),
        ]
    };

    slots
        .into_iter()
        .enumerate()
        .map(|(index, (program, score))| {
            if index == 0 && overall > 0.0 {
                ProgramPick::with_reasons(
                    program,
                    score,
                    vec![format!("Overall average of {overall:.2} fits this section")],
                )
            } else {
                ProgramPick::new(program, score)
            }
        })
        .collect()
}
