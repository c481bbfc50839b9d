use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for placement records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementId(pub String);

/// Section programs an applicant can be placed into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Program {
    #[serde(rename = "STE")]
    Ste,
    #[serde(rename = "SPFL")]
    Spfl,
    #[serde(rename = "SPTVE")]
    Sptve,
    #[serde(rename = "OHSP")]
    Ohsp,
    #[serde(rename = "SNED")]
    Sned,
    #[serde(rename = "TOP5")]
    Top5,
    #[serde(rename = "REGULAR")]
    Regular,
}

impl Program {
    /// Evaluation order for interest buckets; ties in ranked listings keep
    /// this order.
    pub const ALL: [Program; 7] = [
        Program::Ste,
        Program::Spfl,
        Program::Sptve,
        Program::Ohsp,
        Program::Sned,
        Program::Top5,
        Program::Regular,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Program::Ste => "STE",
            Program::Spfl => "SPFL",
            Program::Sptve => "SPTVE",
            Program::Ohsp => "OHSP",
            Program::Sned => "SNED",
            Program::Top5 => "TOP5",
            Program::Regular => "REGULAR",
        }
    }

    /// Parse a program code as written on forms. Accepts the retired
    /// "SPTVL" spelling still present on older report cards.
    pub fn from_code(raw: &str) -> Option<Program> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "STE" => Some(Program::Ste),
            "SPFL" => Some(Program::Spfl),
            "SPTVE" | "SPTVL" => Some(Program::Sptve),
            "OHSP" => Some(Program::Ohsp),
            "SNED" | "SNED L" => Some(Program::Sned),
            "TOP5" | "TOP 5" => Some(Program::Top5),
            "REGULAR" => Some(Program::Regular),
            _ => None,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Grade 6 report card subjects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Mathematics,
    AralingPanlipunan,
    English,
    EdukasyonSaPagpapakatao,
    Science,
    EdukasyonPangkabuhayan,
    Filipino,
    Mapeh,
}

impl Subject {
    pub fn from_label(raw: &str) -> Option<Subject> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "math" | "mathematics" => Some(Subject::Mathematics),
            "araling panlipunan" | "ap" => Some(Subject::AralingPanlipunan),
            "english" => Some(Subject::English),
            "edukasyon sa pagpapakatao" | "esp" => Some(Subject::EdukasyonSaPagpapakatao),
            "science" => Some(Subject::Science),
            "edukasyon sa pangkabuhayan" | "edukasyon pangkabuhayan" | "epp" => {
                Some(Subject::EdukasyonPangkabuhayan)
            }
            "filipino" => Some(Subject::Filipino),
            "mapeh" => Some(Subject::Mapeh),
            _ => None,
        }
    }
}

/// DOST qualifying exam outcome feeding the STE track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DostExamResult {
    Passed,
    Failed,
    NotTaken,
}

impl DostExamResult {
    /// Unknown values are treated as not taken.
    pub fn from_label(raw: &str) -> DostExamResult {
        match raw.trim().to_ascii_lowercase().as_str() {
            "passed" => DostExamResult::Passed,
            "failed" => DostExamResult::Failed,
            _ => DostExamResult::NotTaken,
        }
    }
}

macro_rules! survey_enum {
    (
        $(#[$outer:meta])*
        $name:ident { $($variant:ident => [$($label:literal),+ $(,)?]),+ $(,)? }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
            #[default]
            Unset,
        }

        impl $name {
            /// Match a survey answer against the known labels; anything
            /// else (including blank) stays `Unset`.
            pub fn from_label(raw: &str) -> $name {
                let needle = raw.trim().to_ascii_lowercase();
                $(
                    if [$($label),+].iter().any(|label| *label == needle) {
                        return $name::$variant;
                    }
                )+
                $name::Unset
            }
        }
    };
}

survey_enum! {
    /// How motivated the applicant says they are about their preferred program.
    Motivation {
        High => ["very motivated", "very interested"],
        Moderate => ["somewhat motivated", "somewhat interested"],
        Low => ["not motivated", "not sure"],
    }
}

survey_enum! {
    /// Self-reported daily study time.
    StudyHours {
        LessThanOne => ["less than 1 hour"],
        OneToTwo => ["1-2 hours"],
        TwoToThree => ["2-3 hours"],
        MoreThanThree => ["more than 3 hours"],
    }
}

survey_enum! {
    AssignmentsOnTime {
        Always => ["always"],
        Usually => ["usually", "most of the time"],
        Sometimes => ["sometimes"],
        Rarely => ["rarely", "never"],
    }
}

survey_enum! {
    /// What the applicant does when a lesson gets difficult.
    DifficultLessonsResponse {
        StudyHarder => ["i study harder", "study harder"],
        AskForHelp => ["i ask for help", "ask for help"],
        GiveUp => ["i tend to give up", "give up"],
    }
}

survey_enum! {
    DeviceAvailability {
        Own => ["own device", "personal device"],
        Shared => ["shared device", "shared"],
        NotAvailable => ["not available", "none"],
    }
}

survey_enum! {
    InternetAccess {
        Stable => ["stable", "stable connection"],
        Limited => ["limited", "intermittent", "mobile data only"],
        NotAvailable => ["not available", "none"],
    }
}

survey_enum! {
    /// Absences over the last school year.
    AbsenceBand {
        Zero => ["none", "0"],
        OneToTen => ["1-10 days"],
        ElevenToTwenty => ["11-20 days"],
        MoreThanTwenty => ["more than 20"],
    }
}

survey_enum! {
    SupportRequest {
        Yes => ["yes"],
        No => ["no"],
    }
}

survey_enum! {
    DistanceBand {
        UnderOneKm => ["less than 1 km"],
        OneToFiveKm => ["1-5 km"],
        MoreThanFiveKm => ["more than 5 km"],
    }
}

survey_enum! {
    TravelDifficulty {
        Yes => ["yes"],
        No => ["no"],
    }
}

survey_enum! {
    LearningStyle {
        Visual => ["visual"],
        Auditory => ["auditory"],
        ReadingWriting => ["reading/writing", "reading and writing"],
        Kinesthetic => ["kinesthetic", "hands-on"],
        Mixed => ["mixed"],
    }
}

/// Activities the applicant reports enjoying.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    ScienceExperiments,
    BuildingOrFixing,
    ArtsAndCrafts,
    ReadingAndWritingStories,
    SportsAndGames,
    LeadingGroups,
}

impl Activity {
    pub fn from_label(raw: &str) -> Option<Activity> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "science experiments" | "experiments" => Some(Activity::ScienceExperiments),
            "building or fixing things" | "building things" | "fixing things" => {
                Some(Activity::BuildingOrFixing)
            }
            "arts and crafts" | "crafts" => Some(Activity::ArtsAndCrafts),
            "reading and writing stories" | "reading" | "writing stories" => {
                Some(Activity::ReadingAndWritingStories)
            }
            "sports and games" | "sports" => Some(Activity::SportsAndGames),
            "leading group activities" | "leadership" => Some(Activity::LeadingGroups),
            _ => None,
        }
    }

    /// Activities that signal a preference for practical, hands-on work.
    pub fn is_hands_on(self) -> bool {
        matches!(self, Activity::BuildingOrFixing | Activity::ArtsAndCrafts)
    }
}

/// Areas the applicant reports struggling with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyArea {
    Focusing,
    SocialInteraction,
    Reading,
    Writing,
    WorkingWithNumbers,
}

impl DifficultyArea {
    pub fn from_label(raw: &str) -> Option<DifficultyArea> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "focusing" => Some(DifficultyArea::Focusing),
            "social interaction" => Some(DifficultyArea::SocialInteraction),
            "reading" => Some(DifficultyArea::Reading),
            "writing" => Some(DifficultyArea::Writing),
            "working with numbers" | "math" => Some(DifficultyArea::WorkingWithNumbers),
            _ => None,
        }
    }

    /// Difficulty areas that, combined with a special-needs flag, route the
    /// applicant to dedicated support.
    pub fn needs_dedicated_support(self) -> bool {
        matches!(
            self,
            DifficultyArea::Focusing
                | DifficultyArea::SocialInteraction
                | DifficultyArea::Reading
                | DifficultyArea::Writing
        )
    }
}

/// Normalized Grade 6 academic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub mathematics: f32,
    pub araling_panlipunan: f32,
    pub english: f32,
    pub edukasyon_sa_pagpapakatao: f32,
    pub science: f32,
    pub edukasyon_pangkabuhayan: f32,
    pub filipino: f32,
    pub mapeh: f32,
    /// Mean of the valid (>0) grades, rounded to 2 decimals; 0 when no grade
    /// was entered.
    pub overall_average: f32,
    pub dost_exam_result: DostExamResult,
}

impl AcademicRecord {
    pub fn grades(&self) -> [(Subject, f32); 8] {
        [
            (Subject::Mathematics, self.mathematics),
            (Subject::AralingPanlipunan, self.araling_panlipunan),
            (Subject::English, self.english),
            (Subject::EdukasyonSaPagpapakatao, self.edukasyon_sa_pagpapakatao),
            (Subject::Science, self.science),
            (Subject::EdukasyonPangkabuhayan, self.edukasyon_pangkabuhayan),
            (Subject::Filipino, self.filipino),
            (Subject::Mapeh, self.mapeh),
        ]
    }

    pub fn grade(&self, subject: Subject) -> f32 {
        match subject {
            Subject::Mathematics => self.mathematics,
            Subject::AralingPanlipunan => self.araling_panlipunan,
            Subject::English => self.english,
            Subject::EdukasyonSaPagpapakatao => self.edukasyon_sa_pagpapakatao,
            Subject::Science => self.science,
            Subject::EdukasyonPangkabuhayan => self.edukasyon_pangkabuhayan,
            Subject::Filipino => self.filipino,
            Subject::Mapeh => self.mapeh,
        }
    }

    /// True when every subject has a recorded grade at or above `threshold`.
    pub fn complete_record_at_least(&self, threshold: f32) -> bool {
        self.grades()
            .iter()
            .all(|(_, grade)| *grade > 0.0 && *grade >= threshold)
    }

    /// True when every grade actually on record (>0) is at or above
    /// `threshold`. Vacuously false with an empty record.
    pub fn recorded_grades_at_least(&self, threshold: f32) -> bool {
        let mut any = false;
        for (_, grade) in self.grades() {
            if grade > 0.0 {
                any = true;
                if grade < threshold {
                    return false;
                }
            }
        }
        any
    }
}

/// Normalized questionnaire answers. Every categorical field is a closed enum
/// so rule predicates cannot silently miss on label drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub interested_program: Option<Program>,
    pub program_motivation: Motivation,
    pub enjoyed_subjects: BTreeSet<Subject>,
    pub enjoyed_activities: BTreeSet<Activity>,
    pub study_hours: StudyHours,
    pub assignments_on_time: AssignmentsOnTime,
    pub handle_difficult_lessons: DifficultLessonsResponse,
    pub device_availability: DeviceAvailability,
    pub internet_access: InternetAccess,
    pub absences: AbsenceBand,
    pub difficulty_areas: BTreeSet<DifficultyArea>,
    pub extra_support: SupportRequest,
    pub distance_from_school: DistanceBand,
    pub travel_difficulty: TravelDifficulty,
    pub learning_style: LearningStyle,
}

impl SurveyResponse {
    pub fn difficulty_needs_support(&self) -> bool {
        self.difficulty_areas
            .iter()
            .any(|area| area.needs_dedicated_support())
    }

    /// No usable gadget and no usable connection.
    pub fn offline_household(&self) -> bool {
        self.device_availability == DeviceAvailability::NotAvailable
            && self.internet_access == InternetAccess::NotAvailable
    }

    pub fn hard_commute(&self) -> bool {
        self.distance_from_school == DistanceBand::MoreThanFiveKm
            && self.travel_difficulty == TravelDifficulty::Yes
    }
}

/// Flags collected during student data entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub is_sped: bool,
    pub is_pwd: bool,
    pub is_working_student: bool,
    pub family_responsibilities: bool,
}

impl Demographics {
    pub fn special_needs(&self) -> bool {
        self.is_sped || self.is_pwd
    }
}

/// Immutable input to a ranking call, built once per submission by intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub placement_id: PlacementId,
    pub lrn: String,
    pub student_name: String,
    pub birth_date: Option<NaiveDate>,
    pub academic: AcademicRecord,
    pub survey: SurveyResponse,
    pub demographics: Demographics,
}

/// High level status tracked throughout the placement workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Submitted,
    Recommended,
    Placed,
}

impl PlacementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PlacementStatus::Submitted => "submitted",
            PlacementStatus::Recommended => "recommended",
            PlacementStatus::Placed => "placed",
        }
    }
}
