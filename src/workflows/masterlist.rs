use crate::workflows::enrollment::placement::{
    profile_from_submission, AcademicAnswers, DemographicAnswers, PlacementEngine,
    PlacementSubmission, Program, SurveyAnswers, PROGRAM_CATALOG,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum MasterlistImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for MasterlistImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MasterlistImportError::Io(err) => {
                write!(f, "failed to read masterlist export: {}", err)
            }
            MasterlistImportError::Csv(err) => write!(f, "invalid masterlist CSV data: {}", err),
        }
    }
}

impl std::error::Error for MasterlistImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MasterlistImportError::Io(err) => Some(err),
            MasterlistImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for MasterlistImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MasterlistImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct MasterlistRow {
    #[serde(rename = "LRN")]
    lrn: String,
    #[serde(rename = "Student Name", default)]
    student_name: Option<String>,
    #[serde(rename = "Mathematics", default)]
    mathematics: Option<String>,
    #[serde(rename = "Araling Panlipunan", default)]
    araling_panlipunan: Option<String>,
    #[serde(rename = "English", default)]
    english: Option<String>,
    #[serde(rename = "Edukasyon sa Pagpapakatao", default)]
    edukasyon_sa_pagpapakatao: Option<String>,
    #[serde(rename = "Science", default)]
    science: Option<String>,
    #[serde(rename = "Edukasyon sa Pangkabuhayan", default)]
    edukasyon_pangkabuhayan: Option<String>,
    #[serde(rename = "Filipino", default)]
    filipino: Option<String>,
    #[serde(rename = "MAPEH", default)]
    mapeh: Option<String>,
    #[serde(rename = "DOST Exam", default)]
    dost_exam_result: Option<String>,
    #[serde(rename = "SPED", default)]
    sped: Option<String>,
    #[serde(rename = "PWD", default)]
    pwd: Option<String>,
    #[serde(rename = "Working Student", default)]
    working_student: Option<String>,
    #[serde(rename = "Interested Program", default)]
    interested_program: Option<String>,
    #[serde(rename = "Study Hours", default)]
    study_hours: Option<String>,
    #[serde(rename = "Absences", default)]
    absences: Option<String>,
    #[serde(rename = "Device", default)]
    device_availability: Option<String>,
    #[serde(rename = "Internet", default)]
    internet_access: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim).map(str::to_ascii_lowercase),
        Some(ref v) if v == "yes" || v == "true" || v == "1"
    )
}

fn grade_text(value: &Option<String>) -> f32 {
    value
        .as_deref()
        .map(crate::workflows::enrollment::placement::intake::grade_from_text)
        .unwrap_or(0.0)
}

impl MasterlistRow {
    fn into_submission(self) -> PlacementSubmission {
        let academic = AcademicAnswers {
            mathematics: grade_text(&self.mathematics),
            araling_panlipunan: grade_text(&self.araling_panlipunan),
            english: grade_text(&self.english),
            edukasyon_sa_pagpapakatao: grade_text(&self.edukasyon_sa_pagpapakatao),
            science: grade_text(&self.science),
            edukasyon_pangkabuhayan: grade_text(&self.edukasyon_pangkabuhayan),
            filipino: grade_text(&self.filipino),
            mapeh: grade_text(&self.mapeh),
            dost_exam_result: self.dost_exam_result,
        };

        let survey = SurveyAnswers {
            interested_program: self.interested_program,
            study_hours: self.study_hours,
            absences: self.absences,
            device_availability: self.device_availability,
            internet_access: self.internet_access,
            ..SurveyAnswers::default()
        };

        let demographics = DemographicAnswers {
            is_sped: flag(&self.sped),
            is_pwd: flag(&self.pwd),
            is_working_student: flag(&self.working_student),
            family_responsibilities: false,
        };

        PlacementSubmission {
            lrn: self.lrn,
            student_name: self.student_name.unwrap_or_default(),
            birth_date: None,
            academic,
            survey,
            demographics,
        }
    }
}

pub struct MasterlistImporter;

impl MasterlistImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<PlacementSubmission>, MasterlistImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a registrar masterlist export. Rows without an LRN are skipped;
    /// everything else goes through the same grade/label coercion as the
    /// enrollment forms.
    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<PlacementSubmission>, MasterlistImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut submissions = Vec::new();
        for record in csv_reader.deserialize::<MasterlistRow>() {
            let row = record?;
            if row.lrn.trim().is_empty() {
                continue;
            }
            submissions.push(row.into_submission());
        }

        Ok(submissions)
    }
}

/// Count of students whose top recommendation landed on a program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramTally {
    pub program: Program,
    pub name: String,
    pub top_recommendations: usize,
}

/// One student line in the batch report.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementReportEntry {
    pub lrn: String,
    pub program: Program,
    pub score: u8,
    pub rule: &'static str,
}

/// Batch placement report over a masterlist import.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementReport {
    pub generated_on: NaiveDate,
    pub total_students: usize,
    pub program_tallies: Vec<ProgramTally>,
    pub entries: Vec<PlacementReportEntry>,
}

/// Rank every imported submission and tally top recommendations per
/// program. Tallies keep catalog order so repeated runs render identically.
pub fn placement_report(
    submissions: Vec<PlacementSubmission>,
    generated_on: NaiveDate,
) -> PlacementReport {
    let engine = PlacementEngine::new();
    let mut counts = vec![0usize; PROGRAM_CATALOG.len()];
    let mut entries = Vec::with_capacity(submissions.len());

    for submission in submissions {
        let profile = profile_from_submission(submission);
        let outcome = engine.evaluate(&profile);
        let Some(top) = outcome.top() else {
            continue;
        };

        if let Some(index) = PROGRAM_CATALOG
            .iter()
            .position(|entry| entry.code == top.program)
        {
            counts[index] += 1;
        }
        entries.push(PlacementReportEntry {
            lrn: profile.lrn,
            program: top.program,
            score: top.score,
            rule: outcome.rule.label(),
        });
    }

    let program_tallies = PROGRAM_CATALOG
        .iter()
        .zip(counts)
        .map(|(entry, top_recommendations)| ProgramTally {
            program: entry.code,
            name: entry.name.to_string(),
            top_recommendations,
        })
        .collect();

    PlacementReport {
        generated_on,
        total_students: entries.len(),
        program_tallies,
        entries,
    }
}
