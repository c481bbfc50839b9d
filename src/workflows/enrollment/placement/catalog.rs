use serde::Serialize;

use super::domain::{Program, Subject};

/// Static description of a section program, including the display metadata
/// the portal renders and the legacy weighted-model thresholds kept for the
/// program detail views.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramDefinition {
    pub code: Program,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Minimum qualifying overall average shown on program details.
    pub minimum_score: u8,
    /// Weight of the overall average in the legacy match display.
    pub overall_weight: f32,
    /// Subject emphasis shown on program details.
    pub subject_weights: &'static [(Subject, f32)],
}

pub static PROGRAM_CATALOG: [ProgramDefinition; 7] = [
    ProgramDefinition {
        code: Program::Ste,
        name: "STE (Science, Technology and Engineering)",
        description: "Focuses on science, technology, engineering, and mathematics through hands-on learning and research-based activities.",
        icon: "\u{1F52C}",
        color: "blue",
        minimum_score: 85,
        overall_weight: 0.20,
        subject_weights: &[
            (Subject::Mathematics, 0.30),
            (Subject::Science, 0.30),
            (Subject::English, 0.15),
        ],
    },
    ProgramDefinition {
        code: Program::Spfl,
        name: "SPFL (Special Program in Foreign Language)",
        description: "Enhances communication skills through foreign language learning, particularly Chinese.",
        icon: "\u{1F5E3}\u{FE0F}",
        color: "purple",
        minimum_score: 82,
        overall_weight: 0.15,
        subject_weights: &[
            (Subject::English, 0.35),
            (Subject::Filipino, 0.30),
            (Subject::AralingPanlipunan, 0.20),
        ],
    },
    ProgramDefinition {
        code: Program::Sptve,
        name: "SPTVE (Special Program in Technical-Vocational Education)",
        description: "Provides practical skills and knowledge in various technical and vocational fields.",
        icon: "\u{1F527}",
        color: "orange",
        minimum_score: 78,
        overall_weight: 0.25,
        subject_weights: &[
            (Subject::EdukasyonPangkabuhayan, 0.35),
            (Subject::Mapeh, 0.30),
        ],
    },
    ProgramDefinition {
        code: Program::Ohsp,
        name: "OHSP (Open High School Program)",
        description: "Flexible learning program for working students and those who need alternative schedules.",
        icon: "\u{1F4DA}",
        color: "teal",
        minimum_score: 75,
        overall_weight: 1.0,
        subject_weights: &[],
    },
    ProgramDefinition {
        code: Program::Sned,
        name: "SNED (Special Needs Education)",
        description: "Specialized program designed for students with special educational needs, providing tailored support and learning approaches.",
        icon: "\u{1F91D}",
        color: "green",
        minimum_score: 75,
        overall_weight: 1.0,
        subject_weights: &[],
    },
    ProgramDefinition {
        code: Program::Top5,
        name: "Top Five Honors Section",
        description: "Heterogeneous section reserved for the highest-performing applicants across all subjects.",
        icon: "\u{2B50}",
        color: "red",
        minimum_score: 85,
        overall_weight: 0.60,
        subject_weights: &[
            (Subject::Mathematics, 0.10),
            (Subject::Science, 0.10),
            (Subject::English, 0.10),
            (Subject::Filipino, 0.10),
        ],
    },
    ProgramDefinition {
        code: Program::Regular,
        name: "Regular Heterogeneous Section",
        description: "Standard academic section providing comprehensive basic education curriculum.",
        icon: "\u{1F4D6}",
        color: "gray",
        minimum_score: 70,
        overall_weight: 0.60,
        subject_weights: &[],
    },
];

/// Look up the static definition for a program.
pub fn definition(program: Program) -> &'static ProgramDefinition {
    PROGRAM_CATALOG
        .iter()
        .find(|entry| entry.code == program)
        .unwrap_or(&PROGRAM_CATALOG[6])
}
