mod survey;
mod tiers;

pub use tiers::PlacementRule;

pub(crate) use survey::{interest_scores, InterestScores};

use serde::{Deserialize, Serialize};

use super::catalog::definition;
use super::domain::{PlacementId, Program, StudentProfile};
use tiers::ProgramPick;

const SCORE_FLOOR: i32 = 60;
const SCORE_CEILING: i32 = 100;
const FALLBACK_REASON: &str = "Eligible based on provided data";

/// Stateless ranking engine. Rankings are a pure function of the profile and
/// the static program catalog, so one engine can serve concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementEngine;

impl PlacementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Rank the section programs for a profile. The list is non-empty,
    /// sorted by score descending (ties keep rule order), and every entry
    /// carries at least one reason.
    pub fn rank(&self, profile: &StudentProfile) -> Vec<ProgramRecommendation> {
        self.evaluate(profile).recommendations
    }

    /// Rank and report which decision rule fired, keyed by the profile's
    /// placement id for persistence.
    pub fn evaluate(&self, profile: &StudentProfile) -> PlacementOutcome {
        let interest = interest_scores(&profile.survey);
        let decision = tiers::decide(profile, &interest);

        let mut recommendations: Vec<ProgramRecommendation> = decision
            .picks
            .into_iter()
            .map(materialize)
            .collect();
        recommendations.sort_by(|a, b| b.score.cmp(&a.score));

        PlacementOutcome {
            placement_id: profile.placement_id.clone(),
            rule: decision.rule,
            recommendations,
        }
    }
}

fn materialize(pick: ProgramPick) -> ProgramRecommendation {
    let entry = definition(pick.program);
    let score = pick.score.clamp(SCORE_FLOOR, SCORE_CEILING) as u8;
    let reasons = if pick.reasons.is_empty() {
        vec![FALLBACK_REASON.to_string()]
    } else {
        pick.reasons
    };

    ProgramRecommendation {
        program: pick.program,
        name: entry.name.to_string(),
        description: entry.description.to_string(),
        icon: entry.icon.to_string(),
        color: entry.color.to_string(),
        score,
        reasons,
    }
}

/// One ranked program with the display metadata the portal renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRecommendation {
    pub program: Program,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Evaluation output describing the fired rule and the ranked programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    pub placement_id: PlacementId,
    pub rule: PlacementRule,
    pub recommendations: Vec<ProgramRecommendation>,
}

impl PlacementOutcome {
    pub fn top(&self) -> Option<&ProgramRecommendation> {
        self.recommendations.first()
    }
}
