use std::collections::BTreeMap;

use super::super::domain::{
    AbsenceBand, Activity, AssignmentsOnTime, DifficultLessonsResponse, DifficultyArea,
    DistanceBand, LearningStyle, Motivation, Program, StudyHours, Subject, SupportRequest,
    SurveyResponse, TravelDifficulty,
};

/// Point totals per program bucket accumulated from questionnaire answers.
///
/// Every rule is evaluated; contributions sum with no early exit, so the
/// totals are a pure function of the survey answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InterestScores {
    points: BTreeMap<Program, u32>,
}

impl InterestScores {
    pub(crate) fn points(&self, program: Program) -> u32 {
        self.points.get(&program).copied().unwrap_or(0)
    }

    fn add(&mut self, program: Program, amount: u32) {
        *self.points.entry(program).or_insert(0) += amount;
    }

    /// Programs with their totals, highest first; ties keep the bucket
    /// evaluation order.
    pub(crate) fn ranked(&self) -> Vec<(Program, u32)> {
        let mut entries: Vec<(Program, u32)> = Program::ALL
            .iter()
            .map(|program| (*program, self.points(*program)))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// The strongest bucket among `candidates`, or the first candidate when
    /// nothing scored.
    pub(crate) fn strongest_of(&self, candidates: &[Program]) -> Program {
        let mut best = candidates[0];
        let mut best_points = self.points(best);
        for candidate in &candidates[1..] {
            let points = self.points(*candidate);
            if points > best_points {
                best = *candidate;
                best_points = points;
            }
        }
        best
    }
}

/// Accumulate the interest totals for one survey response.
pub(crate) fn interest_scores(survey: &SurveyResponse) -> InterestScores {
    let mut scores = InterestScores::default();

    if let Some(program) = survey.interested_program {
        scores.add(program, 5);
        match survey.program_motivation {
            Motivation::High => scores.add(program, 2),
            Motivation::Moderate => scores.add(program, 1),
            Motivation::Low | Motivation::Unset => {}
        }
    }

    let subjects = &survey.enjoyed_subjects;
    if subjects.contains(&Subject::Mathematics) && subjects.contains(&Subject::Science) {
        scores.add(Program::Ste, 3);
    }
    if subjects.contains(&Subject::Mathematics) {
        scores.add(Program::Ste, 1);
    }
    if subjects.contains(&Subject::Science) {
        scores.add(Program::Ste, 1);
    }
    if subjects.contains(&Subject::English) {
        scores.add(Program::Spfl, 2);
    }
    if subjects.contains(&Subject::Filipino) {
        scores.add(Program::Spfl, 2);
    }
    if subjects.contains(&Subject::EdukasyonPangkabuhayan) {
        scores.add(Program::Sptve, 2);
    }
    if subjects.contains(&Subject::Mapeh) {
        scores.add(Program::Sptve, 1);
    }
    if subjects.contains(&Subject::AralingPanlipunan) {
        scores.add(Program::Top5, 1);
    }
    if subjects.contains(&Subject::EdukasyonSaPagpapakatao) {
        scores.add(Program::Top5, 1);
    }

    for activity in &survey.enjoyed_activities {
        match activity {
            Activity::ScienceExperiments => scores.add(Program::Ste, 2),
            Activity::ReadingAndWritingStories => scores.add(Program::Spfl, 2),
            Activity::LeadingGroups => scores.add(Program::Top5, 2),
            Activity::SportsAndGames => scores.add(Program::Regular, 1),
            Activity::BuildingOrFixing | Activity::ArtsAndCrafts => {}
        }
    }
    if survey.enjoyed_activities.iter().any(|a| a.is_hands_on()) {
        scores.add(Program::Sptve, 2);
    }

    match survey.study_hours {
        StudyHours::MoreThanThree => {
            scores.add(Program::Ste, 2);
            scores.add(Program::Top5, 1);
        }
        StudyHours::TwoToThree => scores.add(Program::Top5, 1),
        StudyHours::LessThanOne => scores.add(Program::Ohsp, 2),
        StudyHours::OneToTwo | StudyHours::Unset => {}
    }

    match survey.assignments_on_time {
        AssignmentsOnTime::Always => scores.add(Program::Top5, 2),
        AssignmentsOnTime::Rarely => scores.add(Program::Ohsp, 1),
        _ => {}
    }

    match survey.handle_difficult_lessons {
        DifficultLessonsResponse::StudyHarder => scores.add(Program::Ste, 1),
        DifficultLessonsResponse::AskForHelp => scores.add(Program::Regular, 1),
        DifficultLessonsResponse::GiveUp => scores.add(Program::Sned, 1),
        DifficultLessonsResponse::Unset => {}
    }

    if survey.offline_household() {
        scores.add(Program::Ohsp, 2);
    }

    match survey.absences {
        AbsenceBand::MoreThanTwenty => scores.add(Program::Ohsp, 3),
        AbsenceBand::ElevenToTwenty => scores.add(Program::Ohsp, 1),
        _ => {}
    }

    let difficulties = &survey.difficulty_areas;
    if difficulties.contains(&DifficultyArea::Focusing)
        || difficulties.contains(&DifficultyArea::SocialInteraction)
    {
        scores.add(Program::Sned, 3);
    }
    if difficulties.contains(&DifficultyArea::Reading)
        || difficulties.contains(&DifficultyArea::Writing)
    {
        scores.add(Program::Sned, 2);
    }

    if survey.extra_support == SupportRequest::Yes {
        scores.add(Program::Sned, 2);
    }

    if survey.distance_from_school == DistanceBand::MoreThanFiveKm {
        scores.add(Program::Ohsp, 1);
    }
    if survey.travel_difficulty == TravelDifficulty::Yes {
        scores.add(Program::Ohsp, 1);
    }

    match survey.learning_style {
        LearningStyle::Kinesthetic => scores.add(Program::Sptve, 2),
        LearningStyle::Mixed => scores.add(Program::Sptve, 1),
        LearningStyle::Visual => scores.add(Program::Ste, 1),
        LearningStyle::Auditory | LearningStyle::ReadingWriting => scores.add(Program::Spfl, 1),
        LearningStyle::Unset => {}
    }

    scores
}
