use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{self, by_id, MotivationType};
use super::comparison::{compare_perceptions, PerceptionComparison};
use super::domain::{Dimension, DimensionScores, Role, MAX_DIMENSION_SCORE};
use super::responses::ResponseSet;
use super::scoring::compute_scores;
use super::suggestions::{by_ids, select_suggestions, Suggestion};

/// One axis of the radar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub dimension: Dimension,
    pub label: String,
    pub score: u8,
    pub full_mark: u8,
}

pub fn radar_series(scores: &DimensionScores) -> Vec<RadarPoint> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| RadarPoint {
            dimension,
            label: dimension.label().to_string(),
            score: scores.get(dimension),
            full_mark: MAX_DIMENSION_SCORE,
        })
        .collect()
}

/// Qualitative band of a single dimension score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Developing,
    Emerging,
}

impl ScoreBand {
    /// Bands start at 16, 12 and 8 points.
    pub const fn for_score(score: u8) -> Self {
        match score {
            16..=u8::MAX => Self::Strong,
            12..=15 => Self::Moderate,
            8..=11 => Self::Developing,
            _ => Self::Emerging,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Strong => 0,
            Self::Moderate => 1,
            Self::Developing => 2,
            Self::Emerging => 3,
        }
    }
}

/// Description and typical behavior for a dimension at a given band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionInsight {
    pub dimension: Dimension,
    pub score: u8,
    pub band: ScoreBand,
    pub description: String,
    pub behavior: String,
}

// (description, behavior) per dimension, indexed by band.
const BAND_TEXT: [[(&str, &str); 4]; 3] = [
    [
        (
            "Shows strong autonomy, actively planning and steering their own learning",
            "Sets their own study plans, seeks out resources and makes their own choices about what to learn",
        ),
        (
            "Has a fair degree of autonomy with room to grow in some areas",
            "Studies independently most of the time but occasionally needs reminders",
        ),
        (
            "Autonomy is at a middling level; self-management needs strengthening",
            "Shows some independence on familiar tasks but leans on others when facing new challenges",
        ),
        (
            "Plenty of room to grow in autonomy; start with small goals to build independent habits",
            "Relies mainly on others to organise and prompt learning and rarely plans it themselves",
        ),
    ],
    [
        (
            "Very confident in their ability to learn and meets challenges positively",
            "Stays positive when learning gets hard and believes effort will pay off",
        ),
        (
            "Fairly confident overall, though less sure in some subjects",
            "Confident in strong subjects but hesitant in unfamiliar ones",
        ),
        (
            "Confidence is at a middling level; more experiences of success will help",
            "Needs encouragement to stay confident and small setbacks cause self-doubt",
        ),
        (
            "Confidence needs building; start with simple tasks that create a sense of achievement",
            "Often doubts their ability, gives up easily and needs more support and encouragement",
        ),
    ],
    [
        (
            "Enthusiastic about learning and deeply absorbed in it",
            "Joins class discussions and keeps thinking about and exploring topics after class",
        ),
        (
            "Interested in learning, though engagement varies with the material",
            "Active on topics of interest but less involved in others",
        ),
        (
            "Engagement is at a middling level; finding more enjoyment in learning will help",
            "Completes assigned work but rarely explores further or asks questions",
        ),
        (
            "Interest and engagement are low; discovering why learning matters is the next step",
            "Easily distracted and needs outside incentives to stay focused",
        ),
    ],
];

pub fn dimension_insights(scores: &DimensionScores) -> Vec<DimensionInsight> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let score = scores.get(dimension);
            let band = ScoreBand::for_score(score);
            let (description, behavior) = BAND_TEXT[dimension.ordinal()][band.slot()];
            DimensionInsight {
                dimension,
                score,
                band,
                description: description.to_string(),
                behavior: behavior.to_string(),
            }
        })
        .collect()
}

/// Everything produced by one completed questionnaire pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireResult {
    pub report_id: String,
    pub user_id: String,
    pub role: Role,
    pub responses: ResponseSet,
    pub scores: DimensionScores,
    #[serde(with = "by_id")]
    pub motivation_type: &'static MotivationType,
    pub matched_rule: String,
    pub weak_dimensions: BTreeSet<Dimension>,
    #[serde(with = "by_ids")]
    pub suggestions: Vec<&'static Suggestion>,
    pub radar: Vec<RadarPoint>,
    pub dimension_insights: Vec<DimensionInsight>,
    pub created_at: DateTime<Utc>,
}

impl QuestionnaireResult {
    /// Run scoring, classification and suggestion selection over `responses`.
    pub fn assemble(
        report_id: String,
        user_id: String,
        role: Role,
        responses: ResponseSet,
        created_at: DateTime<Utc>,
    ) -> Self {
        let scores = compute_scores(&responses, Some(role));
        let classification = classification::classify_with_trace(&scores);
        let weak_dimensions = classification::weak_dimensions(&scores);
        let suggestions =
            select_suggestions(classification.motivation_type.id, &weak_dimensions);

        Self {
            report_id,
            user_id,
            role,
            responses,
            radar: radar_series(&scores),
            dimension_insights: dimension_insights(&scores),
            scores,
            motivation_type: classification.motivation_type,
            matched_rule: classification.rule.to_string(),
            weak_dimensions,
            suggestions,
            created_at,
        }
    }
}

/// Student and parent results paired under the student's report id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub report_id: String,
    pub student: QuestionnaireResult,
    pub parent: QuestionnaireResult,
    pub comparison: PerceptionComparison,
    pub created_at: DateTime<Utc>,
}

impl CombinedResult {
    pub fn new(
        student: QuestionnaireResult,
        parent: QuestionnaireResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        let comparison = compare_perceptions(
            &student.scores,
            student.motivation_type,
            &parent.scores,
            parent.motivation_type,
        );
        Self {
            report_id: student.report_id.clone(),
            student,
            parent,
            comparison,
            created_at,
        }
    }
}
