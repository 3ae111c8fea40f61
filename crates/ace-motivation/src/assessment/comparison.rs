use serde::{Deserialize, Serialize};

use super::classification::{MotivationType, MotivationTypeId};
use super::domain::{Dimension, DimensionScores};

/// Per-dimension gap above which the comparison calls out a difference.
const NOTABLE_DIMENSION_GAP: u8 = 3;
/// Average gap above which professional guidance is recommended.
const GUIDANCE_AVERAGE_GAP: f64 = 4.0;

/// How closely the student's self-assessment matches the parent's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    HighlyConsistent,
    BroadlyConsistent,
    Divergent,
    StronglyDivergent,
}

impl ConsistencyLevel {
    /// Bucket an average per-dimension difference: 2, 4 and 6 are the upper
    /// bounds of the first three levels.
    pub fn from_average(average_difference: f64) -> Self {
        if average_difference <= 2.0 {
            Self::HighlyConsistent
        } else if average_difference <= 4.0 {
            Self::BroadlyConsistent
        } else if average_difference <= 6.0 {
            Self::Divergent
        } else {
            Self::StronglyDivergent
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighlyConsistent => "Highly consistent",
            Self::BroadlyConsistent => "Broadly consistent",
            Self::Divergent => "Divergent",
            Self::StronglyDivergent => "Strongly divergent",
        }
    }

    pub const fn is_consistent(self) -> bool {
        matches!(self, Self::HighlyConsistent | Self::BroadlyConsistent)
    }

    const fn description(self) -> &'static str {
        match self {
            Self::HighlyConsistent => "Parent and student see the student's motivation in very similar terms, which points to good communication and understanding.",
            Self::BroadlyConsistent => "Parent and student views broadly agree; the small differences are normal.",
            Self::Divergent => "Parent and student see the student's motivation somewhat differently; more communication would help.",
            Self::StronglyDivergent => "Parent and student views differ markedly; an in-depth conversation about how each really sees things is recommended.",
        }
    }
}

/// Student and parent scores for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionGap {
    pub dimension: Dimension,
    pub student: u8,
    pub parent: u8,
    pub difference: u8,
    pub full_mark: u8,
}

/// Student-versus-parent perception analysis attached to a combined result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionComparison {
    pub gaps: Vec<DimensionGap>,
    pub average_difference: f64,
    pub consistency: ConsistencyLevel,
    pub type_match: bool,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

pub(crate) fn compare_perceptions(
    student_scores: &DimensionScores,
    student_type: &MotivationType,
    parent_scores: &DimensionScores,
    parent_type: &MotivationType,
) -> PerceptionComparison {
    let gaps: Vec<DimensionGap> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let student = student_scores.get(dimension);
            let parent = parent_scores.get(dimension);
            DimensionGap {
                dimension,
                student,
                parent,
                difference: student.abs_diff(parent),
                full_mark: super::domain::MAX_DIMENSION_SCORE,
            }
        })
        .collect();

    let average_difference =
        gaps.iter().map(|gap| f64::from(gap.difference)).sum::<f64>() / gaps.len() as f64;
    let consistency = ConsistencyLevel::from_average(average_difference);
    let type_match = student_type.id == parent_type.id;

    let mut insights = vec![consistency.description().to_string()];
    if type_match {
        insights.push(format!(
            "Parent and student both see the student as a \"{}\"; this shared view makes it easier to plan effective support.",
            student_type.name
        ));
    } else {
        insights.push(format!(
            "The student identifies as a \"{}\" while the parent sees a \"{}\". The gap may come from different vantage points; observing concrete behavior together can build agreement.",
            student_type.name, parent_type.name
        ));
    }

    let dimension_insights: Vec<String> = gaps
        .iter()
        .filter(|gap| gap.difference > NOTABLE_DIMENSION_GAP)
        .map(|gap| dimension_gap_insight(gap).to_string())
        .collect();
    if dimension_insights.is_empty() {
        insights.push(
            "Across every dimension the two views are close, showing a good shared understanding of how learning is going."
                .to_string(),
        );
    } else {
        insights.extend(dimension_insights);
    }

    let mut recommendations = Vec::new();
    if consistency.is_consistent() {
        recommendations.push(
            "**Keep communicating**: maintain the current pattern and regularly share feelings and observations about learning."
                .to_string(),
        );
        if type_match {
            recommendations.push(format!(
                "**Play to the shared type**: build a development plan around the \"{}\" traits you both recognise.",
                student_type.name
            ));
        }
    } else {
        recommendations.push(
            "**Deepen communication**: set aside time each week for the student to share how they really feel and for the parent to share observations."
                .to_string(),
        );
        recommendations.push(
            "**Keep an observation log**: record concrete learning behavior to help both sides form a more accurate picture."
                .to_string(),
        );
    }
    recommendations.push(type_recommendation(student_type.id).to_string());
    recommendations.push(
        "**Create a supportive environment**: foster a positive atmosphere that values effort and progress, not just results."
            .to_string(),
    );
    if average_difference > GUIDANCE_AVERAGE_GAP {
        recommendations.push(
            "**Seek professional guidance**: if the differences persist, consult an educational psychologist for a more personalised plan."
                .to_string(),
        );
    }

    PerceptionComparison {
        gaps,
        average_difference,
        consistency,
        type_match,
        insights,
        recommendations,
    }
}

fn dimension_gap_insight(gap: &DimensionGap) -> &'static str {
    let student_higher = gap.student > gap.parent;
    match (gap.dimension, student_higher) {
        (Dimension::Autonomy, true) => "**Autonomy gap**: the student sees themselves as more self-directed; parents can watch for and acknowledge independent learning.",
        (Dimension::Autonomy, false) => "**Autonomy gap**: the parent rates the child's autonomy above the self-assessment; the student may need help building a stronger sense of ownership.",
        (Dimension::Competence, true) => "**Competence gap**: the student is fairly confident in their ability; parents can affirm and encourage it more often.",
        (Dimension::Competence, false) => "**Competence gap**: the parent rates the child's ability highly; the student needs help building self-confidence.",
        (Dimension::Engagement, true) => "**Engagement gap**: the student feels highly engaged; parents can pay more attention to the learning process and effort.",
        (Dimension::Engagement, false) => "**Engagement gap**: the parent sees more engagement than the student feels; it is worth finding out how the student really experiences learning.",
    }
}

fn type_recommendation(motivation_type: MotivationTypeId) -> &'static str {
    match motivation_type {
        MotivationTypeId::Dreamer => "**Balance ideals and reality**: help break big goals into concrete steps so ambition turns into action.",
        MotivationTypeId::Achiever => "**Broad, balanced growth**: keep up the strong performance while exploring new areas, without the pressure of perfectionism.",
        MotivationTypeId::Explorer => "**Depth as well as breadth**: support wide exploration while guiding deeper study in the areas of greatest interest.",
        MotivationTypeId::Builder => "**Grow inner motivation**: gradually reduce outside control and build self-driven learning through interests and achievement.",
        MotivationTypeId::Challenger => "**Strengthen and fill gaps**: use existing strengths while deliberately lifting the weaker motivation dimensions.",
        MotivationTypeId::Supporter => "**Build confidence and interest**: discover and nurture interests to grow confidence and inner motivation step by step.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(student: DimensionScores, parent: DimensionScores) -> PerceptionComparison {
        compare_perceptions(
            &student,
            MotivationTypeId::Challenger.profile(),
            &parent,
            MotivationTypeId::Challenger.profile(),
        )
    }

    #[test]
    fn consistency_levels_follow_average_cutoffs() {
        assert_eq!(ConsistencyLevel::from_average(2.0), ConsistencyLevel::HighlyConsistent);
        assert_eq!(ConsistencyLevel::from_average(2.1), ConsistencyLevel::BroadlyConsistent);
        assert_eq!(ConsistencyLevel::from_average(4.0), ConsistencyLevel::BroadlyConsistent);
        assert_eq!(ConsistencyLevel::from_average(6.0), ConsistencyLevel::Divergent);
        assert_eq!(ConsistencyLevel::from_average(6.5), ConsistencyLevel::StronglyDivergent);
    }

    #[test]
    fn identical_views_are_highly_consistent() {
        let scores = DimensionScores::new(12, 13, 14);
        let comparison = compare(scores, scores);

        assert_eq!(comparison.consistency, ConsistencyLevel::HighlyConsistent);
        assert_eq!(comparison.average_difference, 0.0);
        assert!(comparison.type_match);
        assert!(comparison.insights[2].starts_with("Across every dimension"));
        assert!(comparison.recommendations[1].contains("Challenger"));
        assert!(!comparison
            .recommendations
            .iter()
            .any(|line| line.contains("professional guidance")));
    }

    #[test]
    fn large_gaps_call_out_direction_and_guidance() {
        let comparison = compare(
            DimensionScores::new(18, 10, 12),
            DimensionScores::new(10, 16, 12),
        );

        assert_eq!(comparison.gaps[0].difference, 8);
        assert_eq!(comparison.gaps[1].difference, 6);
        assert!((comparison.average_difference - 14.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(comparison.consistency, ConsistencyLevel::Divergent);
        assert!(comparison.insights[2].contains("student sees themselves as more self-directed"));
        assert!(comparison.insights[3].contains("parent rates the child's ability"));
        assert!(comparison
            .recommendations
            .iter()
            .any(|line| line.starts_with("**Seek professional guidance**")));
    }

    #[test]
    fn gaps_of_three_are_not_notable() {
        let comparison = compare(
            DimensionScores::new(10, 10, 10),
            DimensionScores::new(13, 7, 13),
        );
        assert_eq!(comparison.insights.len(), 3);
    }
}
