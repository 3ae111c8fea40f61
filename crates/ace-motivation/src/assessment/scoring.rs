use super::domain::{
    Dimension, DimensionScores, QuestionId, Role, ITEMS_PER_DIMENSION, MAX_DIMENSION_SCORE,
};
use super::responses::ResponseSet;

/// Sum the four items of each dimension into [`DimensionScores`].
///
/// The role is taken from `role` when given, otherwise inferred from the
/// identifier namespace of `responses`. Unanswered items count as 0 and each
/// sum is capped at 20.
pub fn compute_scores(responses: &ResponseSet, role: Option<Role>) -> DimensionScores {
    let role = role.unwrap_or_else(|| responses.detected_role());

    let sum = |dimension: Dimension| -> u8 {
        let total: u16 = (1..=ITEMS_PER_DIMENSION)
            .filter_map(|index| QuestionId::new(role, dimension, index).ok())
            .filter_map(|id| responses.value(id))
            .map(u16::from)
            .sum();
        u8::try_from(total.min(u16::from(MAX_DIMENSION_SCORE))).unwrap_or(MAX_DIMENSION_SCORE)
    };

    DimensionScores::new(
        sum(Dimension::Autonomy),
        sum(Dimension::Competence),
        sum(Dimension::Engagement),
    )
}
