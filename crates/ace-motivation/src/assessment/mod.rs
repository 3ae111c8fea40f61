//! ACE questionnaire pipeline: question bank, scoring, archetype
//! classification, suggestion selection, report identifiers and the
//! store-backed service that ties them together.

pub mod classification;
pub mod comparison;
pub mod domain;
pub mod questions;
pub mod report_id;
pub mod responses;
pub mod result;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod suggestions;

#[cfg(test)]
mod tests;

pub use classification::{
    classify, classify_with_trace, weak_dimensions, Classification, MotivationType,
    MotivationTypeId, MOTIVATION_TYPES,
};
pub use comparison::{ConsistencyLevel, DimensionGap, PerceptionComparison};
pub use domain::{Dimension, DimensionScores, Priority, QuestionId, QuestionIdError, Role};
pub use questions::{Question, QuestionBank};
pub use report_id::{extract_timestamp, generate_report_id, is_valid_report_id};
pub use responses::{Completeness, RawResponses, ResponseError, ResponseSet};
pub use result::{CombinedResult, DimensionInsight, QuestionnaireResult, RadarPoint, ScoreBand};
pub use router::assessment_router;
pub use scoring::compute_scores;
pub use service::{AssessmentService, AssessmentServiceError, Completion, ReportLookup};
pub use store::{
    QuestionnaireProgress, ReportIndexEntry, ResultStore, StoreError, StoreKey,
};
pub use suggestions::{select_suggestions, Suggestion};
