use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{QuestionId, QuestionIdError, Role, MAX_RESPONSE_VALUE, MIN_RESPONSE_VALUE};

/// Untyped answers as they arrive from clients: question id text to value.
pub type RawResponses = BTreeMap<String, i64>;

/// Whether a response set must cover every item of its questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// In-progress answers saved between sessions.
    Partial,
    /// Answers submitted for scoring.
    Complete,
}

/// Validated answers keyed by question id, values in `1..=5`.
///
/// Every constructor, deserialization included, enforces the value range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<QuestionId, u8>",
    into = "BTreeMap<QuestionId, u8>"
)]
pub struct ResponseSet(BTreeMap<QuestionId, u8>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw client answers for `role`.
    ///
    /// Rejects unknown identifiers, identifiers from the other role's
    /// questionnaire and values outside the Likert range. With
    /// [`Completeness::Complete`] every item of the role must be answered.
    pub fn validate(
        raw: &RawResponses,
        role: Role,
        completeness: Completeness,
    ) -> Result<Self, ResponseError> {
        let mut responses = Self::new();
        for (raw_id, value) in raw {
            let id: QuestionId = raw_id.parse()?;
            if id.role() != role {
                return Err(ResponseError::RoleMismatch {
                    question: id,
                    expected: role,
                    found: id.role(),
                });
            }
            responses.record_checked(id, *value)?;
        }

        if completeness == Completeness::Complete {
            let missing = responses.missing(role);
            if !missing.is_empty() {
                return Err(ResponseError::MissingItems(missing));
            }
        }

        Ok(responses)
    }

    /// Collect already typed answers, rejecting values outside `1..=5`.
    pub fn from_answers<I>(answers: I) -> Result<Self, ResponseError>
    where
        I: IntoIterator<Item = (QuestionId, u8)>,
    {
        let mut responses = Self::new();
        for (id, value) in answers {
            responses.record(id, value)?;
        }
        Ok(responses)
    }

    /// Record or overwrite one answer.
    pub fn record(&mut self, id: QuestionId, value: u8) -> Result<(), ResponseError> {
        self.record_checked(id, i64::from(value))
    }

    fn record_checked(&mut self, id: QuestionId, value: i64) -> Result<(), ResponseError> {
        let in_range = i64::from(MIN_RESPONSE_VALUE)..=i64::from(MAX_RESPONSE_VALUE);
        if !in_range.contains(&value) {
            return Err(ResponseError::OutOfRange {
                question: id,
                value,
            });
        }
        self.0.insert(id, value as u8);
        Ok(())
    }

    pub fn value(&self, id: QuestionId) -> Option<u8> {
        self.0.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, u8)> + '_ {
        self.0.iter().map(|(id, value)| (*id, *value))
    }

    /// Role implied by the identifier namespace: any parent-prefixed id makes
    /// the set a parent set.
    pub fn detected_role(&self) -> Role {
        if self.0.keys().any(|id| id.role() == Role::Parent) {
            Role::Parent
        } else {
            Role::Student
        }
    }

    /// Items of `role` that have not been answered, in questionnaire order.
    pub fn missing(&self, role: Role) -> Vec<QuestionId> {
        QuestionId::all_for(role)
            .filter(|id| !self.0.contains_key(id))
            .collect()
    }

    pub fn is_complete(&self, role: Role) -> bool {
        self.missing(role).is_empty()
    }
}

impl TryFrom<BTreeMap<QuestionId, u8>> for ResponseSet {
    type Error = ResponseError;

    fn try_from(answers: BTreeMap<QuestionId, u8>) -> Result<Self, Self::Error> {
        Self::from_answers(answers)
    }
}

impl From<ResponseSet> for BTreeMap<QuestionId, u8> {
    fn from(responses: ResponseSet) -> Self {
        responses.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error(transparent)]
    UnknownQuestion(#[from] QuestionIdError),
    #[error("question {question} belongs to the {found} questionnaire, expected {expected}")]
    RoleMismatch {
        question: QuestionId,
        expected: Role,
        found: Role,
    },
    #[error("question {question} answered with {value}, expected 1..=5")]
    OutOfRange { question: QuestionId, value: i64 },
    #[error(
        "missing answers for {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    MissingItems(Vec<QuestionId>),
}
