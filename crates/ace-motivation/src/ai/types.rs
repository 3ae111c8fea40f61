use serde::{Deserialize, Serialize};

use crate::assessment::domain::{Dimension, DimensionScores, MAX_DIMENSION_SCORE};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one kind of request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

pub const CHAT_SETTINGS: CompletionSettings = CompletionSettings {
    max_tokens: 800,
    temperature: Some(0.8),
};

pub const EVALUATION_SETTINGS: CompletionSettings = CompletionSettings {
    max_tokens: 1500,
    temperature: Some(0.7),
};

pub const PROBE_SETTINGS: CompletionSettings = CompletionSettings {
    max_tokens: 10,
    temperature: None,
};

/// Body of a chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        messages: Vec<ChatMessage>,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Optional respondent background sent along with a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentContext {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub autonomy: Option<u8>,
    #[serde(default)]
    pub competence: Option<u8>,
    #[serde(default)]
    pub engagement: Option<u8>,
    #[serde(default, alias = "motivationType")]
    pub motivation_type: Option<String>,
}

impl StudentContext {
    /// Scores with absent dimensions treated as 0.
    pub fn scores(&self) -> DimensionScores {
        DimensionScores::new(
            self.autonomy.unwrap_or_default(),
            self.competence.unwrap_or_default(),
            self.engagement.unwrap_or_default(),
        )
    }

    pub(crate) fn has_scores(&self) -> bool {
        self.autonomy.is_some() || self.competence.is_some() || self.engagement.is_some()
    }

    /// Supplied scores must lie within `0..=20`.
    pub fn validate(&self) -> Result<(), AiInputError> {
        check_scores("student_context", &self.scores())
    }
}

/// Inputs for the student/parent expert evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertEvaluationInput {
    pub student_name: String,
    pub student_ace: DimensionScores,
    pub parent_ace: DimensionScores,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub student_motivation_type: Option<String>,
    #[serde(default)]
    pub parent_motivation_type: Option<String>,
}

impl ExpertEvaluationInput {
    /// Requires a student name and scores within `0..=20`.
    pub fn validate(&self) -> Result<(), AiInputError> {
        if self.student_name.trim().is_empty() {
            return Err(AiInputError::BlankStudentName);
        }
        check_scores("student_ace", &self.student_ace)?;
        check_scores("parent_ace", &self.parent_ace)
    }
}

fn check_scores(field: &'static str, scores: &DimensionScores) -> Result<(), AiInputError> {
    match Dimension::ALL
        .into_iter()
        .find(|dimension| scores.get(*dimension) > MAX_DIMENSION_SCORE)
    {
        Some(dimension) => Err(AiInputError::ScoreOutOfRange {
            field,
            dimension,
            value: scores.get(dimension),
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiInputError {
    #[error("student_name must not be blank")]
    BlankStudentName,
    #[error("{field}.{} is {value}, expected 0..=20", .dimension.label().to_lowercase())]
    ScoreOutOfRange {
        field: &'static str,
        dimension: Dimension,
        value: u8,
    },
}

/// Text produced by the adapter, flagged when it came from a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiReply {
    pub text: String,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl AiReply {
    pub fn live(text: String) -> Self {
        Self {
            text,
            degraded: false,
            fallback_reason: None,
        }
    }

    pub fn fallback(text: String, reason: impl Into<String>) -> Self {
        Self {
            text,
            degraded: true,
            fallback_reason: Some(reason.into()),
        }
    }
}

/// Bucket of an absolute student/parent score difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceLevel {
    None,
    Small,
    Moderate,
    Large,
}

impl DifferenceLevel {
    /// `none` up to 2 points, `small` up to 4, `moderate` up to 6, else `large`.
    pub const fn from_difference(difference: u8) -> Self {
        match difference {
            0..=2 => Self::None,
            3..=4 => Self::Small,
            5..=6 => Self::Moderate,
            _ => Self::Large,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Small => "small",
            Self::Moderate => "moderate",
            Self::Large => "large",
        }
    }

    pub const fn is_significant(self) -> bool {
        matches!(self, Self::Moderate | Self::Large)
    }
}
