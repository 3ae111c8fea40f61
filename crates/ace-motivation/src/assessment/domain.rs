use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of questionnaire items that feed each dimension.
pub const ITEMS_PER_DIMENSION: u8 = 4;
pub const MIN_RESPONSE_VALUE: u8 = 1;
pub const MAX_RESPONSE_VALUE: u8 = 5;
/// 4 items x 5 points.
pub const MAX_DIMENSION_SCORE: u8 = ITEMS_PER_DIMENSION * MAX_RESPONSE_VALUE;
pub const MAX_TOTAL_SCORE: u16 = MAX_DIMENSION_SCORE as u16 * 3;

/// The three psychological dimensions of the ACE model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Autonomy,
    Competence,
    Engagement,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Autonomy, Self::Competence, Self::Engagement];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Autonomy => "Autonomy",
            Self::Competence => "Competence",
            Self::Engagement => "Engagement",
        }
    }

    pub(crate) const fn ordinal(self) -> usize {
        match self {
            Self::Autonomy => 0,
            Self::Competence => 1,
            Self::Engagement => 2,
        }
    }

    const fn code(self) -> char {
        match self {
            Self::Autonomy => 'A',
            Self::Competence => 'C',
            Self::Engagement => 'E',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Self::Autonomy),
            'C' => Some(Self::Competence),
            'E' => Some(Self::Engagement),
            _ => None,
        }
    }
}

/// Who answered the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Parent,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Parent => "Parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "parent" => Ok(Self::Parent),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown respondent role '{0}', expected 'student' or 'parent'")]
pub struct UnknownRole(pub String);

/// Closed identifier of a questionnaire item.
///
/// The textual form is `[P]{A|C|E}{1..4}`: the `P` prefix marks the
/// parent-phrased set, the letter names the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId {
    role: Role,
    dimension: Dimension,
    index: u8,
}

impl QuestionId {
    pub fn new(role: Role, dimension: Dimension, index: u8) -> Result<Self, QuestionIdError> {
        if !(1..=ITEMS_PER_DIMENSION).contains(&index) {
            return Err(QuestionIdError::IndexOutOfRange(index));
        }
        Ok(Self {
            role,
            dimension,
            index,
        })
    }

    pub const fn role(self) -> Role {
        self.role
    }

    pub const fn dimension(self) -> Dimension {
        self.dimension
    }

    pub const fn index(self) -> u8 {
        self.index
    }

    /// All item identifiers for one role, grouped by dimension in A, C, E order.
    pub fn all_for(role: Role) -> impl Iterator<Item = QuestionId> {
        Dimension::ALL.into_iter().flat_map(move |dimension| {
            (1..=ITEMS_PER_DIMENSION).map(move |index| QuestionId {
                role,
                dimension,
                index,
            })
        })
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.role == Role::Parent {
            f.write_str("P")?;
        }
        write!(f, "{}{}", self.dimension.code(), self.index)
    }
}

impl FromStr for QuestionId {
    type Err = QuestionIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || QuestionIdError::Unknown(raw.to_string());

        let (role, rest) = match raw.strip_prefix('P') {
            Some(rest) => (Role::Parent, rest),
            None => (Role::Student, raw),
        };

        let mut chars = rest.chars();
        let dimension = chars
            .next()
            .and_then(Dimension::from_code)
            .ok_or_else(unknown)?;
        let digits = chars.as_str();
        if digits.len() != 1 {
            return Err(unknown());
        }
        let index = digits.parse::<u8>().map_err(|_| unknown())?;

        QuestionId::new(role, dimension, index).map_err(|_| unknown())
    }
}

impl TryFrom<String> for QuestionId {
    type Error = QuestionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestionId> for String {
    fn from(value: QuestionId) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionIdError {
    #[error("unknown question id '{0}'")]
    Unknown(String),
    #[error("question index {0} outside 1..=4")]
    IndexOutOfRange(u8),
}

/// Per-dimension sums, each in `0..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DimensionScores {
    pub autonomy: u8,
    pub competence: u8,
    pub engagement: u8,
}

impl DimensionScores {
    pub const fn new(autonomy: u8, competence: u8, engagement: u8) -> Self {
        Self {
            autonomy,
            competence,
            engagement,
        }
    }

    pub const fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Autonomy => self.autonomy,
            Dimension::Competence => self.competence,
            Dimension::Engagement => self.engagement,
        }
    }

    pub fn total(&self) -> u16 {
        self.autonomy as u16 + self.competence as u16 + self.engagement as u16
    }

    /// Share of the dimension maximum, `score / 20`.
    pub fn fraction(&self, dimension: Dimension) -> f64 {
        f64::from(self.get(dimension)) / f64::from(MAX_DIMENSION_SCORE)
    }

    /// Share of the overall maximum, `total / 60`.
    pub fn total_strength(&self) -> f64 {
        f64::from(self.total()) / f64::from(MAX_TOTAL_SCORE)
    }

    /// Dimension with the highest score; ties resolve in A, C, E order.
    pub fn strongest(&self) -> Dimension {
        Dimension::ALL
            .into_iter()
            .fold(Dimension::Autonomy, |best, candidate| {
                if self.get(candidate) > self.get(best) {
                    candidate
                } else {
                    best
                }
            })
    }
}

/// Suggestion ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}
