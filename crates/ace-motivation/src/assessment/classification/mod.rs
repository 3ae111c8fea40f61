mod catalog;
mod rules;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{Dimension, DimensionScores};

pub use catalog::{MotivationType, MOTIVATION_TYPES};
pub(crate) use catalog::by_id;
pub use rules::ClassificationRule;
use rules::{FALLBACK_RULE, LOW_DIMENSION, RULES};

/// Threshold below which a dimension counts as weak, as a share of 20.
pub const WEAK_DIMENSION_THRESHOLD: f64 = LOW_DIMENSION;

/// Identifier of one of the six motivation archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationTypeId {
    Dreamer,
    Achiever,
    Explorer,
    Builder,
    Challenger,
    Supporter,
}

impl MotivationTypeId {
    pub const ALL: [MotivationTypeId; 6] = [
        Self::Dreamer,
        Self::Achiever,
        Self::Explorer,
        Self::Builder,
        Self::Challenger,
        Self::Supporter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dreamer => "dreamer",
            Self::Achiever => "achiever",
            Self::Explorer => "explorer",
            Self::Builder => "builder",
            Self::Challenger => "challenger",
            Self::Supporter => "supporter",
        }
    }

    /// Catalog entry for this archetype.
    pub fn profile(self) -> &'static MotivationType {
        let slot = match self {
            Self::Dreamer => 0,
            Self::Achiever => 1,
            Self::Explorer => 2,
            Self::Builder => 3,
            Self::Challenger => 4,
            Self::Supporter => 5,
        };
        &MOTIVATION_TYPES[slot]
    }
}

impl fmt::Display for MotivationTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotivationTypeId {
    type Err = UnknownMotivationType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| UnknownMotivationType(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown motivation type '{0}'")]
pub struct UnknownMotivationType(pub String);

/// Classification outcome together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub motivation_type: &'static MotivationType,
    pub rule: &'static str,
}

/// Map dimension scores to exactly one archetype.
pub fn classify(scores: &DimensionScores) -> &'static MotivationType {
    classify_with_trace(scores).motivation_type
}

pub fn classify_with_trace(scores: &DimensionScores) -> Classification {
    RULES
        .iter()
        .find(|rule| rule.matches(scores))
        .map(|rule| Classification {
            motivation_type: rule.archetype.profile(),
            rule: rule.name,
        })
        .unwrap_or(Classification {
            motivation_type: MotivationTypeId::Supporter.profile(),
            rule: FALLBACK_RULE,
        })
}

/// The ordered rule table, exposed for diagnostics.
pub fn classification_rules() -> &'static [ClassificationRule] {
    &RULES
}

/// Dimensions scoring below 60% of their maximum.
pub fn weak_dimensions(scores: &DimensionScores) -> BTreeSet<Dimension> {
    Dimension::ALL
        .into_iter()
        .filter(|dimension| scores.fraction(*dimension) < WEAK_DIMENSION_THRESHOLD)
        .collect()
}
