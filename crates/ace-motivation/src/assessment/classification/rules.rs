use super::super::domain::{Dimension, DimensionScores};
use super::MotivationTypeId;

pub(crate) const ACHIEVER_TOTAL_STRENGTH: f64 = 0.8;
pub(crate) const HIGH_DIMENSION: f64 = 0.7;
pub(crate) const LOW_DIMENSION: f64 = 0.6;
pub(crate) const CHALLENGER_TOTAL_STRENGTH: f64 = 0.6;
/// Name reported by the trace when no rule matched.
pub(crate) const FALLBACK_RULE: &str = "fallback";

/// Named predicate mapping dimension scores to an archetype.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub archetype: MotivationTypeId,
    predicate: fn(&DimensionScores) -> bool,
}

impl ClassificationRule {
    pub fn matches(&self, scores: &DimensionScores) -> bool {
        (self.predicate)(scores)
    }
}

/// Evaluated top to bottom; the first match wins and Supporter is the fallback.
pub(crate) static RULES: [ClassificationRule; 5] = [
    ClassificationRule {
        name: "high_total_strength",
        archetype: MotivationTypeId::Achiever,
        predicate: high_total_strength,
    },
    ClassificationRule {
        name: "high_autonomy_and_engagement",
        archetype: MotivationTypeId::Dreamer,
        predicate: high_autonomy_and_engagement,
    },
    ClassificationRule {
        name: "high_engagement_low_competence",
        archetype: MotivationTypeId::Explorer,
        predicate: high_engagement_low_competence,
    },
    ClassificationRule {
        name: "high_competence_low_autonomy",
        archetype: MotivationTypeId::Builder,
        predicate: high_competence_low_autonomy,
    },
    ClassificationRule {
        name: "above_average_total",
        archetype: MotivationTypeId::Challenger,
        predicate: above_average_total,
    },
];

fn high_total_strength(scores: &DimensionScores) -> bool {
    scores.total_strength() >= ACHIEVER_TOTAL_STRENGTH
}

fn high_autonomy_and_engagement(scores: &DimensionScores) -> bool {
    scores.fraction(Dimension::Autonomy) >= HIGH_DIMENSION
        && scores.fraction(Dimension::Engagement) >= HIGH_DIMENSION
}

fn high_engagement_low_competence(scores: &DimensionScores) -> bool {
    scores.fraction(Dimension::Engagement) >= HIGH_DIMENSION
        && scores.fraction(Dimension::Competence) < LOW_DIMENSION
}

fn high_competence_low_autonomy(scores: &DimensionScores) -> bool {
    scores.fraction(Dimension::Competence) >= HIGH_DIMENSION
        && scores.fraction(Dimension::Autonomy) < LOW_DIMENSION
}

fn above_average_total(scores: &DimensionScores) -> bool {
    scores.total_strength() >= CHALLENGER_TOTAL_STRENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> ClassificationRule {
        RULES
            .iter()
            .copied()
            .find(|rule| rule.name == name)
            .unwrap_or_else(|| panic!("rule {name} missing"))
    }

    #[test]
    fn achiever_rule_uses_total_cutoff() {
        let rule = rule("high_total_strength");
        assert!(rule.matches(&DimensionScores::new(16, 16, 16)));
        assert!(!rule.matches(&DimensionScores::new(16, 16, 15)));
    }

    #[test]
    fn dreamer_rule_requires_both_dimensions() {
        let rule = rule("high_autonomy_and_engagement");
        assert!(rule.matches(&DimensionScores::new(14, 0, 14)));
        assert!(!rule.matches(&DimensionScores::new(14, 20, 13)));
    }

    #[test]
    fn explorer_rule_requires_low_competence() {
        let rule = rule("high_engagement_low_competence");
        assert!(rule.matches(&DimensionScores::new(0, 11, 14)));
        assert!(!rule.matches(&DimensionScores::new(0, 12, 14)));
    }

    #[test]
    fn builder_rule_requires_low_autonomy() {
        let rule = rule("high_competence_low_autonomy");
        assert!(rule.matches(&DimensionScores::new(11, 14, 0)));
        assert!(!rule.matches(&DimensionScores::new(12, 14, 0)));
    }

    #[test]
    fn challenger_rule_uses_lower_total_cutoff() {
        let rule = rule("above_average_total");
        assert!(rule.matches(&DimensionScores::new(12, 12, 12)));
        assert!(!rule.matches(&DimensionScores::new(12, 12, 11)));
    }
}
