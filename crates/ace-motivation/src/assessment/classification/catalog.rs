use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::MotivationTypeId;

/// Immutable archetype catalog entry.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct MotivationType {
    pub id: MotivationTypeId,
    pub name: &'static str,
    pub description: &'static str,
    pub characteristics: &'static [&'static str],
    pub strengths: &'static [&'static str],
    pub challenges: &'static [&'static str],
    pub icon: &'static str,
}

pub static MOTIVATION_TYPES: [MotivationType; 6] = [
    MotivationType {
        id: MotivationTypeId::Dreamer,
        name: "Dreamer",
        description: "Strong inner drive and big goals, but follow-through may need work",
        characteristics: &[
            "Has clear long-term goals and ideals",
            "Strongly self-motivated with a clear purpose for learning",
            "Creative and imaginative",
            "Invests deeply in areas of interest",
        ],
        strengths: &[
            "Goal oriented",
            "Self-driven",
            "Enthusiastic about learning",
            "Forward-looking planner",
        ],
        challenges: &[
            "May lack a concrete execution plan",
            "Confidence can be shaken by setbacks",
            "Practical skills need strengthening",
            "Can be overly idealistic",
        ],
        icon: "🌟",
    },
    MotivationType {
        id: MotivationTypeId::Achiever,
        name: "Achiever",
        description: "Balanced across the board with strong follow-through and a sense of accomplishment",
        characteristics: &[
            "Learns quickly and adapts well",
            "Balances ideals with reality",
            "Manages themselves well",
            "Performs well in several areas",
        ],
        strengths: &[
            "Well-rounded ability",
            "Strong follow-through",
            "Self-confident",
            "Keeps improving",
        ],
        challenges: &[
            "May lack a standout specialty",
            "Needs to find genuine interests",
            "Should avoid perfectionism",
            "Needs to keep learning fresh",
        ],
        icon: "🏆",
    },
    MotivationType {
        id: MotivationTypeId::Explorer,
        name: "Explorer",
        description: "Curious and enthusiastic about learning, but may struggle to stay focused",
        characteristics: &[
            "Curious and keen to try new things",
            "Broad learning interests",
            "Active, inventive thinker",
            "Adapts easily to change",
        ],
        strengths: &[
            "Enthusiastic about learning",
            "Open-minded",
            "Innovative",
            "Adaptable",
        ],
        challenges: &[
            "May lack deep focus",
            "Needs more persistence",
            "Easily distracted",
            "Needs better time management",
        ],
        icon: "🔍",
    },
    MotivationType {
        id: MotivationTypeId::Builder,
        name: "Builder",
        description: "Gets things done, but may lack inner motivation or creative thinking",
        characteristics: &[
            "Completes tasks reliably",
            "Reasonably capable learner",
            "Practical and steady",
            "Works to a plan",
        ],
        strengths: &[
            "Strong follow-through",
            "Responsible",
            "Dependable",
            "Persistent",
        ],
        challenges: &[
            "May lack inner motivation",
            "Needs more creative thinking",
            "May rely too much on outside direction",
            "Needs to build independent learning habits",
        ],
        icon: "🔨",
    },
    MotivationType {
        id: MotivationTypeId::Challenger,
        name: "Challenger",
        description: "Stands out in some areas, but overall development may be uneven",
        characteristics: &[
            "Excels in particular areas",
            "Enjoys a challenge",
            "Competitive",
            "Performs under pressure",
        ],
        strengths: &[
            "Outstanding in strong areas",
            "Handles pressure well",
            "Competitive edge",
            "Clear goals",
        ],
        challenges: &[
            "Development may be unbalanced",
            "Needs to branch out",
            "May focus too narrowly",
            "Needs broader all-round skills",
        ],
        icon: "⚡",
    },
    MotivationType {
        id: MotivationTypeId::Supporter,
        name: "Supporter",
        description: "Motivation is relatively low; more outside support and guidance are needed",
        characteristics: &[
            "Takes relatively little initiative in learning",
            "May lack clear goals",
            "Needs more encouragement and support",
            "Has learning potential",
        ],
        strengths: &[
            "Has potential",
            "Accepts guidance",
            "Plenty of room to grow",
            "Highly adaptable",
        ],
        challenges: &[
            "Lacks inner motivation",
            "Needs to build confidence",
            "Needs to find what sparks interest",
            "Needs more support and encouragement",
        ],
        icon: "🤝",
    },
];

/// Serde adapter storing a catalog reference as the full entry and reading it
/// back by identifier.
pub(crate) mod by_id {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &&'static MotivationType,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<&'static MotivationType, D::Error> {
        #[derive(Deserialize)]
        struct Stored {
            id: MotivationTypeId,
        }

        Stored::deserialize(deserializer).map(|stored| stored.id.profile())
    }
}
