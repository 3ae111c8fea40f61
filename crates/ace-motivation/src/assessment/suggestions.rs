use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::classification::MotivationTypeId;
use super::domain::{Dimension, Priority};

/// Maximum number of suggestions attached to a result.
pub const MAX_SUGGESTIONS: usize = 3;

/// Static advice entry owned by one archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    #[serde(rename = "type")]
    pub motivation_type: MotivationTypeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub keywords: &'static [&'static str],
    pub priority: Priority,
}

pub static SUGGESTION_LIBRARY: [Suggestion; 14] = [
    Suggestion {
        id: "dreamer_general_1",
        title: "Turn dreams into an action plan",
        content: "You have great goals and ideals! Now break those big goals into concrete, achievable steps. Use the SMART principle (specific, measurable, achievable, relevant, time-bound) to build your study plan.",
        motivation_type: MotivationTypeId::Dreamer,
        dimension: None,
        keywords: &["goal breakdown", "planning", "SMART"],
        priority: Priority::High,
    },
    Suggestion {
        id: "dreamer_competence_1",
        title: "Build follow-through and a sense of achievement",
        content: "Start small: finish one or two concrete study goals each day and record what you completed. Small wins build confidence and competence step by step. The Pomodoro technique can help you stay focused.",
        motivation_type: MotivationTypeId::Dreamer,
        dimension: Some(Dimension::Competence),
        keywords: &["follow-through", "achievement", "Pomodoro"],
        priority: Priority::High,
    },
    Suggestion {
        id: "achiever_general_1",
        title: "Keep your strengths and look for the next breakthrough",
        content: "You are doing well across the board! Build on your strengths by taking on harder tasks or exploring a new field so you do not settle into a comfort zone.",
        motivation_type: MotivationTypeId::Achiever,
        dimension: None,
        keywords: &["challenge", "breakthrough", "comfort zone"],
        priority: Priority::Medium,
    },
    Suggestion {
        id: "achiever_depth_1",
        title: "Go deep and develop a specialty",
        content: "Consider studying one area you love in real depth and growing a specialty. Competitions, projects or internships turn theory into practical ability.",
        motivation_type: MotivationTypeId::Achiever,
        dimension: None,
        keywords: &["deep learning", "specialty", "practice"],
        priority: Priority::Medium,
    },
    Suggestion {
        id: "explorer_general_1",
        title: "Grow focus and persistence",
        content: "Your curiosity and enthusiasm are great! Now work on focus: pick one or two areas that interest you most and study them in depth instead of spreading your attention too thin.",
        motivation_type: MotivationTypeId::Explorer,
        dimension: None,
        keywords: &["focus", "persistence", "in-depth study"],
        priority: Priority::High,
    },
    Suggestion {
        id: "explorer_autonomy_1",
        title: "Set a study rhythm and plan",
        content: "Make weekly and monthly study plans with clear goals. Time-management tools such as calendar reminders or study check-ins help you keep a steady rhythm.",
        motivation_type: MotivationTypeId::Explorer,
        dimension: Some(Dimension::Autonomy),
        keywords: &["time management", "study plan", "study rhythm"],
        priority: Priority::High,
    },
    Suggestion {
        id: "builder_general_1",
        title: "Spark your inner motivation",
        content: "You get things done! Now find learning that genuinely interests you. Explore different fields and look for directions that match your interests and values.",
        motivation_type: MotivationTypeId::Builder,
        dimension: None,
        keywords: &["inner motivation", "exploring interests", "values"],
        priority: Priority::High,
    },
    Suggestion {
        id: "builder_autonomy_1",
        title: "Develop independent learning",
        content: "Gradually rely less on outside direction and try setting your own study plans and goals. Start with small decisions such as choosing a study method or scheduling your study time.",
        motivation_type: MotivationTypeId::Builder,
        dimension: Some(Dimension::Autonomy),
        keywords: &["independent learning", "independent thinking", "decision making"],
        priority: Priority::High,
    },
    Suggestion {
        id: "challenger_general_1",
        title: "Balance your growth and widen your view",
        content: "You stand out in some areas! Keep those strengths while paying attention to other areas too, so your abilities become more well-rounded.",
        motivation_type: MotivationTypeId::Challenger,
        dimension: None,
        keywords: &["balanced growth", "all-round development", "wider view"],
        priority: Priority::Medium,
    },
    Suggestion {
        id: "challenger_engagement_1",
        title: "Raise interest and engagement",
        content: "Connect learning with real use through projects and group discussions. Look for links between what you study and everyday life to make learning feel meaningful.",
        motivation_type: MotivationTypeId::Challenger,
        dimension: Some(Dimension::Engagement),
        keywords: &["real-world use", "projects", "meaning"],
        priority: Priority::Medium,
    },
    Suggestion {
        id: "supporter_general_1",
        title: "Build confidence and interest in learning",
        content: "Everyone has their own pace and style! Start with small topics you enjoy and set easy goals. Each success builds confidence.",
        motivation_type: MotivationTypeId::Supporter,
        dimension: None,
        keywords: &["confidence", "interest", "small goals"],
        priority: Priority::High,
    },
    Suggestion {
        id: "supporter_autonomy_1",
        title: "Take the initiative",
        content: "Set yourself one small study task each day, such as reading an article or learning a new concept. What matters is the habit of learning actively rather than passively.",
        motivation_type: MotivationTypeId::Supporter,
        dimension: Some(Dimension::Autonomy),
        keywords: &["initiative", "study habits", "self-drive"],
        priority: Priority::High,
    },
    Suggestion {
        id: "supporter_competence_1",
        title: "Look for support and help",
        content: "Do not be afraid to ask for help! Talk through difficulties with teachers, classmates or parents. Joining a study group can lift both motivation and results.",
        motivation_type: MotivationTypeId::Supporter,
        dimension: Some(Dimension::Competence),
        keywords: &["support", "asking for help", "study group"],
        priority: Priority::High,
    },
    Suggestion {
        id: "supporter_engagement_1",
        title: "Discover the fun in learning",
        content: "Try different ways to learn: games, video tutorials, hands-on practice. Find the style that suits you so learning becomes more fun and meaningful.",
        motivation_type: MotivationTypeId::Supporter,
        dimension: Some(Dimension::Engagement),
        keywords: &["fun", "varied learning", "gamification"],
        priority: Priority::High,
    },
];

impl Suggestion {
    pub fn find(id: &str) -> Option<&'static Suggestion> {
        SUGGESTION_LIBRARY.iter().find(|suggestion| suggestion.id == id)
    }
}

/// Serde adapter storing selected suggestions in full and reading them back
/// from the library by identifier.
pub(crate) mod by_ids {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &[&'static Suggestion],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(value.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<&'static Suggestion>, D::Error> {
        #[derive(Deserialize)]
        struct Stored {
            id: String,
        }

        Vec::<Stored>::deserialize(deserializer)?
            .into_iter()
            .map(|stored| {
                Suggestion::find(&stored.id).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown suggestion '{}'", stored.id))
                })
            })
            .collect()
    }
}

/// Top suggestions for an archetype given its weak dimensions.
///
/// General entries come first, then entries for each weak dimension in
/// autonomy, competence, engagement order. The list is stably sorted by
/// descending priority and truncated to [`MAX_SUGGESTIONS`].
pub fn select_suggestions(
    motivation_type: MotivationTypeId,
    weak_dimensions: &BTreeSet<Dimension>,
) -> Vec<&'static Suggestion> {
    select_from(&SUGGESTION_LIBRARY, motivation_type, weak_dimensions)
}

fn select_from<'a>(
    library: &'a [Suggestion],
    motivation_type: MotivationTypeId,
    weak_dimensions: &BTreeSet<Dimension>,
) -> Vec<&'a Suggestion> {
    let owned_by_type = || {
        library
            .iter()
            .filter(move |suggestion| suggestion.motivation_type == motivation_type)
    };

    let mut selected: Vec<&'a Suggestion> = owned_by_type()
        .filter(|suggestion| suggestion.dimension.is_none())
        .collect();

    for dimension in weak_dimensions {
        selected.extend(
            owned_by_type().filter(|suggestion| suggestion.dimension == Some(*dimension)),
        );
    }

    selected.sort_by_key(|suggestion| std::cmp::Reverse(suggestion.priority.rank()));
    selected.truncate(MAX_SUGGESTIONS);
    selected
}
