//! Canned replies used when the chat-completion endpoint cannot answer.

use std::fmt::Write as _;

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{DifferenceLevel, ExpertEvaluationInput, StudentContext};
use crate::assessment::domain::{Dimension, DimensionScores};

/// Topic keywords matched case-insensitively against the latest user message,
/// checked in this order.
pub(crate) static KEYWORD_RESPONSES: [(&str, [&str; 3]); 12] = [
    (
        "autonomy",
        [
            "Autonomy grows when you get to make real choices. Try planning tomorrow's study session yourself: pick the subject, the order and when to take a break.",
            "Being in charge of your own learning starts small. Choose one task this week where you decide how to tackle it, then notice how it feels.",
            "A simple weekly plan you write yourself is one of the best ways to build autonomy. What would you put on it first?",
        ],
    ),
    (
        "competence",
        [
            "Confidence comes from seeing your own progress. Keep a short list of things you could not do a month ago but can now.",
            "Break a hard topic into small steps and tick each one off. Every finished step is proof that you can do it.",
            "Mistakes are information, not verdicts. Pick one recent mistake and work out exactly what you would do differently next time.",
        ],
    ),
    (
        "engagement",
        [
            "Engagement rises when learning connects to something you care about. Which of your interests could link to what you are studying now?",
            "Try turning one topic into a question you genuinely want answered, then go and find the answer.",
            "Short, focused sessions with a clear goal keep you involved. Try 25 minutes on one thing, then a 5 minute break.",
        ],
    ),
    (
        "dreamer",
        [
            "Dreamers have big goals, which is a real strength. The next step is turning one dream into a plan with a first action you can do this week.",
            "Write your big goal at the top of a page, then list three small steps underneath. Start with the easiest one.",
            "Big ambitions need small daily habits. What is one habit that would move you a little closer to your dream?",
        ],
    ),
    (
        "achiever",
        [
            "Achievers are strong across the board. Keep challenging yourself, and remember that rest is part of high performance too.",
            "You already do well; try a stretch goal in a new area so learning stays exciting rather than just about results.",
            "Celebrate effort as well as outcomes. It keeps motivation steady when a result does not go your way.",
        ],
    ),
    (
        "explorer",
        [
            "Explorers love discovering new things. Pick one topic that fascinates you and go deeper than usual this week.",
            "Curiosity is your engine. Keep a question notebook and follow up on one question each week.",
            "Breadth is great; add depth by choosing one subject to master alongside your exploring.",
        ],
    ),
    (
        "builder",
        [
            "Builders are capable and steady. Try setting one goal for yourself rather than waiting for it to be set for you.",
            "You already have solid skills. Use them on a small project you choose yourself to grow your inner drive.",
            "Think about why a subject matters to you personally. Finding your own reason makes the work feel lighter.",
        ],
    ),
    (
        "challenger",
        [
            "Challengers have clear strengths to build on. Use your strongest area to support the one that needs more work.",
            "Pick the dimension that feels weakest and set one small, specific goal to lift it this week.",
            "Progress is rarely even. Keep using your strengths while you patiently work on the gaps.",
        ],
    ),
    (
        "supporter",
        [
            "Every learner starts somewhere. Choose one easy win for this week to start building momentum.",
            "Find one subject or activity you enjoy and spend a little time on it each day. Interest builds confidence.",
            "Ask for help when you need it; working with a friend or family member can make learning feel much easier.",
        ],
    ),
    (
        "study method",
        [
            "Effective study methods include spaced repetition, testing yourself and explaining ideas in your own words. Try one this week.",
            "Instead of rereading notes, close the book and write down everything you remember. Then check what you missed.",
            "Mix different types of problems in one session. It feels harder but helps you remember much better.",
        ],
    ),
    (
        "motivation",
        [
            "Motivation follows action more often than it leads it. Start with just five minutes and see where it takes you.",
            "Think about what you want learning to give you in a year. Keeping that picture in mind makes daily effort easier.",
            "Notice which tasks you start without being asked. They tell you a lot about what really motivates you.",
        ],
    ),
    (
        "goal",
        [
            "Good goals are specific and time-bound. Try completing this sentence: by the end of this month I will...",
            "Split a long-term goal into weekly milestones so you can see progress along the way.",
            "Write your goal somewhere you will see it every day, and review it each weekend.",
        ],
    ),
];

pub(crate) static GENERIC_RESPONSES: [&str; 5] = [
    "Thanks for sharing. Learning motivation changes over time; what is one thing about learning that you enjoy at the moment?",
    "That is a great question to think about. Could you tell me a bit more about what you are finding easy or hard right now?",
    "Every small step counts. What is one thing you could try this week to make learning a little more enjoyable?",
    "It helps to think about autonomy, competence and engagement together. Which of the three feels strongest for you right now?",
    "You are already taking a good step by reflecting on how you learn. What goal would you like to work towards next?",
];

/// Fallback chat reply: keyword match first, then the supplied context, then
/// a random generic encouragement.
pub fn chat_reply<R: Rng + ?Sized>(
    latest_user_message: Option<&str>,
    context: Option<&StudentContext>,
    rng: &mut R,
) -> String {
    if let Some(responses) = latest_user_message.and_then(keyword_responses) {
        if let Some(reply) = responses.choose(rng) {
            return (*reply).to_string();
        }
    }

    if let Some(context) = context.filter(|context| context.has_scores()) {
        return context_reply(context);
    }

    GENERIC_RESPONSES
        .choose(rng)
        .copied()
        .unwrap_or(GENERIC_RESPONSES[0])
        .to_string()
}

fn keyword_responses(message: &str) -> Option<&'static [&'static str; 3]> {
    let message = message.to_lowercase();
    KEYWORD_RESPONSES
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, responses)| responses)
}

fn context_reply(context: &StudentContext) -> String {
    let scores = context.scores();
    let strongest = scores.strongest();
    let weakest = weakest(&scores);
    let greeting = match context.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("Thanks for sharing, {name}."),
        _ => "Thanks for sharing.".to_string(),
    };

    let mut reply = format!(
        "{greeting} Your ACE scores are autonomy {}/20, competence {}/20 and engagement {}/20",
        scores.autonomy, scores.competence, scores.engagement
    );
    if let Some(kind) = context
        .motivation_type
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
    {
        let _ = write!(reply, ", and your motivation type is {kind}");
    }
    let _ = write!(
        reply,
        ". {} is your strongest dimension, so lean on it. ",
        strongest.label()
    );
    if weakest == strongest {
        reply.push_str("Your dimensions are evenly balanced; pick one small goal this week to keep all three growing.");
    } else {
        let _ = write!(
            reply,
            "What is one small thing you could try this week to build your {}?",
            weakest.label().to_lowercase()
        );
    }
    reply
}

fn weakest(scores: &DimensionScores) -> Dimension {
    Dimension::ALL
        .into_iter()
        .fold(Dimension::Autonomy, |worst, candidate| {
            if scores.get(candidate) < scores.get(worst) {
                candidate
            } else {
                worst
            }
        })
}

/// Templated expert evaluation built from the two score sets.
pub fn expert_evaluation(input: &ExpertEvaluationInput) -> String {
    let name = input.student_name.trim();
    let student = &input.student_ace;
    let parent = &input.parent_ace;
    let strongest = student.strongest();
    let (type_name, type_basis) = evaluation_type(strongest);

    let mut report = String::new();
    let _ = writeln!(report, "# ACE Motivation Expert Evaluation for {name}\n");

    let _ = writeln!(report, "## 1. Motivation type analysis\n");
    let _ = writeln!(report, "**Motivation type**: {type_name}\n");
    let _ = writeln!(
        report,
        "**Basis**: {name}'s highest self-assessed dimension is {} ({}/20). {type_basis}\n",
        strongest.label().to_lowercase(),
        student.get(strongest)
    );
    let _ = writeln!(
        report,
        "- Student self-assessment: autonomy {}/20, competence {}/20, engagement {}/20",
        student.autonomy, student.competence, student.engagement
    );
    let _ = writeln!(
        report,
        "- Parent assessment: autonomy {}/20, competence {}/20, engagement {}/20\n",
        parent.autonomy, parent.competence, parent.engagement
    );

    let _ = writeln!(report, "## 2. Perception differences\n");
    let mut significant = Vec::new();
    for dimension in Dimension::ALL {
        let difference = student.get(dimension).abs_diff(parent.get(dimension));
        let level = DifferenceLevel::from_difference(difference);
        let _ = writeln!(
            report,
            "- **{}**: student {}, parent {}, difference {difference} ({})",
            dimension.label(),
            student.get(dimension),
            parent.get(dimension),
            level_phrase(level)
        );
        if level.is_significant() {
            significant.push((dimension, student.get(dimension) > parent.get(dimension)));
        }
    }
    report.push('\n');
    if significant.is_empty() {
        report.push_str("Student and parent see the student's motivation in similar terms, a good foundation for working together.\n\n");
    } else {
        for (dimension, student_higher) in significant {
            let _ = writeln!(report, "{}", difference_note(dimension, student_higher));
        }
        report.push('\n');
    }

    let _ = writeln!(report, "## 3. ACE enhancement\n");
    for dimension in weakest_first(student) {
        let _ = writeln!(report, "- **{}**: {}", dimension.label(), enhancement(dimension));
    }
    report.push('\n');

    let _ = writeln!(report, "## 4. Parent-child communication\n");
    report.push_str("- Ask open questions about what felt interesting or hard today, and listen before offering advice.\n");
    report.push_str("- Praise specific effort and strategies rather than grades alone.\n");
    report.push_str("- Share your own observations calmly and invite the student to compare them with their own view.\n\n");

    let _ = writeln!(report, "## 5. Action tasks\n");
    let _ = writeln!(report, "**Short term (1-2 weeks): motivation conversation**");
    report.push_str("1. Set aside 30 minutes for a relaxed conversation about learning.\n");
    let _ = writeln!(
        report,
        "2. Compare the student's and parent's scores together, starting with {}.",
        strongest.label().to_lowercase()
    );
    report.push_str("3. Agree on one small goal for the next week.\n\n");
    let _ = writeln!(report, "**Long term (1-3 months): motivation observation diary**");
    report.push_str("1. Each week, both of you note moments of high and low motivation.\n");
    report.push_str("2. Review the diary together every two weeks and look for patterns.\n");
    report.push_str("3. After three months, retake the ACE questionnaire and compare the results.\n");

    report
}

fn evaluation_type(strongest: Dimension) -> (&'static str, &'static str) {
    match strongest {
        Dimension::Autonomy => (
            "Self-driven",
            "Self-driven learners are motivated by choice and ownership of their learning.",
        ),
        Dimension::Competence => (
            "Achievement-oriented",
            "Achievement-oriented learners are motivated by mastery and visible progress.",
        ),
        Dimension::Engagement => (
            "Engagement-driven",
            "Engagement-driven learners are motivated by interest and enjoyment in the subject itself.",
        ),
    }
}

fn level_phrase(level: DifferenceLevel) -> &'static str {
    match level {
        DifferenceLevel::None => "no real difference",
        DifferenceLevel::Small => "small difference",
        DifferenceLevel::Moderate => "moderate difference",
        DifferenceLevel::Large => "large difference",
    }
}

fn difference_note(dimension: Dimension, student_higher: bool) -> String {
    let view = if student_higher {
        "the student rates this higher than the parent does; the parent may not yet see how the student experiences it"
    } else {
        "the parent rates this higher than the student does; the student may need help recognising their own strengths here"
    };
    format!("Notable {} gap: {view}.", dimension.label().to_lowercase())
}

fn weakest_first(scores: &DimensionScores) -> [Dimension; 3] {
    let mut order = Dimension::ALL;
    order.sort_by_key(|dimension| scores.get(*dimension));
    order
}

fn enhancement(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Autonomy => "offer real choices about what, when and how to study, and let the student draft a weekly plan.",
        Dimension::Competence => "break work into achievable steps, track progress visibly and treat mistakes as part of learning.",
        Dimension::Engagement => "connect topics to the student's interests and leave room for curiosity-driven projects.",
    }
}
