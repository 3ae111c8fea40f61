use std::fmt::Write as _;

use super::types::{ExpertEvaluationInput, StudentContext};

pub const COUNSELLOR_SYSTEM_PROMPT: &str = "\
You are a warm, professional learning-motivation counsellor working with students and their parents \
on the ACE model of learning motivation: Autonomy (A), Competence (C) and Engagement (E).

In every conversation:
- Help the student notice what they are genuinely interested in and what energises their learning.
- Suggest one concrete, achievable next step they can take this week.
- Connect short-term actions to a meaningful long-term goal.

Keep answers encouraging, specific and under 200 words. Ask at most one follow-up question at a time. \
Never diagnose; when concerns go beyond learning motivation, suggest talking to a teacher or a school counsellor.";

pub const EVALUATION_SYSTEM_PROMPT: &str = "\
You are an educational psychologist specialising in the ACE learning-motivation model \
(Autonomy, Competence, Engagement; each dimension scored out of 20). You receive a student's \
self-assessment and a parent's assessment of the same student.

Write a structured expert evaluation in Markdown with exactly these sections:
1. Motivation type analysis: name the student's motivation type and explain the evidence in the scores.
2. Perception differences: compare the student and parent scores per dimension and interpret the gaps.
3. ACE enhancement: practical advice for strengthening each dimension, weakest first.
4. Parent-child communication: how the parent can talk about learning in a supportive way.
5. Action tasks: one short-term task (1-2 weeks) and one long-term task (1-3 months), each with concrete steps.

Be specific, warm and evidence-based. Refer to the student by name.";

const UNSPECIFIED_TYPE: &str = "to be analysed";
const NO_OBSERVATION: &str = "no special observations";

/// Background appended to the counsellor prompt when the client sends it.
pub fn context_block(context: &StudentContext) -> Option<String> {
    let mut block = String::new();
    if let Some(name) = context.name.as_deref().filter(|name| !name.trim().is_empty()) {
        let _ = writeln!(block, "- Student name: {}", name.trim());
    }
    if context.has_scores() {
        let scores = context.scores();
        let _ = writeln!(
            block,
            "- ACE scores: autonomy {}/20, competence {}/20, engagement {}/20",
            scores.autonomy, scores.competence, scores.engagement
        );
    }
    if let Some(kind) = context
        .motivation_type
        .as_deref()
        .filter(|kind| !kind.trim().is_empty())
    {
        let _ = writeln!(block, "- Motivation type: {}", kind.trim());
    }

    if block.is_empty() {
        None
    } else {
        Some(format!(
            "\n\nWhat you know about this student:\n{}Tailor your advice to this profile.",
            block
        ))
    }
}

pub fn counsellor_prompt(context: Option<&StudentContext>) -> String {
    let mut prompt = COUNSELLOR_SYSTEM_PROMPT.to_string();
    if let Some(block) = context.and_then(context_block) {
        prompt.push_str(&block);
    }
    prompt
}

pub fn evaluation_user_message(input: &ExpertEvaluationInput) -> String {
    let student = &input.student_ace;
    let parent = &input.parent_ace;
    format!(
        "Please write an expert evaluation for {name}.\n\n\
         Student self-assessment: autonomy {sa}/20, competence {sc}/20, engagement {se}/20\n\
         Parent assessment: autonomy {pa}/20, competence {pc}/20, engagement {pe}/20\n\
         Student motivation type: {student_type}\n\
         Parent's view of the motivation type: {parent_type}\n\
         Additional observation: {observation}",
        name = input.student_name.trim(),
        sa = student.autonomy,
        sc = student.competence,
        se = student.engagement,
        pa = parent.autonomy,
        pc = parent.competence,
        pe = parent.engagement,
        student_type = non_blank(input.student_motivation_type.as_deref()).unwrap_or(UNSPECIFIED_TYPE),
        parent_type = non_blank(input.parent_motivation_type.as_deref()).unwrap_or(UNSPECIFIED_TYPE),
        observation = non_blank(input.observation.as_deref()).unwrap_or(NO_OBSERVATION),
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::DimensionScores;

    #[test]
    fn empty_context_adds_nothing() {
        assert_eq!(context_block(&StudentContext::default()), None);
        assert_eq!(counsellor_prompt(None), COUNSELLOR_SYSTEM_PROMPT);
    }

    #[test]
    fn context_block_lists_known_fields() {
        let context = StudentContext {
            name: Some("Mia".to_string()),
            autonomy: Some(14),
            competence: None,
            engagement: Some(9),
            motivation_type: Some("Explorer".to_string()),
        };
        let block = context_block(&context).expect("context present");
        assert!(block.contains("Student name: Mia"));
        assert!(block.contains("autonomy 14/20, competence 0/20, engagement 9/20"));
        assert!(block.contains("Motivation type: Explorer"));
    }

    #[test]
    fn evaluation_message_uses_defaults_for_blank_fields() {
        let input = ExpertEvaluationInput {
            student_name: " Leo ".to_string(),
            student_ace: DimensionScores::new(18, 12, 15),
            parent_ace: DimensionScores::new(10, 12, 14),
            observation: Some("   ".to_string()),
            student_motivation_type: None,
            parent_motivation_type: Some("Builder".to_string()),
        };
        let message = evaluation_user_message(&input);
        assert!(message.contains("for Leo."));
        assert!(message.contains("autonomy 18/20, competence 12/20, engagement 15/20"));
        assert!(message.contains("Student motivation type: to be analysed"));
        assert!(message.contains("Parent's view of the motivation type: Builder"));
        assert!(message.contains("Additional observation: no special observations"));
    }
}
