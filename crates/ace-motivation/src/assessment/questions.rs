use serde::Serialize;

use super::domain::{Dimension, QuestionId, Role, ITEMS_PER_DIMENSION};

/// One Likert answer choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseOption {
    pub value: u8,
    pub label: &'static str,
}

pub const LIKERT_OPTIONS: [ResponseOption; 5] = [
    ResponseOption {
        value: 1,
        label: "Strongly disagree",
    },
    ResponseOption {
        value: 2,
        label: "Disagree",
    },
    ResponseOption {
        value: 3,
        label: "Neutral",
    },
    ResponseOption {
        value: 4,
        label: "Agree",
    },
    ResponseOption {
        value: 5,
        label: "Strongly agree",
    },
];

/// A single questionnaire item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: &'static str,
    pub dimension: Dimension,
    pub options: &'static [ResponseOption],
}

const STUDENT_PROMPTS: [[&str; ITEMS_PER_DIMENSION as usize]; 3] = [
    [
        "I decide for myself how and at what pace I study",
        "My learning goals are set by me rather than imposed on me",
        "I have enough choice and control over how I learn",
        "I study because I genuinely want to, not to meet other people's expectations",
    ],
    [
        "I believe I can master what I am learning",
        "When I hit a difficulty in my studies I can find an effective way through it",
        "I regularly complete learning tasks successfully and feel a sense of achievement",
        "I feel I have talent and ability when it comes to learning",
    ],
    [
        "I stay focused and absorbed when I study",
        "What I learn feels interesting and meaningful to me",
        "I am willing to put more time and effort into my studies",
        "I often look for new learning opportunities and challenges on my own",
    ],
];

const PARENT_PROMPTS: [[&str; ITEMS_PER_DIMENSION as usize]; 3] = [
    [
        "My child decides for themselves how and at what pace they study",
        "My child's learning goals are set by them rather than imposed on them",
        "My child has enough choice and control over how they learn",
        "My child studies because they genuinely want to, not to meet other people's expectations",
    ],
    [
        "I believe my child can master what they are learning",
        "When my child hits a difficulty in their studies they can find an effective way through it",
        "I see my child regularly complete learning tasks successfully and feel a sense of achievement",
        "I feel my child has talent and ability when it comes to learning",
    ],
    [
        "I see my child stay focused and absorbed when they study",
        "I think what my child learns feels interesting and meaningful to them",
        "My child is willing to put more time and effort into their studies",
        "My child often looks for new learning opportunities and challenges on their own",
    ],
];

/// Immutable question set for one respondent role.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionBank {
    pub role: Role,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn for_role(role: Role) -> Self {
        let prompts = match role {
            Role::Student => &STUDENT_PROMPTS,
            Role::Parent => &PARENT_PROMPTS,
        };

        let questions = QuestionId::all_for(role)
            .map(|id| Question {
                id,
                text: prompts[id.dimension().ordinal()][usize::from(id.index() - 1)],
                dimension: id.dimension(),
                options: &LIKERT_OPTIONS,
            })
            .collect();

        Self { role, questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn ids_for(&self, dimension: Dimension) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions
            .iter()
            .filter(move |question| question.dimension == dimension)
            .map(|question| question.id)
    }
}
