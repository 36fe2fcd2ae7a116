use crate::QuestionDraft;
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A configured reveal quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    /// Account that owns this quiz. Only the author may edit or delete it.
    pub author_id: String,
    pub dead_names: Vec<String>,
    pub dead_last_name: String,
    pub chosen_names: Vec<String>,
    pub chosen_last_name: String,
    pub nickname: String,
    /// Presentation order of the three base questions.
    pub order: [String; 3],
    /// Index into `order` of the base question skipped in sections 2 and 3.
    pub drop_question: u8,
    /// Final destination once the respondent figures it out.
    pub redirect: String,
}

impl Quiz {
    /// The dead name substituted into section 1 prompts.
    pub fn dead_name(&self) -> &str {
        self.dead_names.first().map_or("", String::as_str)
    }

    /// The chosen name substituted into section 3 prompts.
    pub fn chosen_name(&self) -> &str {
        self.chosen_names.first().map_or("", String::as_str)
    }
}

/// Author-editable quiz metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub dead_names: Vec<String>,
    pub dead_last_name: String,
    pub chosen_names: Vec<String>,
    /// Falls back to the dead last name when left empty.
    #[serde(default)]
    pub chosen_last_name: String,
    pub nickname: String,
    /// Kept wide so that negative inputs can be reported rather than rejected by the decoder.
    pub drop_question: i64,
    pub redirect: String,
}

/// Schema for creating a quiz together with its three base questions.
#[derive(Clone, Debug, Deserialize)]
pub struct NewQuiz {
    pub quiz: QuizDraft,
    /// The three base questions in presentation order.
    pub questions: Vec<QuestionDraft>,
}

/// Schema for replacing a quiz's metadata wholesale.
#[derive(Clone, Debug, Deserialize)]
pub struct QuizEdit {
    pub quiz: QuizDraft,
    /// A permutation of the quiz's existing base question IDs.
    pub order: Vec<String>,
}
