use crate::QuestionId;
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A question as shown to a respondent.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// Prompt with the name placeholder already substituted.
    pub content: String,
    #[serde(default)]
    pub is_multiple_choice: bool,
    /// Choices to pick from. Left empty for free-text questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<String>,
}

/// A stored base question, including the parts only its author may see.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullQuestion {
    pub id: String,
    /// Owning quiz. Never sent over the wire.
    #[serde(skip)]
    pub quiz: String,
    /// Prompt which may contain the `{{name}}` placeholder.
    pub content: String,
    pub is_multiple_choice: bool,
    /// Lower-cased and de-duplicated accepted answers (or choices).
    pub answers: Vec<String>,
    /// Index into `answers` of the correct choice for multiple-choice questions.
    pub correct_answer: i16,
}

/// Author-submitted schema for a base question.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub content: String,
    #[serde(default)]
    pub is_multiple_choice: bool,
    pub answers: Vec<String>,
    #[serde(default)]
    pub correct_answer: i16,
}

/// A respondent's attempt at a question.
#[derive(Clone, Debug, Deserialize)]
pub struct Answer {
    pub answer: String,
}

/// Outcome of answering a question. Successful responses carry either the
/// next question or the final redirect, never both.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResp {
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl QuestionResp {
    pub const fn incorrect() -> Self {
        Self { correct: false, next: None, redirect: None }
    }

    pub const fn next(question: Question) -> Self {
        Self { correct: true, next: Some(question), redirect: None }
    }

    pub const fn redirect(url: String) -> Self {
        Self { correct: true, next: None, redirect: Some(url) }
    }
}
