#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod id;
pub mod question;
pub mod quiz;
pub mod user;

pub use id::{Position, QuestionId, Section, SpecialKind};
pub use question::{Answer, FullQuestion, Question, QuestionDraft, QuestionResp};
pub use quiz::{NewQuiz, Quiz, QuizDraft, QuizEdit};
pub use user::{Credentials, PasswordChange, Session};
