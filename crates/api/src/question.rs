use crate::{error::Result, App};
use engine::{
    evaluator::{self, Subject, Transition},
    resolver,
};
use model::{Position, Question, QuestionId, QuestionResp, Quiz};

impl App {
    /// Renders whatever lives at the position of the given quiz.
    async fn question_at(&self, quiz: &Quiz, position: Position) -> Result<Question> {
        match resolver::resolve(quiz, position)? {
            QuestionId::Special { kind, .. } => Ok(resolver::special(quiz, kind)),
            QuestionId::Ordinary { base, section } => {
                let question = self.db.get_question(&base).await?;
                Ok(resolver::render(quiz, &question, section)?)
            }
        }
    }

    /// The question every respondent starts with.
    pub async fn first_question(&self, quiz: &str) -> Result<Question> {
        let quiz = self.db.get_quiz(quiz).await?;
        self.question_at(&quiz, Position::FIRST).await
    }

    pub async fn get_question(&self, id: &str) -> Result<Question> {
        let id: QuestionId = id.parse()?;
        match id {
            QuestionId::Special { kind, quiz } => {
                let quiz = self.db.get_quiz(&quiz).await?;
                Ok(resolver::special(&quiz, kind))
            }
            QuestionId::Ordinary { base, section } => {
                let question = self.db.get_question(&base).await?;
                let quiz = self.db.get_quiz(&question.quiz).await?;
                Ok(resolver::render(&quiz, &question, section)?)
            }
        }
    }

    /// Checks an answer and hands back either the next question or the redirect.
    pub async fn answer_question(&self, id: &str, answer: &str) -> Result<QuestionResp> {
        let id: QuestionId = id.parse()?;
        let stored;
        let (quiz, subject) = match id {
            QuestionId::Special { kind, quiz } => (self.db.get_quiz(&quiz).await?, Subject::Special(kind)),
            QuestionId::Ordinary { base, section } => {
                stored = self.db.get_question(&base).await?;
                let quiz = self.db.get_quiz(&stored.quiz).await?;
                (quiz, Subject::Ordinary { question: &stored, section })
            }
        };

        Ok(match evaluator::evaluate(&quiz, subject, answer)? {
            Transition::Retry => QuestionResp::incorrect(),
            Transition::Advance(position) => QuestionResp::next(self.question_at(&quiz, position).await?),
            Transition::Finish(redirect) => {
                log::info!("respondent finished quiz {}", quiz.id);
                QuestionResp::redirect(redirect.into())
            }
        })
    }
}
