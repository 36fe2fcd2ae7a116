use crate::{
    error::{Error, Result},
    App,
};
use db::TryStreamExt;
use engine::validate;
use model::{FullQuestion, NewQuiz, QuestionDraft, Quiz, QuizEdit};

impl App {
    /// Fetches a quiz on behalf of someone who wants to manage it.
    async fn authored_quiz(&self, id: &str, author: &str) -> Result<Quiz> {
        let quiz = self.db.get_quiz(id).await?;
        if quiz.author_id != author {
            log::warn!("account {author} tried to manage quiz {id}");
            return Err(Error::Unauthorized);
        }
        Ok(quiz)
    }

    /// Validates and persists a quiz together with its three base questions.
    pub async fn create_quiz(&self, author: String, submission: NewQuiz) -> Result<Quiz> {
        let (metadata, drafts) = validate::new_quiz(submission)?;

        let id = self.ids.next_id();
        let questions = drafts.map(|draft| {
            let QuestionDraft { content, is_multiple_choice, answers, correct_answer } = draft;
            FullQuestion { id: self.ids.next_id(), quiz: id.clone(), content, is_multiple_choice, answers, correct_answer }
        });
        let [first, second, third] = &questions;
        let order = [first.id.clone(), second.id.clone(), third.id.clone()];

        let quiz = metadata.into_quiz(id, author, order);
        self.db.create_quiz(&quiz, &questions).await?;
        log::info!("account {} created quiz {}", quiz.author_id, quiz.id);
        Ok(quiz)
    }

    pub async fn get_quiz(&self, id: &str, author: &str) -> Result<Quiz> {
        self.authored_quiz(id, author).await
    }

    /// Replaces the quiz metadata wholesale. The base questions stay as they are.
    pub async fn edit_quiz(&self, id: &str, author: &str, edit: QuizEdit) -> Result<Quiz> {
        let current = self.authored_quiz(id, author).await?;
        let (metadata, order) = validate::edit(edit, &current.order)?;
        let quiz = metadata.into_quiz(current.id, current.author_id, order);
        self.db.update_quiz(&quiz).await?;
        Ok(quiz)
    }

    /// Deletes the quiz along with its questions.
    pub async fn delete_quiz(&self, id: &str, author: &str) -> Result<Quiz> {
        self.authored_quiz(id, author).await?;
        let quiz = self.db.delete_quiz(id, author).await?;
        log::info!("account {author} deleted quiz {id}");
        Ok(quiz)
    }

    /// Lists the base questions of a quiz in presentation order, answers included.
    pub async fn list_questions(&self, id: &str, author: &str) -> Result<Vec<FullQuestion>> {
        let quiz = self.authored_quiz(id, author).await?;
        let questions = self.db.get_questions(&quiz.id).await?.try_collect().await?;
        Ok(questions)
    }

    pub async fn edit_question(&self, id: &str, base: &str, author: &str, draft: QuestionDraft) -> Result<FullQuestion> {
        let quiz = self.authored_quiz(id, author).await?;
        let current = self.db.get_question(base).await?;
        if current.quiz != quiz.id {
            return Err(Error::NotFound);
        }

        let QuestionDraft { content, is_multiple_choice, answers, correct_answer } = validate::question(draft)?;
        let question = FullQuestion { content, is_multiple_choice, answers, correct_answer, ..current };
        self.db.update_question(&question).await?;
        Ok(question)
    }
}
