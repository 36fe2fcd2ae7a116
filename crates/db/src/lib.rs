#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;

use alloc::{string::String, vec::Vec};
use model::{FullQuestion, Quiz};
use tokio_postgres::Row;

pub use futures_util::{TryStream, TryStreamExt};
pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Tables and constraints. Every statement is idempotent.
const SCHEMA: &str = include_str!("schema.sql");

const CREATE_QUIZ: &str = "\
    WITH new_quiz AS ( \
        INSERT INTO quiz (id, author, deadname, deadlastname, chosenname, chosenlastname, nickname, question_order, drop_question, redirect) \
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
        RETURNING id \
    ) \
    INSERT INTO questions (id, quiz, is_multiple_choice, answers, correct_answer, content) \
    SELECT q.id, new_quiz.id, q.is_multiple_choice, q.answers, q.correct_answer, q.content \
    FROM new_quiz, (VALUES \
        ($11::TEXT, $12::BOOLEAN, $13::TEXT[], $14::SMALLINT, $15::TEXT), \
        ($16::TEXT, $17::BOOLEAN, $18::TEXT[], $19::SMALLINT, $20::TEXT), \
        ($21::TEXT, $22::BOOLEAN, $23::TEXT[], $24::SMALLINT, $25::TEXT) \
    ) AS q (id, is_multiple_choice, answers, correct_answer, content)";

/// Login record of an account.
#[derive(Debug)]
pub struct Account {
    pub id: String,
    pub token: String,
    /// Encoded password hash.
    pub password: String,
}

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn deserialize_quiz_from_row(row: &Row) -> error::Result<Quiz> {
    let order: Vec<String> = row.try_get("question_order")?;
    let order = <[String; 3]>::try_from(order).map_err(|_| error::Error::Fatal)?;
    let drop_question: i16 = row.try_get("drop_question")?;
    let drop_question = u8::try_from(drop_question).map_err(|_| error::Error::Fatal)?;
    Ok(Quiz {
        id: row.try_get("id")?,
        author_id: row.try_get("author")?,
        dead_names: row.try_get("deadname")?,
        dead_last_name: row.try_get("deadlastname")?,
        chosen_names: row.try_get("chosenname")?,
        chosen_last_name: row.try_get("chosenlastname")?,
        nickname: row.try_get("nickname")?,
        order,
        drop_question,
        redirect: row.try_get("redirect")?,
    })
}

fn deserialize_question_from_row(row: &Row) -> error::Result<FullQuestion> {
    Ok(FullQuestion {
        id: row.try_get("id")?,
        quiz: row.try_get("quiz")?,
        content: row.try_get("content")?,
        is_multiple_choice: row.try_get("is_multiple_choice")?,
        answers: row.try_get("answers")?,
        correct_answer: row.try_get("correct_answer")?,
    })
}

impl Database {
    /// Creates the tables if they do not exist yet.
    pub async fn init(&self) -> error::Result<()> {
        self.0.batch_execute(SCHEMA).await?;
        Ok(())
    }

    pub async fn get_quiz(&self, id: &str) -> error::Result<Quiz> {
        let row = self
            .0
            .query_opt(
                "SELECT id, author, deadname, deadlastname, chosenname, chosenlastname, nickname, question_order, drop_question, redirect \
                 FROM quiz WHERE id = $1",
                &[&id],
            )
            .await?
            .ok_or(error::Error::NotFound)?;
        deserialize_quiz_from_row(&row)
    }

    pub async fn get_question(&self, id: &str) -> error::Result<FullQuestion> {
        let row = self
            .0
            .query_opt(
                "SELECT id, quiz, content, is_multiple_choice, answers, correct_answer FROM questions WHERE id = $1",
                &[&id],
            )
            .await?
            .ok_or(error::Error::NotFound)?;
        deserialize_question_from_row(&row)
    }

    /// Streams the base questions of a quiz in their presentation order.
    pub async fn get_questions(
        &self,
        quiz: &str,
    ) -> error::Result<impl TryStream<Ok = FullQuestion, Error = error::Error> + '_> {
        Ok(self
            .0
            .query_raw(
                "SELECT q.id, q.quiz, q.content, q.is_multiple_choice, q.answers, q.correct_answer \
                 FROM questions AS q JOIN quiz ON quiz.id = q.quiz \
                 WHERE q.quiz = $1 \
                 ORDER BY array_position(quiz.question_order, q.id)",
                [quiz],
            )
            .await?
            .map_err(error::Error::from)
            .and_then(|row| core::future::ready(deserialize_question_from_row(&row))))
    }

    /// Inserts a quiz together with its three base questions in one statement.
    pub async fn create_quiz(&self, quiz: &Quiz, questions: &[FullQuestion; 3]) -> error::Result<()> {
        let order = quiz.order.as_slice();
        let drop_question = i16::from(quiz.drop_question);
        let [first, second, third] = questions;
        let count = self
            .0
            .execute(
                CREATE_QUIZ,
                &[
                    &quiz.id,
                    &quiz.author_id,
                    &quiz.dead_names,
                    &quiz.dead_last_name,
                    &quiz.chosen_names,
                    &quiz.chosen_last_name,
                    &quiz.nickname,
                    &order,
                    &drop_question,
                    &quiz.redirect,
                    &first.id,
                    &first.is_multiple_choice,
                    &first.answers,
                    &first.correct_answer,
                    &first.content,
                    &second.id,
                    &second.is_multiple_choice,
                    &second.answers,
                    &second.correct_answer,
                    &second.content,
                    &third.id,
                    &third.is_multiple_choice,
                    &third.answers,
                    &third.correct_answer,
                    &third.content,
                ],
            )
            .await?;
        match count {
            3 => Ok(()),
            _ => Err(error::Error::Fatal),
        }
    }

    /// Overwrites the metadata of a quiz owned by `quiz.author_id`.
    pub async fn update_quiz(&self, quiz: &Quiz) -> error::Result<()> {
        let order = quiz.order.as_slice();
        let drop_question = i16::from(quiz.drop_question);
        match self
            .0
            .execute(
                "UPDATE quiz SET deadname = $3, deadlastname = $4, chosenname = $5, chosenlastname = $6, \
                 nickname = $7, question_order = $8, drop_question = $9, redirect = $10 \
                 WHERE id = $1 AND author = $2",
                &[
                    &quiz.id,
                    &quiz.author_id,
                    &quiz.dead_names,
                    &quiz.dead_last_name,
                    &quiz.chosen_names,
                    &quiz.chosen_last_name,
                    &quiz.nickname,
                    &order,
                    &drop_question,
                    &quiz.redirect,
                ],
            )
            .await?
        {
            1 => Ok(()),
            0 => Err(error::Error::NotFound),
            _ => Err(error::Error::Fatal),
        }
    }

    pub async fn update_question(&self, question: &FullQuestion) -> error::Result<()> {
        match self
            .0
            .execute(
                "UPDATE questions SET content = $3, is_multiple_choice = $4, answers = $5, correct_answer = $6 \
                 WHERE id = $1 AND quiz = $2",
                &[
                    &question.id,
                    &question.quiz,
                    &question.content,
                    &question.is_multiple_choice,
                    &question.answers,
                    &question.correct_answer,
                ],
            )
            .await?
        {
            1 => Ok(()),
            0 => Err(error::Error::NotFound),
            _ => Err(error::Error::Fatal),
        }
    }

    /// Deletes a quiz (and by cascade its questions) if `author` owns it.
    pub async fn delete_quiz(&self, id: &str, author: &str) -> error::Result<Quiz> {
        let row = self
            .0
            .query_opt(
                "DELETE FROM quiz WHERE id = $1 AND author = $2 \
                 RETURNING id, author, deadname, deadlastname, chosenname, chosenlastname, nickname, question_order, drop_question, redirect",
                &[&id, &author],
            )
            .await?
            .ok_or(error::Error::NotFound)?;
        deserialize_quiz_from_row(&row)
    }

    pub async fn username_exists(&self, username: &str) -> error::Result<bool> {
        let row = self.0.query_one("SELECT EXISTS (SELECT 1 FROM ppl WHERE username = $1) AS found", &[&username]).await?;
        Ok(row.try_get("found")?)
    }

    pub async fn token_exists(&self, token: &str) -> error::Result<bool> {
        let row = self.0.query_one("SELECT EXISTS (SELECT 1 FROM ppl WHERE token = $1) AS found", &[&token]).await?;
        Ok(row.try_get("found")?)
    }

    pub async fn create_account(&self, id: &str, token: &str, username: &str, password: &str) -> error::Result<()> {
        match self
            .0
            .execute(
                "INSERT INTO ppl (id, token, username, password) VALUES ($1, $2, $3, $4)",
                &[&id, &token, &username, &password],
            )
            .await?
        {
            1 => Ok(()),
            _ => Err(error::Error::Fatal),
        }
    }

    pub async fn get_account(&self, username: &str) -> error::Result<Account> {
        let row = self
            .0
            .query_opt("SELECT id, token, password FROM ppl WHERE username = $1", &[&username])
            .await?
            .ok_or(error::Error::NotFound)?;
        Ok(Account { id: row.try_get("id")?, token: row.try_get("token")?, password: row.try_get("password")? })
    }

    /// Encoded password hash of the account.
    pub async fn get_password(&self, id: &str) -> error::Result<String> {
        let row = self
            .0
            .query_opt("SELECT password FROM ppl WHERE id = $1", &[&id])
            .await?
            .ok_or(error::Error::NotFound)?;
        Ok(row.try_get("password")?)
    }

    /// Replaces the password hash and the bearer token of an account at once.
    pub async fn set_password(&self, id: &str, password: &str, token: &str) -> error::Result<()> {
        match self
            .0
            .execute("UPDATE ppl SET password = $2, token = $3 WHERE id = $1", &[&id, &password, &token])
            .await?
        {
            1 => Ok(()),
            0 => Err(error::Error::NotFound),
            _ => Err(error::Error::Fatal),
        }
    }

    /// Account that owns the bearer token.
    pub async fn get_account_id(&self, token: &str) -> error::Result<String> {
        let row = self
            .0
            .query_opt("SELECT id FROM ppl WHERE token = $1", &[&token])
            .await?
            .ok_or(error::Error::NotFound)?;
        Ok(row.try_get("id")?)
    }
}
