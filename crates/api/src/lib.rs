mod auth;
mod question;
mod quiz;

pub mod error;
pub mod registry;
pub mod snowflake;

pub use db::{Config, Database, NoTls};

use error::{Error, Result};
use http_body_util::{BodyExt, Full, Limited};
use hyper::{
    body::{Body, Bytes},
    header::{HeaderValue, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};
use registry::Registry;
use serde::{de::DeserializeOwned, Serialize};
use snowflake::Snowflake;

/// Request bodies beyond this many bytes are rejected outright.
const MAX_BODY_SIZE: usize = 16 * 1024;

/// Endpoint selected by the method and path of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route<'p> {
    Register,
    Exchange,
    ChangePassword,
    CreateQuiz,
    GetQuiz(&'p str),
    EditQuiz(&'p str),
    DeleteQuiz(&'p str),
    ListQuestions(&'p str),
    EditQuestion { quiz: &'p str, base: &'p str },
    Start(&'p str),
    GetQuestion(&'p str),
    AnswerQuestion(&'p str),
}

impl<'p> Route<'p> {
    fn parse(method: &Method, path: &'p str) -> Option<Self> {
        let segments: Vec<_> = path.trim_matches('/').split('/').collect();
        Some(match (method, segments.as_slice()) {
            (&Method::POST, ["users"]) => Self::Register,
            (&Method::POST, ["users", "token"]) => Self::Exchange,
            (&Method::PUT, ["users", "password"]) => Self::ChangePassword,
            (&Method::POST, ["quiz"]) => Self::CreateQuiz,
            (&Method::GET, ["quiz", id]) => Self::GetQuiz(*id),
            (&Method::PUT, ["quiz", id]) => Self::EditQuiz(*id),
            (&Method::DELETE, ["quiz", id]) => Self::DeleteQuiz(*id),
            (&Method::GET, ["quiz", id, "questions"]) => Self::ListQuestions(*id),
            (&Method::PUT, ["quiz", quiz, "questions", base]) => Self::EditQuestion { quiz: *quiz, base: *base },
            (&Method::GET, ["quiz", id, "start"]) => Self::Start(*id),
            (&Method::GET, ["questions", id]) => Self::GetQuestion(*id),
            (&Method::POST, ["questions", id]) => Self::AnswerQuestion(*id),
            _ => return None,
        })
    }
}

async fn read_json<B, T>(body: B) -> Result<T>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    T: DeserializeOwned,
{
    let bytes = Limited::new(body, MAX_BODY_SIZE).collect().await.map_err(|_| Error::BadRequest)?.to_bytes();
    serde_json::from_slice(&bytes).map_err(|_| Error::BadRequest)
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    *res.status_mut() = status;
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json")).is_none());
    res
}

fn respond<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Full<Bytes>>> {
    let bytes = serde_json::to_vec(value).map_err(|_| Error::Internal)?;
    Ok(json_response(status, bytes))
}

fn error_response(err: &Error) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": err.messages() });
    json_response(err.status(), body.to_string().into_bytes())
}

/// Shared state of the service.
pub struct App {
    db: Database,
    registry: Registry,
    ids: Snowflake,
}

impl App {
    pub fn new(db: Database, ids: Snowflake) -> Self {
        Self { db, registry: Registry::default(), ids }
    }

    pub async fn on_request<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        match self.try_respond(req).await {
            Ok(res) => {
                log::debug!("{method} {path} -> {}", res.status());
                res
            }
            Err(err) => {
                log::debug!("{method} {path} -> {}: {err}", err.status());
                error_response(&err)
            }
        }
    }

    async fn try_respond<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let route = Route::parse(&parts.method, parts.uri.path()).ok_or(Error::NotFound)?;
        match route {
            Route::Register => {
                let credentials = read_json(body).await?;
                respond(StatusCode::CREATED, &self.register(credentials).await?)
            }
            Route::Exchange => {
                let credentials = read_json(body).await?;
                respond(StatusCode::OK, &self.exchange(credentials).await?)
            }
            Route::ChangePassword => {
                let id = self.authenticate(&parts.headers).await?;
                let change = read_json(body).await?;
                respond(StatusCode::OK, &self.change_password(id, change).await?)
            }
            Route::CreateQuiz => {
                let author = self.authenticate(&parts.headers).await?;
                let submission = read_json(body).await?;
                respond(StatusCode::CREATED, &self.create_quiz(author, submission).await?)
            }
            Route::GetQuiz(id) => {
                let author = self.authenticate(&parts.headers).await?;
                respond(StatusCode::OK, &self.get_quiz(id, &author).await?)
            }
            Route::EditQuiz(id) => {
                let author = self.authenticate(&parts.headers).await?;
                let edit = read_json(body).await?;
                respond(StatusCode::OK, &self.edit_quiz(id, &author, edit).await?)
            }
            Route::DeleteQuiz(id) => {
                let author = self.authenticate(&parts.headers).await?;
                respond(StatusCode::OK, &self.delete_quiz(id, &author).await?)
            }
            Route::ListQuestions(id) => {
                let author = self.authenticate(&parts.headers).await?;
                respond(StatusCode::OK, &self.list_questions(id, &author).await?)
            }
            Route::EditQuestion { quiz, base } => {
                let author = self.authenticate(&parts.headers).await?;
                let draft = read_json(body).await?;
                respond(StatusCode::OK, &self.edit_question(quiz, base, &author, draft).await?)
            }
            Route::Start(id) => respond(StatusCode::OK, &self.first_question(id).await?),
            Route::GetQuestion(id) => respond(StatusCode::OK, &self.get_question(id).await?),
            Route::AnswerQuestion(id) => {
                let model::Answer { answer } = read_json(body).await?;
                respond(StatusCode::OK, &self.answer_question(id, &answer).await?)
            }
        }
    }
}
