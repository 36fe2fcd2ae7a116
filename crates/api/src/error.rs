use core::fmt::{self, Display};
use engine::error::Violations;
use hyper::StatusCode;

#[derive(Debug)]
pub enum Error {
    /// Unknown quiz, question or route.
    NotFound,
    /// The submission broke one or more field rules.
    Validation(Violations),
    /// The username is already taken.
    Conflict,
    /// Missing or unknown token, wrong password, or not the author.
    Unauthorized,
    /// The request body could not be decoded.
    BadRequest,
    /// Storage, hashing or encoding failure on our end.
    Internal,
}

impl Error {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// One message per problem. Validation failures list every rejected field.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(violations) => violations.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Resource not found.",
            Self::Validation(violations) => return Display::fmt(violations, f),
            Self::Conflict => "This username is already taken.",
            Self::Unauthorized => "You are not allowed to do this.",
            Self::BadRequest => "Malformed request body.",
            Self::Internal => "We encountered an unexpected error on our end.",
        })
    }
}

impl From<Violations> for Error {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations)
    }
}

impl From<model::id::ParseIdError> for Error {
    fn from(_: model::id::ParseIdError) -> Self {
        Self::NotFound
    }
}

impl From<engine::Error> for Error {
    fn from(err: engine::Error) -> Self {
        match err {
            engine::Error::NotFound => Self::NotFound,
            engine::Error::Validation(violations) => Self::Validation(violations),
        }
    }
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        use db::error::Error as DbError;
        match err {
            DbError::NotFound => Self::NotFound,
            DbError::AlreadyExists => Self::Conflict,
            DbError::BadInput => Self::BadRequest,
            DbError::Fatal => Self::Internal,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use engine::error::Problem;

    #[test]
    fn validation_lists_every_field() {
        let mut violations = Violations::default();
        violations.push("quiz.nickname", Problem::TooShort);
        violations.push("questions", Problem::Count { min: 3, max: 3 });

        let err = Error::from(violations);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.messages(),
            ["Key 'quiz.nickname' is too short.", "Key 'questions' needs exactly 3 entries."]
        );
    }

    #[test]
    fn storage_errors_map_to_statuses() {
        assert_eq!(Error::from(db::error::Error::AlreadyExists).status(), StatusCode::CONFLICT);
        assert_eq!(Error::from(db::error::Error::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::from(db::error::Error::Fatal).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::from(engine::Error::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Unauthorized.messages(), ["You are not allowed to do this."]);
    }
}
