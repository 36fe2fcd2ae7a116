use tokio_postgres::error::SqlState;

#[derive(Debug)]
pub enum Error {
    /// No row matched the query.
    NotFound,
    /// The object we are trying to insert already exists.
    AlreadyExists,
    /// The database rejected the values we sent.
    BadInput,
    /// Unrecoverable error.
    Fatal,
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        let code = match err.as_db_error() {
            Some(db) => db.code(),
            None => {
                log::error!("database client error: {err}");
                return Self::Fatal;
            }
        };

        if *code == SqlState::UNIQUE_VIOLATION {
            Self::AlreadyExists
        } else if *code == SqlState::FOREIGN_KEY_VIOLATION {
            Self::NotFound
        } else if *code == SqlState::CHECK_VIOLATION || *code == SqlState::STRING_DATA_RIGHT_TRUNCATION {
            Self::BadInput
        } else {
            log::error!("unexpected database error: {err}");
            Self::Fatal
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
