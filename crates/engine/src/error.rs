use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Problem {
    TooShort,
    TooLong,
    /// The list does not have an acceptable number of entries.
    Count { min: usize, max: usize },
    OutOfRange,
    /// The value does not line up with what is already stored.
    Mismatch,
}

/// A single rejected field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: Box<str>,
    pub problem: Problem,
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { field, problem } = self;
        match problem {
            Problem::TooShort => write!(f, "Key '{field}' is too short."),
            Problem::TooLong => write!(f, "Key '{field}' is too long."),
            Problem::Count { min, max } if min == max => write!(f, "Key '{field}' needs exactly {min} entries."),
            Problem::Count { min, max } => write!(f, "Key '{field}' needs {min} to {max} entries."),
            Problem::OutOfRange => write!(f, "Key '{field}' is out of bounds."),
            Problem::Mismatch => write!(f, "Key '{field}' does not match the stored quiz."),
        }
    }
}

/// Every field rejected during a single validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, field: impl Into<Box<str>>, problem: Problem) {
        self.0.push(Violation { field: field.into(), problem });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Finds the problem reported for the given field, if any.
    pub fn find(&self, field: &str) -> Option<Problem> {
        self.0.iter().find_map(|v| (v.field.as_ref() == field).then_some(v.problem))
    }

    /// Yields `value` only if nothing has been rejected.
    pub fn into_result<T>(self, value: T) -> core::result::Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = core::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            Display::fmt(first, f)?;
        }
        for violation in iter {
            write!(f, " {violation}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum Error {
    /// Unknown or malformed quiz or question identifier.
    NotFound,
    /// The submission broke one or more field rules.
    Validation(Violations),
}

impl From<Violations> for Error {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("Resource not found."),
            Self::Validation(violations) => Display::fmt(violations, f),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
