//! Answer checking and the transitions of a respondent's traversal.
//!
//! A traversal walks through nine slots: three base questions in section 1,
//! then two base questions and one special question in each of sections 2 and
//! 3. Nothing is remembered between calls; the caller supplies the question
//! being answered and gets back where to go next.

use crate::{
    error::{Error, Result},
    resolver,
    variants::{normalize, Classifier, Outcome},
};
use model::{FullQuestion, Position, Quiz, Section, SpecialKind};

/// The question a respondent is answering.
#[derive(Clone, Copy, Debug)]
pub enum Subject<'a> {
    Ordinary { question: &'a FullQuestion, section: Section },
    Special(SpecialKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition<'q> {
    /// Wrong answer. The respondent stays on the same question.
    Retry,
    /// Right answer. The respondent moves on to this position.
    Advance(Position),
    /// Right answer and the quiz is over. Holds the redirect URL.
    Finish(&'q str),
}

/// Checks an answer to a base question.
pub fn is_correct(question: &FullQuestion, answer: &str) -> bool {
    let answer = normalize(answer);
    if !question.is_multiple_choice {
        return question.answers.iter().any(|accepted| *accepted == answer);
    }

    let correct = usize::try_from(question.correct_answer).ok().and_then(|index| question.answers.get(index));
    match correct {
        Some(correct) => *correct == answer,
        None => {
            // Corrupted index: let the respondent through instead of locking them out.
            log::warn!(
                "question {} has correct answer index {} but only {} choices",
                question.id,
                question.correct_answer,
                question.answers.len()
            );
            true
        }
    }
}

/// Slot that follows a correctly answered base question.
pub fn successor(position: Position) -> Option<Position> {
    match (position.section(), position.index()) {
        (Section::One, 3) => Position::new(Section::Two, 1),
        (_, 3) => None,
        (section, index) => Position::new(section, index + 1),
    }
}

/// Evaluates an answer against the quiz and computes the transition.
pub fn evaluate<'q>(quiz: &'q Quiz, subject: Subject<'_>, answer: &str) -> Result<Transition<'q>> {
    match subject {
        Subject::Ordinary { question, section } => {
            if question.quiz != quiz.id {
                return Err(Error::NotFound);
            }
            let position = resolver::locate(quiz, &question.id, section)?;
            if !is_correct(question, answer) {
                return Ok(Transition::Retry);
            }
            successor(position).map(Transition::Advance).ok_or(Error::NotFound)
        }
        Subject::Special(kind) => Ok(match Classifier::new(kind, quiz).classify(answer) {
            None => Transition::Retry,
            Some(Outcome::Continue) => Position::new(Section::Three, 1).map_or(Transition::Retry, Transition::Advance),
            Some(Outcome::Reveal) => Transition::Finish(&quiz.redirect),
        }),
    }
}
