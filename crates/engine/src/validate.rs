//! Field rules for everything an author or a new account submits.
//!
//! Each check trims its input in place and records at most one violation per
//! field. Nothing here touches storage: a submission is either fully accepted
//! or rejected with the complete list of problems.

use crate::error::{Problem, Violations};
use alloc::{
    collections::BTreeSet,
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::ops::RangeInclusive;
use model::{NewQuiz, Quiz, QuestionDraft, QuizDraft, QuizEdit};

pub const NAME_LEN: RangeInclusive<usize> = 2..=33;
pub const NAME_COUNT: RangeInclusive<usize> = 1..=4;
pub const REDIRECT_LEN: RangeInclusive<usize> = 1..=512;
pub const CONTENT_LEN: RangeInclusive<usize> = 2..=65;
pub const ANSWER_LEN: RangeInclusive<usize> = 2..=33;
pub const ANSWER_COUNT: RangeInclusive<usize> = 1..=4;
pub const CREDENTIAL_LEN: RangeInclusive<usize> = 7..=33;
pub const QUESTION_COUNT: usize = 3;

fn check_len(text: &str, field: &str, bounds: &RangeInclusive<usize>, errors: &mut Violations) -> bool {
    let len = text.len();
    let problem = if len < *bounds.start() {
        Problem::TooShort
    } else if len > *bounds.end() {
        Problem::TooLong
    } else {
        return true;
    };
    errors.push(field, problem);
    false
}

fn clean(text: &mut String, field: &str, bounds: &RangeInclusive<usize>, errors: &mut Violations) -> bool {
    let trimmed = text.trim();
    if trimmed.len() != text.len() {
        *text = trimmed.to_string();
    }
    check_len(text, field, bounds, errors)
}

fn clean_names(names: &mut [String], field: &str, errors: &mut Violations) {
    for (i, name) in names.iter_mut().enumerate() {
        clean(name, &format!("{field}[{i}]"), &NAME_LEN, errors);
    }
}

fn check_count(len: usize, field: &str, bounds: &RangeInclusive<usize>, errors: &mut Violations) {
    if !bounds.contains(&len) {
        errors.push(field, Problem::Count { min: *bounds.start(), max: *bounds.end() });
    }
}

/// Quiz metadata that passed every rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub dead_names: Vec<String>,
    pub dead_last_name: String,
    pub chosen_names: Vec<String>,
    pub chosen_last_name: String,
    pub nickname: String,
    pub drop_question: u8,
    pub redirect: String,
}

impl Metadata {
    pub fn into_quiz(self, id: String, author_id: String, order: [String; 3]) -> Quiz {
        let Self { dead_names, dead_last_name, chosen_names, chosen_last_name, nickname, drop_question, redirect } = self;
        Quiz {
            id,
            author_id,
            dead_names,
            dead_last_name,
            chosen_names,
            chosen_last_name,
            nickname,
            order,
            drop_question,
            redirect,
        }
    }
}

fn quiz_into(draft: QuizDraft, errors: &mut Violations) -> Option<Metadata> {
    let QuizDraft { mut dead_names, mut dead_last_name, mut chosen_names, mut chosen_last_name, mut nickname, drop_question, mut redirect } =
        draft;

    clean(&mut dead_last_name, "quiz.deadLastName", &NAME_LEN, errors);
    clean(&mut nickname, "quiz.nickname", &NAME_LEN, errors);
    clean(&mut redirect, "quiz.redirect", &REDIRECT_LEN, errors);

    chosen_last_name = chosen_last_name.trim().to_string();
    if chosen_last_name.is_empty() {
        chosen_last_name.clone_from(&dead_last_name);
    } else {
        check_len(&chosen_last_name, "quiz.chosenLastName", &NAME_LEN, errors);
    }

    check_count(dead_names.len(), "quiz.deadNames", &NAME_COUNT, errors);
    clean_names(&mut dead_names, "quiz.deadNames", errors);
    check_count(chosen_names.len(), "quiz.chosenNames", &NAME_COUNT, errors);
    clean_names(&mut chosen_names, "quiz.chosenNames", errors);

    let Some(drop_question) = u8::try_from(drop_question).ok().filter(|&d| usize::from(d) < QUESTION_COUNT) else {
        errors.push("quiz.dropQuestion", Problem::OutOfRange);
        return None;
    };

    Some(Metadata { dead_names, dead_last_name, chosen_names, chosen_last_name, nickname, drop_question, redirect })
}

/// Validates quiz metadata on its own.
pub fn quiz(draft: QuizDraft) -> Result<Metadata, Violations> {
    let mut errors = Violations::default();
    let metadata = quiz_into(draft, &mut errors);
    match metadata {
        Some(metadata) => errors.into_result(metadata),
        None => Err(errors),
    }
}

fn question_into(draft: &mut QuestionDraft, field: &str, errors: &mut Violations) {
    clean(&mut draft.content, &format!("{field}.content"), &CONTENT_LEN, errors);

    // Answers are matched case-insensitively, so store them lower-cased once.
    let mut seen = BTreeSet::new();
    let mut answers = Vec::with_capacity(draft.answers.len());
    for (i, answer) in core::mem::take(&mut draft.answers).into_iter().enumerate() {
        let mut answer = answer.to_lowercase();
        if !clean(&mut answer, &format!("{field}.answers[{i}]"), &ANSWER_LEN, errors) {
            continue;
        }
        if seen.insert(answer.clone()) {
            answers.push(answer);
        }
    }
    draft.answers = answers;
    check_count(draft.answers.len(), &format!("{field}.answers"), &ANSWER_COUNT, errors);

    if draft.is_multiple_choice {
        let in_range = usize::try_from(draft.correct_answer).is_ok_and(|i| i < draft.answers.len());
        if !in_range {
            errors.push(format!("{field}.correctAnswer"), Problem::OutOfRange);
        }
    } else {
        draft.correct_answer = 0;
    }
}

/// Validates a single base question. The answers come back lower-cased and de-duplicated.
pub fn question(mut draft: QuestionDraft) -> Result<QuestionDraft, Violations> {
    let mut errors = Violations::default();
    question_into(&mut draft, "question", &mut errors);
    errors.into_result(draft)
}

/// Validates a whole creation request before anything is persisted.
pub fn new_quiz(submission: NewQuiz) -> Result<(Metadata, [QuestionDraft; 3]), Violations> {
    let NewQuiz { quiz, questions } = submission;
    let mut errors = Violations::default();
    let metadata = quiz_into(quiz, &mut errors);

    let questions = match <[QuestionDraft; 3]>::try_from(questions) {
        Ok(mut questions) => {
            for (i, question) in questions.iter_mut().enumerate() {
                question_into(question, &format!("questions[{i}]"), &mut errors);
            }
            Some(questions)
        }
        Err(_) => {
            errors.push("questions", Problem::Count { min: QUESTION_COUNT, max: QUESTION_COUNT });
            None
        }
    };

    match (metadata, questions) {
        (Some(metadata), Some(questions)) => errors.into_result((metadata, questions)),
        _ => Err(errors),
    }
}

/// Validates a wholesale edit. The new order must be a permutation of the
/// base questions the quiz already owns.
pub fn edit(edit: QuizEdit, current: &[String; 3]) -> Result<(Metadata, [String; 3]), Violations> {
    let QuizEdit { quiz, order } = edit;
    let mut errors = Violations::default();
    let metadata = quiz_into(quiz, &mut errors);

    let unique: BTreeSet<_> = order.iter().collect();
    let permutes = order.len() == QUESTION_COUNT && unique.len() == QUESTION_COUNT && order.iter().all(|id| current.contains(id));
    drop(unique);

    let order: Option<[String; 3]> = if permutes {
        order.try_into().ok()
    } else {
        errors.push("order", Problem::Mismatch);
        None
    };

    match (metadata, order) {
        (Some(metadata), Some(order)) => errors.into_result((metadata, order)),
        _ => Err(errors),
    }
}

/// Validates registration credentials. Usernames are trimmed; passwords are taken verbatim.
pub fn credentials(username: &mut String, password: &str) -> Result<(), Violations> {
    let mut errors = Violations::default();
    clean(username, "username", &CREDENTIAL_LEN, &mut errors);
    check_len(password, "password", &CREDENTIAL_LEN, &mut errors);
    errors.into_result(())
}

/// Validates a replacement password.
pub fn password(password: &str) -> Result<(), Violations> {
    let mut errors = Violations::default();
    check_len(password, "newPassword", &CREDENTIAL_LEN, &mut errors);
    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn draft() -> QuizDraft {
        QuizDraft {
            dead_names: names(&["Pat"]),
            dead_last_name: String::from("Doe"),
            chosen_names: names(&["Sam"]),
            chosen_last_name: String::new(),
            nickname: String::from("Sunny"),
            drop_question: 1,
            redirect: String::from("https://example.com/reveal"),
        }
    }

    fn question_draft() -> QuestionDraft {
        QuestionDraft {
            content: String::from("Does {{name}} like tea?"),
            is_multiple_choice: false,
            answers: names(&["Yes", "yes ", "Definitely"]),
            correct_answer: 0,
        }
    }

    fn submission(count: usize) -> NewQuiz {
        NewQuiz { quiz: draft(), questions: vec![question_draft(); count] }
    }

    #[test]
    fn accepts_a_complete_submission() {
        let (metadata, questions) = new_quiz(submission(3)).unwrap();
        assert_eq!(metadata.chosen_last_name, "Doe");
        assert_eq!(metadata.drop_question, 1);
        for question in &questions {
            assert_eq!(question.answers, names(&["yes", "definitely"]));
        }
    }

    #[test]
    fn rejects_wrong_question_counts() {
        for count in [0, 1, 2, 4, 5] {
            let errors = new_quiz(submission(count)).unwrap_err();
            assert_eq!(errors.find("questions"), Some(Problem::Count { min: 3, max: 3 }), "{count} questions");
        }
    }

    #[test]
    fn rejects_drop_question_out_of_bounds() {
        for drop_question in [-1, 3, 4, 300] {
            let mut sub = submission(3);
            sub.quiz.drop_question = drop_question;
            let errors = new_quiz(sub).unwrap_err();
            assert_eq!(errors.find("quiz.dropQuestion"), Some(Problem::OutOfRange));
        }
        for drop_question in 0..=2 {
            let mut sub = submission(3);
            sub.quiz.drop_question = drop_question;
            assert!(new_quiz(sub).is_ok());
        }
    }

    #[test]
    fn rejects_bad_name_array_sizes() {
        let mut sub = submission(3);
        sub.quiz.dead_names.clear();
        sub.quiz.chosen_names = names(&["Sam", "Sammy", "Samuel", "Sami", "Samwise"]);
        let errors = new_quiz(sub).unwrap_err();
        assert_eq!(errors.find("quiz.deadNames"), Some(Problem::Count { min: 1, max: 4 }));
        assert_eq!(errors.find("quiz.chosenNames"), Some(Problem::Count { min: 1, max: 4 }));
    }

    #[test]
    fn reports_one_entry_per_field() {
        let mut sub = submission(3);
        sub.quiz.nickname = String::from(" x ");
        sub.quiz.dead_names = names(&["P", "Patricia"]);
        sub.questions[1].content = String::from("?");
        sub.questions[2].is_multiple_choice = true;
        sub.questions[2].correct_answer = 7;
        let errors = new_quiz(sub).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.find("quiz.nickname"), Some(Problem::TooShort));
        assert_eq!(errors.find("quiz.deadNames[0]"), Some(Problem::TooShort));
        assert_eq!(errors.find("questions[1].content"), Some(Problem::TooShort));
        assert_eq!(errors.find("questions[2].correctAnswer"), Some(Problem::OutOfRange));
    }

    #[test]
    fn rejects_too_many_answers_after_deduplication() {
        let mut draft = question_draft();
        draft.answers = names(&["one", "two", "three", "four", "five"]);
        let errors = question(draft).unwrap_err();
        assert_eq!(errors.find("question.answers"), Some(Problem::Count { min: 1, max: 4 }));

        let mut draft = question_draft();
        draft.answers = names(&["One", "ONE", "one", "two", "Two"]);
        assert_eq!(question(draft).unwrap().answers, names(&["one", "two"]));
    }

    #[test]
    fn edits_must_permute_existing_questions() {
        let current = [String::from("a"), String::from("b"), String::from("c")];
        let edited = edit(QuizEdit { quiz: draft(), order: names(&["c", "a", "b"]) }, &current).unwrap();
        assert_eq!(edited.1, [String::from("c"), String::from("a"), String::from("b")]);

        for order in [names(&["a", "a", "b"]), names(&["a", "b"]), names(&["a", "b", "z"])] {
            let errors = edit(QuizEdit { quiz: draft(), order }, &current).unwrap_err();
            assert_eq!(errors.find("order"), Some(Problem::Mismatch));
        }
    }

    #[test]
    fn checks_credential_lengths() {
        let mut username = String::from("  someone  ");
        assert!(credentials(&mut username, "hunter22").is_ok());
        assert_eq!(username, "someone");

        let mut username = String::from("me");
        let errors = credentials(&mut username, "short").unwrap_err();
        assert_eq!(errors.find("username"), Some(Problem::TooShort));
        assert_eq!(errors.find("password"), Some(Problem::TooShort));
    }
}
