//! Maps positions within a quiz to question identifiers and renders the
//! questions behind them.

use crate::error::{Error, Result};
use alloc::{format, string::String, vec::Vec};
use model::{FullQuestion, Position, Question, QuestionId, Quiz, Section, SpecialKind};

/// Placeholder in base question prompts that gets replaced by a name.
pub const PLACEHOLDER: &str = "{{name}}";

/// Base questions asked in the given section, in order. Section 1 asks all
/// three; sections 2 and 3 skip the dropped one.
pub fn effective_order(order: &[String; 3], drop_question: u8, section: Section) -> Vec<&str> {
    let dropped = match section {
        Section::One => None,
        Section::Two | Section::Three => Some(usize::from(drop_question)),
    };
    order
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != dropped)
        .map(|(_, id)| id.as_str())
        .collect()
}

/// Identifier of the question that lives at the given position.
pub fn resolve(quiz: &Quiz, position: Position) -> Result<QuestionId> {
    if let Some(kind) = position.special() {
        return Ok(QuestionId::special(kind, &quiz.id));
    }

    let section = position.section();
    let order = effective_order(&quiz.order, quiz.drop_question, section);
    let index = usize::from(position.index()) - 1;
    let base = order.get(index).ok_or(Error::NotFound)?;
    Ok(QuestionId::ordinary(base, section))
}

/// Inverse of [`resolve`] for ordinary questions. Base questions that are not
/// asked in the given section do not have a position.
pub fn locate(quiz: &Quiz, base: &str, section: Section) -> Result<Position> {
    let order = effective_order(&quiz.order, quiz.drop_question, section);
    let index = order.iter().position(|&id| id == base).ok_or(Error::NotFound)?;
    u8::try_from(index + 1).ok().and_then(|index| Position::new(section, index)).ok_or(Error::NotFound)
}

/// Title-cases every word of a name.
fn capitalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if c.is_whitespace() {
            word_start = true;
            out.push(c);
        } else if word_start {
            word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Synthesizes one of the two special questions.
pub fn special(quiz: &Quiz, kind: SpecialKind) -> Question {
    let content = match kind {
        SpecialKind::Nickname => format!("What is another name for {}?", capitalize(&quiz.nickname)),
        SpecialKind::ChosenName => format!("Who is {}?", capitalize(quiz.chosen_name())),
    };
    Question { id: QuestionId::special(kind, &quiz.id), content, is_multiple_choice: false, answers: Vec::new() }
}

/// Renders a stored base question for a section of its quiz.
pub fn render(quiz: &Quiz, question: &FullQuestion, section: Section) -> Result<Question> {
    if question.quiz != quiz.id {
        return Err(Error::NotFound);
    }
    locate(quiz, &question.id, section)?;

    let name = match section {
        Section::One => quiz.dead_name(),
        Section::Two => quiz.nickname.as_str(),
        Section::Three => quiz.chosen_name(),
    };

    Ok(Question {
        id: QuestionId::ordinary(&question.id, section),
        content: question.content.replace(PLACEHOLDER, name),
        is_multiple_choice: question.is_multiple_choice,
        answers: if question.is_multiple_choice { question.answers.clone() } else { Vec::new() },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    fn quiz(drop_question: u8) -> Quiz {
        Quiz {
            id: String::from("900"),
            author_id: String::from("1"),
            dead_names: vec![String::from("Pat"), String::from("Patty")],
            dead_last_name: String::from("Doe"),
            chosen_names: vec![String::from("Sam")],
            chosen_last_name: String::from("Lee"),
            nickname: String::from("sunny boo"),
            order: [String::from("11"), String::from("22"), String::from("33")],
            drop_question,
            redirect: String::from("https://example.com/hi"),
        }
    }

    fn base(id: &str) -> FullQuestion {
        FullQuestion {
            id: id.to_string(),
            quiz: String::from("900"),
            content: String::from("What does {{name}} drink?"),
            is_multiple_choice: false,
            answers: vec![String::from("tea")],
            correct_answer: 0,
        }
    }

    fn at(section: Section, index: u8) -> Position {
        Position::new(section, index).unwrap()
    }

    #[test]
    fn later_sections_never_include_the_dropped_question() {
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let ids = ["x", "y", "z"];
        for perm in permutations {
            let order = perm.map(|i| ids[i].to_string());
            for drop_question in 0..3u8 {
                assert_eq!(effective_order(&order, drop_question, Section::One).len(), 3);
                for section in [Section::Two, Section::Three] {
                    let effective = effective_order(&order, drop_question, section);
                    assert_eq!(effective.len(), 2);
                    assert!(!effective.contains(&order[usize::from(drop_question)].as_str()));
                }
            }
        }
    }

    #[test]
    fn resolves_every_position() {
        let quiz = quiz(1);
        let ids: Vec<_> = Section::ALL
            .into_iter()
            .flat_map(|section| (1..=3).map(move |i| at(section, i)))
            .map(|position| resolve(&quiz, position).unwrap().to_string())
            .collect();
        assert_eq!(ids, ["111", "221", "331", "112", "332", "sp-2-900", "113", "333", "sp-3-900"]);
    }

    #[test]
    fn first_position_renders_the_first_base_question_with_a_dead_name() {
        let quiz = quiz(2);
        let id = resolve(&quiz, Position::FIRST).unwrap();
        assert_eq!(id, QuestionId::ordinary("11", Section::One));

        let question = render(&quiz, &base("11"), id.section()).unwrap();
        assert_eq!(question.id.to_string(), "111");
        assert_eq!(question.content, "What does Pat drink?");
        assert!(question.answers.is_empty());
    }

    #[test]
    fn substitutes_nickname_and_chosen_name() {
        let quiz = quiz(2);
        assert_eq!(render(&quiz, &base("22"), Section::Two).unwrap().content, "What does sunny boo drink?");
        assert_eq!(render(&quiz, &base("22"), Section::Three).unwrap().content, "What does Sam drink?");
    }

    #[test]
    fn dropped_and_foreign_questions_are_not_found() {
        let quiz = quiz(2);
        assert!(matches!(render(&quiz, &base("33"), Section::Two), Err(Error::NotFound)));
        assert!(render(&quiz, &base("33"), Section::One).is_ok());

        let mut foreign = base("11");
        foreign.quiz = String::from("901");
        assert!(matches!(render(&quiz, &foreign, Section::One), Err(Error::NotFound)));
        assert!(matches!(locate(&quiz, "44", Section::One), Err(Error::NotFound)));
    }

    #[test]
    fn locate_inverts_resolve() {
        let quiz = quiz(0);
        assert_eq!(locate(&quiz, "22", Section::Two).unwrap(), at(Section::Two, 1));
        assert_eq!(locate(&quiz, "33", Section::Three).unwrap(), at(Section::Three, 2));
        assert_eq!(locate(&quiz, "33", Section::One).unwrap(), at(Section::One, 3));
    }

    #[test]
    fn specials_title_case_their_names() {
        let quiz = quiz(0);
        assert_eq!(special(&quiz, SpecialKind::Nickname).content, "What is another name for Sunny Boo?");
        assert_eq!(special(&quiz, SpecialKind::ChosenName).content, "Who is Sam?");
        assert_eq!(special(&quiz, SpecialKind::ChosenName).id.to_string(), "sp-3-900");
    }
}
