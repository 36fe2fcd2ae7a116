use alloc::{
    collections::{BTreeMap, BTreeSet},
    format,
    string::String,
};
use model::{Quiz, SpecialKind};

/// Canonical form of free text before any comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Every acceptable spelling of the given names: each name on its own and
/// each name followed by the surname.
pub fn name_variants(names: &[String], surname: &str) -> BTreeSet<String> {
    let surname = normalize(surname);
    let mut variants = BTreeSet::new();
    for name in names {
        let name = normalize(name);
        if !surname.is_empty() {
            variants.insert(format!("{name} {surname}"));
        }
        variants.insert(name);
    }
    variants
}

/// What a special question's answer leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Move on to section 3.
    Continue,
    /// Send the respondent to the quiz's redirect.
    Reveal,
}

/// Maps normalized name variants to the outcome they trigger.
#[derive(Clone, Debug, Default)]
pub struct Classifier(BTreeMap<String, Outcome>);

impl Classifier {
    pub fn new(kind: SpecialKind, quiz: &Quiz) -> Self {
        let mut map = BTreeMap::new();
        let dead = name_variants(&quiz.dead_names, &quiz.dead_last_name);
        match kind {
            SpecialKind::Nickname => {
                map.extend(dead.into_iter().map(|name| (name, Outcome::Continue)));
                // Chosen names are inserted last so that they win on collisions.
                let chosen = name_variants(&quiz.chosen_names, &quiz.chosen_last_name);
                map.extend(chosen.into_iter().map(|name| (name, Outcome::Reveal)));
            }
            SpecialKind::ChosenName => {
                map.extend(dead.into_iter().map(|name| (name, Outcome::Reveal)));
                map.insert(normalize(&quiz.nickname), Outcome::Reveal);
            }
        }
        Self(map)
    }

    pub fn classify(&self, answer: &str) -> Option<Outcome> {
        self.0.get(&normalize(answer)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec::Vec};

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn quiz() -> Quiz {
        Quiz {
            id: String::from("1"),
            author_id: String::from("2"),
            dead_names: strings(&["Pat"]),
            dead_last_name: String::from("Doe"),
            chosen_names: strings(&["Sam"]),
            chosen_last_name: String::from("Lee"),
            nickname: String::from("Sunny"),
            order: [String::from("a"), String::from("b"), String::from("c")],
            drop_question: 0,
            redirect: String::from("https://example.com"),
        }
    }

    #[test]
    fn pairs_every_name_with_the_surname() {
        let variants = name_variants(&strings(&["Alex", "Sam"]), "Lee");
        let expected: BTreeSet<_> = ["alex", "alex lee", "sam", "sam lee"].into_iter().map(String::from).collect();
        assert_eq!(variants, expected);
    }

    #[test]
    fn collapses_case_insensitive_duplicates() {
        let variants = name_variants(&strings(&["Alex", "ALEX", " alex "]), "LEE");
        assert_eq!(variants.len(), 2);
        assert!(variants.contains("alex lee"));
    }

    #[test]
    fn nickname_question_splits_dead_and_chosen_names() {
        let classifier = Classifier::new(SpecialKind::Nickname, &quiz());
        assert_eq!(classifier.classify("pat doe"), Some(Outcome::Continue));
        assert_eq!(classifier.classify("Pat"), Some(Outcome::Continue));
        assert_eq!(classifier.classify("sam"), Some(Outcome::Reveal));
        assert_eq!(classifier.classify("Sam Lee"), Some(Outcome::Reveal));
        assert_eq!(classifier.classify("taylor"), None);
        assert_eq!(classifier.classify("sunny"), None);
    }

    #[test]
    fn chosen_name_question_accepts_dead_names_and_nickname() {
        let classifier = Classifier::new(SpecialKind::ChosenName, &quiz());
        assert_eq!(classifier.classify("pat"), Some(Outcome::Reveal));
        assert_eq!(classifier.classify("PAT DOE"), Some(Outcome::Reveal));
        assert_eq!(classifier.classify("Sunny"), Some(Outcome::Reveal));
        assert_eq!(classifier.classify("sam"), None);
    }

    #[test]
    fn chosen_names_win_collisions() {
        let mut quiz = quiz();
        quiz.chosen_names = strings(&["Pat"]);
        let classifier = Classifier::new(SpecialKind::Nickname, &quiz);
        assert_eq!(classifier.classify("pat"), Some(Outcome::Reveal));
        assert_eq!(classifier.classify("pat doe"), Some(Outcome::Continue));
    }
}
