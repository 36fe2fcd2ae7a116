use alloc::{boxed::Box, string::String};
use core::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use serde::{
    de::{Error, Unexpected},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// One of the three phases of a quiz traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Base questions addressed with a dead name.
    One,
    /// Base questions addressed with the nickname, closed by the nickname special.
    Two,
    /// Base questions addressed with a chosen name, closed by the chosen-name special.
    Three,
}

impl Section {
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    pub const fn digit(self) -> char {
        match self {
            Self::One => '1',
            Self::Two => '2',
            Self::Three => '3',
        }
    }

    pub const fn from_digit(digit: char) -> Option<Self> {
        Some(match digit {
            '1' => Self::One,
            '2' => Self::Two,
            '3' => Self::Three,
            _ => return None,
        })
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }
}

/// The synthesized question that closes sections 2 and 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    /// "What is another name for {nickname}?" Encoded as kind `2`.
    Nickname,
    /// "Who is {chosen name}?" Encoded as kind `3`.
    ChosenName,
}

impl SpecialKind {
    pub const fn section(self) -> Section {
        match self {
            Self::Nickname => Section::Two,
            Self::ChosenName => Section::Three,
        }
    }

    pub const fn from_section(section: Section) -> Option<Self> {
        match section {
            Section::One => None,
            Section::Two => Some(Self::Nickname),
            Section::Three => Some(Self::ChosenName),
        }
    }
}

/// Address of a question slot before its identifier is known. The quiz is
/// supplied alongside by whoever holds the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    section: Section,
    index: u8,
}

impl Position {
    /// Where every traversal begins.
    pub const FIRST: Self = Self { section: Section::One, index: 1 };

    /// Creates a new position. The index within a section is 1-based and at most 3.
    pub const fn new(section: Section, index: u8) -> Option<Self> {
        if index >= 1 && index <= 3 {
            Some(Self { section, index })
        } else {
            None
        }
    }

    pub const fn section(self) -> Section {
        self.section
    }

    pub const fn index(self) -> u8 {
        self.index
    }

    /// The last slot of sections 2 and 3 holds a special question instead of a base one.
    pub const fn special(self) -> Option<SpecialKind> {
        if self.index == 3 {
            SpecialKind::from_section(self.section)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseIdError;

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("malformed question identifier")
    }
}

/// Identifier of a question as exposed to respondents.
///
/// Ordinary questions are encoded as `{base}{section}` where the trailing
/// digit selects the section the base question is rendered for. Special
/// questions are encoded as `sp-{kind}-{quiz}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuestionId {
    Ordinary { base: Box<str>, section: Section },
    Special { kind: SpecialKind, quiz: Box<str> },
}

impl QuestionId {
    const SPECIAL_PREFIX: &'static str = "sp-";

    pub fn ordinary(base: &str, section: Section) -> Self {
        Self::Ordinary { base: base.into(), section }
    }

    pub fn special(kind: SpecialKind, quiz: &str) -> Self {
        Self::Special { kind, quiz: quiz.into() }
    }

    pub const fn section(&self) -> Section {
        match self {
            Self::Ordinary { section, .. } => *section,
            Self::Special { kind, .. } => kind.section(),
        }
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = text.strip_prefix(Self::SPECIAL_PREFIX) {
            let mut chars = rest.chars();
            let kind = chars.next().and_then(Section::from_digit).and_then(SpecialKind::from_section).ok_or(ParseIdError)?;
            let quiz = chars.as_str().strip_prefix('-').ok_or(ParseIdError)?;
            if quiz.is_empty() {
                return Err(ParseIdError);
            }
            return Ok(Self::special(kind, quiz));
        }

        let mut chars = text.chars();
        let section = chars.next_back().and_then(Section::from_digit).ok_or(ParseIdError)?;
        let base = chars.as_str();
        if base.is_empty() {
            return Err(ParseIdError);
        }

        Ok(Self::ordinary(base, section))
    }
}

impl Display for QuestionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary { base, section } => write!(f, "{base}{}", section.digit()),
            Self::Special { kind, quiz } => write!(f, "{}{}-{quiz}", Self::SPECIAL_PREFIX, kind.section().digit()),
        }
    }
}

impl Serialize for QuestionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(|_| D::Error::invalid_value(Unexpected::Str(&text), &"a question identifier"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parses_ordinary_identifiers() {
        let id: QuestionId = "7301948712".parse().unwrap();
        assert_eq!(id, QuestionId::ordinary("730194871", Section::Two));
        assert_eq!(id.to_string(), "7301948712");

        let id: QuestionId = "a3".parse().unwrap();
        assert_eq!(id, QuestionId::ordinary("a", Section::Three));
    }

    #[test]
    fn parses_special_identifiers() {
        let id: QuestionId = "sp-2-98765".parse().unwrap();
        assert_eq!(id, QuestionId::special(SpecialKind::Nickname, "98765"));
        assert_eq!(id.to_string(), "sp-2-98765");
        assert_eq!(id.section(), Section::Two);

        let id: QuestionId = "sp-3-abc".parse().unwrap();
        assert_eq!(id, QuestionId::special(SpecialKind::ChosenName, "abc"));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for text in ["", "1", "2", "abc", "abc4", "abc0", "sp-", "sp-1-123", "sp-4-123", "sp-2-", "sp-2", "sp-2123"] {
            assert_eq!(text.parse::<QuestionId>(), Err(ParseIdError), "{text:?} should not parse");
        }
    }

    #[test]
    fn positions_stay_within_sections() {
        assert!(Position::new(Section::One, 0).is_none());
        assert!(Position::new(Section::Two, 4).is_none());
        assert_eq!(Position::new(Section::One, 1), Some(Position::FIRST));
        assert_eq!(Position::new(Section::One, 3).unwrap().special(), None);
        assert_eq!(Position::new(Section::Two, 3).unwrap().special(), Some(SpecialKind::Nickname));
        assert_eq!(Position::new(Section::Three, 3).unwrap().special(), Some(SpecialKind::ChosenName));
        assert_eq!(Position::new(Section::Three, 2).unwrap().special(), None);
    }

    #[test]
    fn identifiers_serialize_as_strings() {
        let id = QuestionId::ordinary("42", Section::One);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"421\"");
        let back: QuestionId = serde_json::from_str("\"sp-3-42\"").unwrap();
        assert_eq!(back, QuestionId::special(SpecialKind::ChosenName, "42"));
        assert!(serde_json::from_str::<QuestionId>("\"sp-9-42\"").is_err());
    }
}
