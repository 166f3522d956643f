//! Step keywords.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Label a step is recorded under.
///
/// Keywords are descriptive only: they appear in diagnostics but never change
/// how a step is resolved or run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// Establishes context.
    Given,
    /// Performs the action under test.
    When,
    /// Checks an outcome.
    Then,
    /// Continues whichever keyword came before it.
    And,
}

impl Keyword {
    /// Every keyword, in conventional order.
    pub const ALL: [Keyword; 4] = [Keyword::Given, Keyword::When, Keyword::Then, Keyword::And];

    /// The keyword as written in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Given => "Given",
            Keyword::When => "When",
            Keyword::Then => "Then",
            Keyword::And => "And",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Error returned when text does not name a [`Keyword`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown step keyword {0:?}")]
pub struct ParseKeywordError(String);

impl FromStr for Keyword {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Keyword::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseKeywordError(trimmed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Keyword, ParseKeywordError};

    #[rstest]
    #[case("Given", Keyword::Given)]
    #[case("when", Keyword::When)]
    #[case(" THEN ", Keyword::Then)]
    #[case("And", Keyword::And)]
    fn parses_keywords(#[case] text: &str, #[case] expected: Keyword) {
        assert_eq!(text.parse::<Keyword>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_keywords() {
        assert_eq!(
            "But".parse::<Keyword>(),
            Err(ParseKeywordError("But".to_owned()))
        );
    }

    #[test]
    fn display_matches_literal_label() {
        let labels: Vec<_> = Keyword::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["Given", "When", "Then", "And"]);
    }
}
