//! Engine configuration.
//!
//! This module defines the execution modes a [`Scenario`](crate::Scenario)
//! can run in and how they are read from the environment.

use std::{env::VarError, fmt, str::FromStr};

use thiserror::Error;

/// When recorded steps run.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Resolve and run each step inside the call that records it.
    Eager,
    /// Buffer steps and run them in order on [`Scenario::run`](crate::Scenario::run).
    Deferred,
}

impl ExecutionMode {
    /// The library default (currently [`Deferred`](Self::Deferred)).
    pub const DEFAULT: ExecutionMode = ExecutionMode::Deferred;

    /// Environment variable consulted by [`Self::from_env`].
    pub const ENV_VAR: &'static str = "SCENARIO_MODE";

    /// Read the mode from [`Self::ENV_VAR`].
    ///
    /// Falls back to [`Self::DEFAULT`] when the variable is unset. An
    /// unrecognised or non-Unicode value is logged and also falls back to the
    /// default.
    #[must_use]
    pub fn from_env() -> Self { Self::from_var(std::env::var(Self::ENV_VAR)) }

    fn from_var(value: Result<String, VarError>) -> Self {
        match value {
            Ok(value) => value.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to {}", Self::DEFAULT);
                Self::DEFAULT
            }),
            Err(VarError::NotPresent) => Self::DEFAULT,
            Err(err @ VarError::NotUnicode(_)) => {
                tracing::warn!(%err, var = Self::ENV_VAR, "falling back to {}", Self::DEFAULT);
                Self::DEFAULT
            }
        }
    }

    /// The mode's name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Eager => "eager",
            ExecutionMode::Deferred => "deferred",
        }
    }
}

impl Default for ExecutionMode {
    fn default() -> Self { ExecutionMode::DEFAULT }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Error returned when text does not name an [`ExecutionMode`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown execution mode {0:?}; expected \"eager\" or \"deferred\"")]
pub struct ParseModeError(String);

impl FromStr for ExecutionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("eager") {
            Ok(ExecutionMode::Eager)
        } else if trimmed.eq_ignore_ascii_case("deferred") {
            Ok(ExecutionMode::Deferred)
        } else {
            Err(ParseModeError(trimmed.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env::VarError, ffi::OsString};

    use rstest::rstest;
    use tracing_test::traced_test;

    use super::ExecutionMode;

    #[rstest]
    #[case("eager", ExecutionMode::Eager)]
    #[case("Deferred", ExecutionMode::Deferred)]
    #[case("  EAGER\n", ExecutionMode::Eager)]
    fn parses_modes(#[case] text: &str, #[case] expected: ExecutionMode) {
        assert_eq!(text.parse::<ExecutionMode>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_modes() {
        let err = "lazy"
            .parse::<ExecutionMode>()
            .expect_err("lazy is not a mode");
        assert!(err.to_string().contains("\"lazy\""));
    }

    #[test]
    fn default_is_deferred() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Deferred);
        assert_eq!(ExecutionMode::DEFAULT.to_string(), "deferred");
    }

    #[test]
    fn unset_variable_uses_the_default() {
        assert_eq!(
            ExecutionMode::from_var(Err(VarError::NotPresent)),
            ExecutionMode::DEFAULT
        );
        assert_eq!(
            ExecutionMode::from_var(Ok("eager".to_owned())),
            ExecutionMode::Eager
        );
    }

    #[test]
    #[traced_test]
    fn unknown_values_warn_and_use_the_default() {
        assert_eq!(
            ExecutionMode::from_var(Ok("lazy".to_owned())),
            ExecutionMode::DEFAULT
        );
        assert!(logs_contain("falling back to deferred"));
    }

    #[test]
    #[traced_test]
    fn non_unicode_values_warn_and_use_the_default() {
        let raw = OsString::from("eager");
        assert_eq!(
            ExecutionMode::from_var(Err(VarError::NotUnicode(raw))),
            ExecutionMode::DEFAULT
        );
        assert!(logs_contain("not valid unicode"));
        assert!(logs_contain("falling back to deferred"));
    }
}
