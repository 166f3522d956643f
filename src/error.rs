//! Error types reported by the step engine.

use thiserror::Error;

use crate::step::Keyword;

/// Failures that abort a scenario.
///
/// None of these are returned to test authors: the engine hands them to the
/// scenario's [`Reporter`](crate::report::Reporter), whose fatal path ends the
/// test.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScenarioError {
    /// A value registered as a step cannot be called.
    #[error(
        "expected step definition of kind \"function\" but got \"{actual}\" instead at:\n{file}:{line}"
    )]
    NotAFunction {
        /// Type name of the registered value.
        actual: &'static str,
        /// Source file of the registration call.
        file: &'static str,
        /// Source line of the registration call.
        line: u32,
    },
    /// A step parameter matched neither the scenario nor any attached value.
    #[error("\"{keyword} {step}\" tried to resolve an unknown type of \"{type_name}\".")]
    UnresolvedDependency {
        /// Keyword of the failing step.
        keyword: Keyword,
        /// Display name of the failing step.
        step: String,
        /// Type name of the unresolved parameter.
        type_name: &'static str,
    },
    /// A step returned an error.
    #[error("\"{keyword} {step}\" failed: {message}")]
    StepFailed {
        /// Keyword of the failing step.
        keyword: Keyword,
        /// Display name of the failing step.
        step: String,
        /// Message of the returned error.
        message: String,
    },
    /// A step was recorded after the scenario finished.
    #[error("cannot record a \"{keyword}\" step: the scenario has already finished")]
    Finished {
        /// Keyword of the rejected step.
        keyword: Keyword,
    },
}
