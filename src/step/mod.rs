//! Steps, their keywords and conversion from callables.
//!
//! A [`Step`] pairs a [`Keyword`] with a [`StepFn`]. Any closure or function
//! whose parameters implement [`FromScenario`](crate::resolve::FromScenario)
//! converts into a `StepFn` through [`IntoStep`]; its return value is handled
//! by [`StepOutput`].

mod into_step;
mod keyword;
mod name;
mod output;

pub(crate) use into_step::Interrupt;
pub use into_step::{IntoStep, NonCallable, NotAFunction, StepFn};
pub use keyword::{Keyword, ParseKeywordError};
pub use output::{StepFailure, StepOutput};

/// A recorded step waiting to run.
#[derive(Debug)]
pub struct Step {
    keyword: Keyword,
    body: StepFn,
}

impl Step {
    pub(crate) fn new(keyword: Keyword, body: StepFn) -> Self { Self { keyword, body } }

    /// Keyword the step was recorded under.
    #[must_use]
    pub fn keyword(&self) -> Keyword { self.keyword }

    /// Display name of the step function.
    #[must_use]
    pub fn name(&self) -> &str { self.body.name() }

    pub(crate) fn into_parts(self) -> (Keyword, StepFn) { (self.keyword, self.body) }
}
