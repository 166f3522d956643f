//! Handling of values returned by steps.

use std::{fmt::Display, rc::Rc};

use thiserror::Error;

use crate::{Scenario, resolve::Dep};

/// A step reported failure through its return value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct StepFailure(String);

impl StepFailure {
    /// Create a failure carrying `message`.
    pub fn new(message: impl Display) -> Self { Self(message.to_string()) }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str { &self.0 }
}

/// Values a step may return.
///
/// After a step returns, the engine settles its output against the running
/// scenario. Shared values are attached under their type so later steps can
/// declare them as parameters, exactly as if they had been passed to
/// [`Scenario::with_shared`].
pub trait StepOutput {
    /// Apply the output to the scenario.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFailure`] when the output represents a failed step.
    fn settle(self, scenario: &Scenario) -> Result<(), StepFailure>;
}

impl StepOutput for () {
    fn settle(self, _scenario: &Scenario) -> Result<(), StepFailure> { Ok(()) }
}

impl<T> StepOutput for Rc<T>
where
    T: ?Sized + 'static,
{
    fn settle(self, scenario: &Scenario) -> Result<(), StepFailure> {
        scenario.with_shared(self);
        Ok(())
    }
}

impl<T> StepOutput for Dep<T>
where
    T: ?Sized + 'static,
{
    fn settle(self, scenario: &Scenario) -> Result<(), StepFailure> {
        self.into_inner().settle(scenario)
    }
}

impl<O, E> StepOutput for Result<O, E>
where
    O: StepOutput,
    E: Display,
{
    fn settle(self, scenario: &Scenario) -> Result<(), StepFailure> {
        match self {
            Ok(output) => output.settle(scenario),
            Err(err) => Err(StepFailure::new(err)),
        }
    }
}
