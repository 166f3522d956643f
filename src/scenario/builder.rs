//! Builder for configuring a [`Scenario`] before it starts.

use std::{fmt, rc::Rc};

use super::Scenario;
use crate::{
    config::ExecutionMode,
    report::{Reporter, TracingReporter},
};

/// Configures the execution mode and reporter of a [`Scenario`].
///
/// ```rust
/// use scenario::{ExecutionMode, Phase, Scenario, report::Transcript};
///
/// let transcript = Transcript::new();
/// let scenario = Scenario::builder()
///     .mode(ExecutionMode::Eager)
///     .reporter(transcript.clone())
///     .start();
/// scenario.given(|| ());
/// assert_eq!(transcript.logs().len(), 1);
/// assert_eq!(scenario.phase(), Phase::Recording);
/// ```
#[must_use]
pub struct ScenarioBuilder {
    mode: ExecutionMode,
    reporter: Option<Box<dyn Reporter>>,
}

impl ScenarioBuilder {
    pub(super) fn new() -> Self {
        Self {
            mode: ExecutionMode::DEFAULT,
            reporter: None,
        }
    }

    /// Choose when recorded steps run.
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Read the execution mode from the environment.
    ///
    /// See [`ExecutionMode::from_env`].
    pub fn mode_from_env(self) -> Self { self.mode(ExecutionMode::from_env()) }

    /// Send announcements and failures to `reporter`.
    ///
    /// Defaults to [`TracingReporter`].
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Create the scenario.
    pub fn start(self) -> Scenario {
        let reporter = self
            .reporter
            .unwrap_or_else(|| Box::new(TracingReporter));
        tracing::debug!(mode = %self.mode, "starting scenario");
        Scenario {
            inner: Rc::new(super::Inner::new(self.mode, reporter)),
        }
    }
}

impl fmt::Debug for ScenarioBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioBuilder")
            .field("mode", &self.mode)
            .field("custom_reporter", &self.reporter.is_some())
            .finish()
    }
}
