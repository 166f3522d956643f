//! Reporting collaborators.
//!
//! The engine never returns errors to test authors. It announces steps through
//! [`Reporter::log`] and ends the test through [`Reporter::fatal`], mirroring
//! how a host test harness reports progress and failures.

use std::{cell::RefCell, fmt, rc::Rc};

/// Receives step announcements and fatal failures from a scenario.
pub trait Reporter {
    /// Record a non-fatal trace message.
    fn log(&self, message: fmt::Arguments<'_>);

    /// Report a failure and abort the current test.
    ///
    /// Implementations must not return; panicking is the usual way to fail a
    /// Rust test.
    fn fatal(&self, message: fmt::Arguments<'_>) -> !;
}

/// Reporter that emits `tracing` events and panics on fatal failures.
///
/// This is the default reporter of [`Scenario`](crate::Scenario).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, message: fmt::Arguments<'_>) {
        tracing::info!(target: "scenario", "{message}");
    }

    fn fatal(&self, message: fmt::Arguments<'_>) -> ! {
        tracing::error!(target: "scenario", "{message}");
        panic!("{message}");
    }
}

/// One message received by a [`Transcript`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// A trace message.
    Log(String),
    /// A fatal failure.
    Fatal(String),
}

/// Reporter that records every message it receives.
///
/// Clones share one record, so a test can hand one clone to a scenario and
/// inspect the other afterwards. [`Reporter::fatal`] records the message and
/// then panics with it.
///
/// ```rust
/// use scenario::{Scenario, report::Transcript};
///
/// fn the_lights_are_on() {}
///
/// let transcript = Transcript::new();
/// Scenario::start(transcript.clone())
///     .given(the_lights_are_on)
///     .run();
/// assert_eq!(transcript.logs(), ["Given the lights are on"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    entries: Rc<RefCell<Vec<Entry>>>,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Every entry, in the order received.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> { self.entries.borrow().clone() }

    /// The trace messages, in the order received.
    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Log(message) => Some(message.clone()),
                Entry::Fatal(_) => None,
            })
            .collect()
    }

    /// The first fatal failure, if one was reported.
    #[must_use]
    pub fn fatal_message(&self) -> Option<String> {
        self.entries.borrow().iter().find_map(|entry| match entry {
            Entry::Fatal(message) => Some(message.clone()),
            Entry::Log(_) => None,
        })
    }

    fn push(&self, entry: Entry) { self.entries.borrow_mut().push(entry); }
}

impl Reporter for Transcript {
    fn log(&self, message: fmt::Arguments<'_>) { self.push(Entry::Log(message.to_string())); }

    fn fatal(&self, message: fmt::Arguments<'_>) -> ! {
        let message = message.to_string();
        self.push(Entry::Fatal(message.clone()));
        panic!("{message}");
    }
}
