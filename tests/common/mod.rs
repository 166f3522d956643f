//! Shared helpers for scenario integration tests.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::{
    cell::RefCell,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use scenario::report::Transcript;

/// Ordered log of step invocations shared between a test and its steps.
#[derive(Clone, Debug, Default)]
pub struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    /// Build a step that appends `label` when invoked.
    pub fn step(&self, label: &str) -> impl FnMut() + use<> {
        let calls = self.clone();
        let label = label.to_owned();
        move || calls.0.borrow_mut().push(label.clone())
    }

    pub fn push(&self, label: &str) { self.0.borrow_mut().push(label.to_owned()); }

    pub fn recorded(&self) -> Vec<String> { self.0.borrow().clone() }
}

/// Run `body`, expecting it to abort through `transcript`, and return the
/// fatal message.
pub fn fatal_message(transcript: &Transcript, body: impl FnOnce()) -> String {
    let outcome = catch_unwind(AssertUnwindSafe(body));
    assert!(outcome.is_err(), "expected the scenario to abort");
    transcript
        .fatal_message()
        .expect("transcript should hold the fatal message")
}
