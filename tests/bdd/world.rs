//! Test world for scenario execution.
//!
//! Provides [`ScenarioWorld`], which describes a scenario to build, runs it
//! against a [`Transcript`] and keeps the observable results for assertions.

use std::{
    cell::RefCell,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use cucumber::World;
use scenario::{ExecutionMode, Keyword, Scenario, report::Transcript, resolve::Dep};

/// A dependency that is never attached.
pub struct Unattached;

#[derive(Debug, Default, World)]
pub struct ScenarioWorld {
    pub mode: ExecutionMode,
    pub keywords: Vec<Keyword>,
    pub greeting: Option<String>,
    pub reads_greeting: bool,
    pub needs_unattached: bool,
    pub invoked: Vec<String>,
    pub logs: Vec<String>,
    pub failure: Option<String>,
}

impl ScenarioWorld {
    /// Build the described scenario, run it and capture its results.
    pub fn run_scenario(&mut self) {
        let transcript = Transcript::new();
        let invoked = Rc::new(RefCell::new(Vec::new()));
        let scenario = Scenario::builder()
            .mode(self.mode)
            .reporter(transcript.clone())
            .start();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            if let Some(greeting) = &self.greeting {
                scenario.with(greeting.clone());
            }
            for keyword in &self.keywords {
                let invoked = Rc::clone(&invoked);
                let label = keyword.to_string();
                scenario.step(*keyword, move || invoked.borrow_mut().push(label.clone()));
            }
            if self.reads_greeting {
                let invoked = Rc::clone(&invoked);
                scenario.then(move |greeting: Dep<String>| {
                    invoked.borrow_mut().push(greeting.as_str().to_owned());
                });
            }
            if self.needs_unattached {
                scenario.then(|_unattached: Dep<Unattached>| ());
            }
            scenario.run();
        }));

        self.invoked = invoked.borrow().clone();
        self.logs = transcript.logs();
        self.failure = outcome
            .err()
            .map(|_| transcript.fatal_message().unwrap_or_default());
    }
}
