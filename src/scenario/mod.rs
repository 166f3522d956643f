//! The scenario handle: step recording, dependency attachment and execution.
//!
//! A [`Scenario`] owns an ordered queue of steps and a [`Registry`] of
//! attached values. Steps are resolved and invoked one at a time on the
//! calling thread, either as they are recorded ([`ExecutionMode::Eager`]) or
//! together when [`Scenario::run`] is called ([`ExecutionMode::Deferred`]).
//! Failures go to the scenario's [`Reporter`], whose fatal path ends the test.

mod builder;

use std::{
    any::TypeId,
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    panic::{AssertUnwindSafe, Location, catch_unwind, resume_unwind},
    rc::{Rc, Weak},
};

pub use builder::ScenarioBuilder;

use crate::{
    config::ExecutionMode,
    error::ScenarioError,
    panic::describe,
    registry::Registry,
    report::{Reporter, TracingReporter},
    step::{Interrupt, IntoStep, Keyword, NotAFunction, Step},
};

/// Lifecycle of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been recorded yet.
    Empty,
    /// Steps have been recorded and the scenario is not running.
    Recording,
    /// A step is being resolved or invoked.
    Running,
    /// All steps ran, or the scenario was aborted. Nothing more runs.
    Done,
}

struct Inner {
    mode: ExecutionMode,
    reporter: Box<dyn Reporter>,
    registry: RefCell<Registry>,
    steps: RefCell<VecDeque<Step>>,
    phase: Cell<Phase>,
}

impl Inner {
    fn new(mode: ExecutionMode, reporter: Box<dyn Reporter>) -> Self {
        Self {
            mode,
            reporter,
            registry: RefCell::new(Registry::new()),
            steps: RefCell::new(VecDeque::new()),
            phase: Cell::new(Phase::Empty),
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self.steps.get_mut().len();
        if pending > 0 && self.phase.get() != Phase::Done && !std::thread::panicking() {
            log::warn!(
                "scenario dropped with {pending} recorded step(s) that never ran; call \
                 Scenario::run"
            );
        }
    }
}

/// Per-test root object that records steps and supplies their parameters.
///
/// `Scenario` is a cheap handle: clones refer to the same scenario, and a step
/// declaring a `Scenario` parameter receives a handle to the one running it.
/// Use [`Scenario::ptr_eq`] to compare identities.
///
/// The scenario lives as long as any handle to it. A deferred step should
/// declare a `Scenario` parameter rather than capture a clone: a strong handle
/// captured by a step that never runs keeps the scenario, and every value
/// attached to it, alive after the test ends. Capture a [`WeakScenario`] from
/// [`Scenario::downgrade`] when a parameter will not do. Attaching a
/// `Scenario` as a value is ignored for the same reason, since a `Scenario`
/// parameter always receives the running scenario.
///
/// # Examples
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
///
/// use scenario::{Scenario, resolve::Dep};
///
/// struct Account {
///     balance: Cell<u32>,
/// }
///
/// fn an_account_with_funds() -> Rc<Account> {
///     Rc::new(Account {
///         balance: Cell::new(100),
///     })
/// }
///
/// fn the_user_withdraws(account: Dep<Account>) { account.balance.set(account.balance.get() - 30); }
///
/// fn the_balance_is_reduced(account: Dep<Account>) { assert_eq!(account.balance.get(), 70); }
///
/// Scenario::default()
///     .given(an_account_with_funds)
///     .when(the_user_withdraws)
///     .then(the_balance_is_reduced)
///     .run();
/// ```
#[derive(Clone)]
pub struct Scenario {
    inner: Rc<Inner>,
}

impl Scenario {
    /// Start a deferred scenario reporting to `reporter`.
    #[must_use]
    pub fn start(reporter: impl Reporter + 'static) -> Self {
        Self::builder().reporter(reporter).start()
    }

    /// Configure a scenario before starting it.
    pub fn builder() -> ScenarioBuilder { ScenarioBuilder::new() }

    /// A handle that refers to this scenario without keeping it alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakScenario {
        WeakScenario {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether `self` and `other` are handles to the same scenario.
    #[must_use]
    pub fn ptr_eq(&self, other: &Scenario) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }

    /// The configured execution mode.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode { self.inner.mode }

    /// The current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase { self.inner.phase.get() }

    /// Number of recorded steps that have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize { self.inner.steps.borrow().len() }

    /// Keyword and display name of each step that has not run yet, in order.
    #[must_use]
    pub fn plan(&self) -> Vec<(Keyword, String)> {
        self.inner
            .steps
            .borrow()
            .iter()
            .map(|step| (step.keyword(), step.name().to_owned()))
            .collect()
    }

    /// Record a `Given` step.
    #[track_caller]
    pub fn given<M>(&self, step: impl IntoStep<M>) -> &Self { self.step(Keyword::Given, step) }

    /// Record a `When` step.
    #[track_caller]
    pub fn when<M>(&self, step: impl IntoStep<M>) -> &Self { self.step(Keyword::When, step) }

    /// Record a `Then` step.
    #[track_caller]
    pub fn then<M>(&self, step: impl IntoStep<M>) -> &Self { self.step(Keyword::Then, step) }

    /// Record an `And` step.
    #[track_caller]
    pub fn and<M>(&self, step: impl IntoStep<M>) -> &Self { self.step(Keyword::And, step) }

    /// Record a step under `keyword`.
    ///
    /// In deferred mode the step is queued; in eager mode it is resolved and
    /// invoked before this call returns. Registering a value that cannot be
    /// called, or recording after the scenario finished, is fatal.
    #[track_caller]
    pub fn step<M>(&self, keyword: Keyword, step: impl IntoStep<M>) -> &Self {
        let location = Location::caller();
        if self.phase() == Phase::Done {
            self.abort(&ScenarioError::Finished { keyword });
        }
        let body = match step.into_step() {
            Ok(body) => body,
            Err(NotAFunction { actual }) => self.abort(&ScenarioError::NotAFunction {
                actual,
                file: location.file(),
                line: location.line(),
            }),
        };
        let step = Step::new(keyword, body);
        match self.inner.mode {
            ExecutionMode::Eager => self.execute(step),
            ExecutionMode::Deferred => {
                tracing::trace!(%keyword, step = step.name(), "recorded step");
                self.inner.steps.borrow_mut().push_back(step);
                if self.phase() == Phase::Empty {
                    self.inner.phase.set(Phase::Recording);
                }
            }
        }
        self
    }

    /// Attach `value` under its own type for later steps.
    ///
    /// A value of the same type attached earlier is replaced.
    pub fn with<T: 'static>(&self, value: T) -> &Self { self.with_shared(Rc::new(value)) }

    /// Attach an existing shared allocation under `T`.
    ///
    /// Steps asking for `T` receive this very allocation. A `Scenario` is
    /// never stored.
    pub fn with_shared<T: ?Sized + 'static>(&self, value: Rc<T>) -> &Self {
        if !Self::is_reserved::<T>() {
            self.inner.registry.borrow_mut().attach(value);
        }
        self
    }

    /// `Scenario` parameters bind the running scenario, and storing a handle
    /// inside its own registry would keep it alive forever.
    fn is_reserved<T: ?Sized + 'static>() -> bool {
        let reserved = TypeId::of::<T>() == TypeId::of::<Scenario>();
        if reserved {
            tracing::debug!("ignoring attached scenario handle");
        }
        reserved
    }

    /// Attach `value` under its own type and make it available as `I`.
    ///
    /// ```rust
    /// use scenario::{Scenario, resolve::Dep};
    ///
    /// trait Clock {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct FixedClock(u64);
    ///
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> u64 { self.0 }
    /// }
    ///
    /// Scenario::default()
    ///     .with_as::<dyn Clock, _>(FixedClock(7), |clock| clock)
    ///     .then(|clock: Dep<dyn Clock>| assert_eq!(clock.now(), 7))
    ///     .run();
    /// ```
    pub fn with_as<I, T>(&self, value: T, upcast: impl FnOnce(Rc<T>) -> Rc<I>) -> &Self
    where
        I: ?Sized + 'static,
        T: 'static,
    {
        if Self::is_reserved::<T>() {
            return self;
        }
        let value = Rc::new(value);
        let view = upcast(Rc::clone(&value));
        self.inner
            .registry
            .borrow_mut()
            .attach_as(value, move |_| view);
        self
    }

    /// Make the value attached under `T` also available as `I`.
    ///
    /// Logs a warning and does nothing when no `T` is attached.
    pub fn with_capability<T, I>(&self, upcast: impl FnOnce(Rc<T>) -> Rc<I>) -> &Self
    where
        T: ?Sized + 'static,
        I: ?Sized + 'static,
    {
        let attached = self.inner.registry.borrow().get::<T>();
        let Some(value) = attached else {
            tracing::warn!(
                type_name = std::any::type_name::<T>(),
                capability = std::any::type_name::<I>(),
                "no value attached to grant a capability to"
            );
            return self;
        };
        let view = upcast(Rc::clone(&value));
        if !self.inner.registry.borrow_mut().grant_view(&value, view) {
            tracing::debug!(
                type_name = std::any::type_name::<T>(),
                "attached value replaced while granting a capability"
            );
        }
        self
    }

    /// Look up an attached value by exact type, then by capability.
    #[must_use]
    pub fn resolve<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
        self.inner.registry.borrow().resolve::<T>()
    }

    /// Type names of the attached values, in attachment order.
    #[must_use]
    pub fn attached(&self) -> Vec<&'static str> {
        self.inner.registry.borrow().type_names().collect()
    }

    /// Send a trace message to the reporter.
    pub fn log(&self, message: impl fmt::Display) {
        self.inner.reporter.log(format_args!("{message}"));
    }

    /// Report a failure and abort the test.
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.inner.phase.set(Phase::Done);
        self.inner.reporter.fatal(format_args!("{message}"))
    }

    /// Run every recorded step in order.
    ///
    /// Steps recorded by running steps are queued behind the current ones and
    /// run in the same call. Does nothing in eager mode, and warns when the
    /// scenario is already running or finished.
    pub fn run(&self) {
        match (self.inner.mode, self.phase()) {
            (ExecutionMode::Eager, _) => {
                tracing::debug!("eager scenario already ran its steps");
                return;
            }
            (_, Phase::Running) => {
                tracing::warn!("scenario is already running; ignoring nested run");
                return;
            }
            (_, Phase::Done) => {
                tracing::warn!("scenario already finished; ignoring run");
                return;
            }
            _ => {}
        }
        self.inner.phase.set(Phase::Running);
        while let Some(step) = self.next_step() {
            self.execute(step);
        }
        self.inner.phase.set(Phase::Done);
    }

    fn next_step(&self) -> Option<Step> { self.inner.steps.borrow_mut().pop_front() }

    fn execute(&self, step: Step) {
        let (keyword, mut body) = step.into_parts();
        let previous = self.inner.phase.replace(Phase::Running);
        let span = tracing::info_span!("step", %keyword, step = body.name());
        let outcome = {
            let _entered = span.enter();
            catch_unwind(AssertUnwindSafe(|| body.invoke(self, keyword)))
        };
        match outcome {
            Ok(Ok(())) => {
                if self.phase() != Phase::Done {
                    self.inner.phase.set(match previous {
                        Phase::Empty => Phase::Recording,
                        other => other,
                    });
                }
            }
            Ok(Err(Interrupt::Unresolved(err))) => {
                self.abort(&ScenarioError::UnresolvedDependency {
                    keyword,
                    step: body.name().to_owned(),
                    type_name: err.type_name(),
                });
            }
            Ok(Err(Interrupt::Failed(failure))) => self.abort(&ScenarioError::StepFailed {
                keyword,
                step: body.name().to_owned(),
                message: failure.message().to_owned(),
            }),
            Err(payload) => {
                self.inner.phase.set(Phase::Done);
                tracing::error!(
                    %keyword,
                    step = body.name(),
                    "step panicked: {}",
                    describe(payload.as_ref())
                );
                resume_unwind(payload)
            }
        }
    }

    pub(crate) fn announce(&self, keyword: Keyword, name: &str) {
        self.inner.reporter.log(format_args!("{keyword} {name}"));
    }

    fn abort(&self, err: &ScenarioError) -> ! { self.fatal(err) }
}

/// Non-owning handle to a [`Scenario`].
///
/// ```rust
/// use scenario::Scenario;
///
/// let scenario = Scenario::default();
/// let weak = scenario.downgrade();
/// scenario.given(move || {
///     if let Some(scenario) = weak.upgrade() {
///         scenario.log("still running");
///     }
/// });
/// scenario.run();
/// ```
#[derive(Clone, Debug)]
pub struct WeakScenario {
    inner: Weak<Inner>,
}

impl WeakScenario {
    /// The scenario, unless every strong handle has been dropped.
    #[must_use]
    pub fn upgrade(&self) -> Option<Scenario> {
        self.inner.upgrade().map(|inner| Scenario { inner })
    }
}

impl Default for Scenario {
    /// A deferred scenario reporting through [`TracingReporter`].
    fn default() -> Self { Self::start(TracingReporter) }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("mode", &self.inner.mode)
            .field("phase", &self.phase())
            .field("pending", &self.pending())
            .field("attached", &self.attached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        panic::{AssertUnwindSafe, catch_unwind},
        rc::Rc,
    };

    use rstest::{fixture, rstest};
    use tracing_test::traced_test;

    use super::{Phase, Scenario};
    use crate::{config::ExecutionMode, report::Transcript, step::Keyword};

    #[fixture]
    fn transcript() -> Transcript {
        // shared record of the announcements made by the scenario under test
        Transcript::new()
    }

    #[rstest]
    fn deferred_steps_wait_for_run(transcript: Transcript) {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        let scenario = Scenario::start(transcript.clone());
        assert_eq!(scenario.phase(), Phase::Empty);

        scenario.given(move || *flag.borrow_mut() = true);
        assert_eq!(scenario.phase(), Phase::Recording);
        assert_eq!(scenario.pending(), 1);
        assert!(!*ran.borrow());

        scenario.run();
        assert!(*ran.borrow());
        assert_eq!(scenario.phase(), Phase::Done);
        assert_eq!(scenario.pending(), 0);
    }

    #[rstest]
    fn eager_steps_run_on_record(transcript: Transcript) {
        let ran = Rc::new(RefCell::new(0));
        let count = Rc::clone(&ran);
        let scenario = Scenario::builder()
            .mode(ExecutionMode::Eager)
            .reporter(transcript)
            .start();

        assert_eq!(scenario.mode(), ExecutionMode::Eager);
        scenario.when(move || *count.borrow_mut() += 1);
        assert_eq!(*ran.borrow(), 1);
        assert_eq!(scenario.phase(), Phase::Recording);

        scenario.run();
        assert_eq!(*ran.borrow(), 1);
        assert_eq!(scenario.phase(), Phase::Recording);
    }

    #[rstest]
    fn plan_lists_pending_steps(transcript: Transcript) {
        fn a_cart() {}
        fn checkout() {}

        let scenario = Scenario::start(transcript);
        scenario.given(a_cart).when(checkout);

        assert_eq!(
            scenario.plan(),
            vec![
                (Keyword::Given, "a cart".to_owned()),
                (Keyword::When, "checkout".to_owned()),
            ]
        );
        scenario.run();
        assert!(scenario.plan().is_empty());
    }

    #[rstest]
    fn run_after_done_is_ignored(transcript: Transcript) {
        let scenario = Scenario::start(transcript.clone());
        scenario.given(|| ());
        scenario.run();
        scenario.run();

        assert_eq!(transcript.logs().len(), 1);
    }

    #[rstest]
    #[traced_test]
    fn panicking_steps_are_logged(transcript: Transcript) {
        fn the_total_is_checked() { panic!("total mismatch"); }

        let scenario = Scenario::start(transcript);
        scenario.then(the_total_is_checked);
        let outcome = catch_unwind(AssertUnwindSafe(|| scenario.run()));

        assert!(outcome.is_err());
        assert_eq!(scenario.phase(), Phase::Done);
        assert!(logs_contain("step panicked: total mismatch"));
    }

    #[test]
    fn clones_share_identity() {
        let scenario = Scenario::default();
        let other = Scenario::default();

        assert!(scenario.ptr_eq(&scenario.clone()));
        assert!(!scenario.ptr_eq(&other));
    }
}
