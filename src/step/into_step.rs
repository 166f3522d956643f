//! Conversion of callables into type-erased steps.

use std::fmt;

use super::{Keyword, StepFailure, StepOutput, name::display_name};
use crate::{
    Scenario,
    resolve::{FromScenario, ResolveError},
};

/// Why a step stopped before completing normally.
#[derive(Debug)]
pub(crate) enum Interrupt {
    Unresolved(ResolveError),
    Failed(StepFailure),
}

type Body = Box<dyn FnMut(&Scenario, Keyword) -> Result<(), Interrupt>>;

/// A callable converted into a step the engine can run.
///
/// The body resolves every parameter first, announces the step through the
/// scenario's reporter, then calls the original function and settles its
/// output.
pub struct StepFn {
    name: String,
    body: Body,
}

impl StepFn {
    fn new(name: String, body: Body) -> Self { Self { name, body } }

    /// Display name derived from the callable's type name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    pub(crate) fn invoke(&mut self, scenario: &Scenario, keyword: Keyword) -> Result<(), Interrupt> {
        (self.body)(scenario, keyword)
    }
}

impl fmt::Debug for StepFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A value that was registered as a step but cannot be called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotAFunction {
    /// Type name of the rejected value.
    pub actual: &'static str,
}

impl NotAFunction {
    fn of<T: ?Sized>() -> Self {
        Self {
            actual: std::any::type_name::<T>(),
        }
    }
}

/// Marker for [`IntoStep`] implementations on plain values.
#[derive(Debug)]
pub enum NonCallable {}

/// Conversion into a [`StepFn`].
///
/// Implemented for every `FnMut` of up to eight parameters whose parameters
/// implement [`FromScenario`] and whose output implements [`StepOutput`].
/// The `Marker` parameter only keeps those implementations apart.
///
/// Common plain values also implement this trait so that registering one is
/// reported when the step is recorded instead of failing to compile far from
/// the mistake in generic test helpers.
pub trait IntoStep<Marker> {
    /// Convert `self` into a step.
    ///
    /// # Errors
    ///
    /// Returns [`NotAFunction`] when `self` cannot be called.
    fn into_step(self) -> Result<StepFn, NotAFunction>;
}

macro_rules! impl_into_step {
    ($($param:ident),*) => {
        impl<F, R, $($param,)*> IntoStep<fn($($param,)*) -> R> for F
        where
            F: FnMut($($param),*) -> R + 'static,
            R: StepOutput,
            $($param: FromScenario,)*
        {
            #[allow(non_snake_case, reason = "parameters are bound to their type names")]
            fn into_step(mut self) -> Result<StepFn, NotAFunction> {
                let name = display_name(std::any::type_name::<F>());
                let announced = name.clone();
                Ok(StepFn::new(
                    name,
                    Box::new(move |scenario: &Scenario, keyword: Keyword| {
                        $(let $param = $param::from_scenario(scenario).map_err(Interrupt::Unresolved)?;)*
                        scenario.announce(keyword, &announced);
                        (self)($($param),*).settle(scenario).map_err(Interrupt::Failed)
                    }),
                ))
            }
        }
    };
}

impl_into_step!();
impl_into_step!(A1);
impl_into_step!(A1, A2);
impl_into_step!(A1, A2, A3);
impl_into_step!(A1, A2, A3, A4);
impl_into_step!(A1, A2, A3, A4, A5);
impl_into_step!(A1, A2, A3, A4, A5, A6);
impl_into_step!(A1, A2, A3, A4, A5, A6, A7);
impl_into_step!(A1, A2, A3, A4, A5, A6, A7, A8);

macro_rules! reject_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoStep<NonCallable> for $ty {
                fn into_step(self) -> Result<StepFn, NotAFunction> { Err(NotAFunction::of::<Self>()) }
            }
        )*
    };
}

reject_values!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    &'static str, String,
);
