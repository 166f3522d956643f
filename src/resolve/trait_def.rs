//! Trait definition for step parameter types.

use super::ResolveError;
use crate::Scenario;

/// Trait for producing a step parameter from the running [`Scenario`].
///
/// Types implementing this trait can be declared as parameters of step
/// functions. The engine resolves every parameter before invoking the step,
/// so a step either receives all of its arguments or does not run at all.
///
/// Implement it for your own types to build composite parameters out of
/// several attached values:
///
/// ```rust
/// use scenario::{
///     Scenario,
///     resolve::{Dep, FromScenario, ResolveError},
/// };
///
/// struct Credentials {
///     user: Dep<String>,
///     pin: Dep<u16>,
/// }
///
/// impl FromScenario for Credentials {
///     fn from_scenario(scenario: &Scenario) -> Result<Self, ResolveError> {
///         Ok(Self {
///             user: Dep::from_scenario(scenario)?,
///             pin: Dep::from_scenario(scenario)?,
///         })
///     }
/// }
/// ```
pub trait FromScenario: Sized {
    /// Produce the parameter value.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable value is available.
    fn from_scenario(scenario: &Scenario) -> Result<Self, ResolveError>;
}

impl FromScenario for Scenario {
    /// Binds the running scenario itself, ahead of any attached value.
    fn from_scenario(scenario: &Scenario) -> Result<Self, ResolveError> { Ok(scenario.clone()) }
}
