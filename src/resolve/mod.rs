//! Step parameter resolution.
//!
//! Every parameter of a step implements [`FromScenario`]. Before a step runs,
//! each parameter is produced from the running [`Scenario`](crate::Scenario):
//! the scenario itself binds directly, while [`Dep`] parameters are looked up
//! in the scenario's registry by exact type and then by capability.

mod dep;
mod error;
mod trait_def;

pub use dep::Dep;
pub use error::ResolveError;
pub use trait_def::FromScenario;
