#![doc(html_root_url = "https://docs.rs/scenario/latest")]
//! Public API for the `scenario` library.
//!
//! This crate runs Given/When/Then style test steps in order. Each step is an
//! ordinary closure or function; its parameters are supplied by type from the
//! running [`Scenario`] and from values attached with [`Scenario::with`] or
//! returned by earlier steps.
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use scenario::{Scenario, resolve::Dep};
//!
//! struct Basket(Vec<&'static str>);
//!
//! Scenario::default()
//!     .given(|| Rc::new(Basket(vec!["apple"])))
//!     .then(|basket: Dep<Basket>| assert_eq!(basket.0, ["apple"]))
//!     .run();
//! ```

pub mod config;
pub mod error;
mod panic;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod scenario;
pub mod step;

pub use config::ExecutionMode;
pub use error::ScenarioError;
pub use registry::Registry;
pub use scenario::{Phase, Scenario, ScenarioBuilder, WeakScenario};
pub use step::Keyword;
