//! Error types for parameter resolution.

use thiserror::Error;

/// Errors raised while resolving a step parameter.
///
/// This enum is marked `#[non_exhaustive]` so more variants may be added in
/// the future without breaking changes.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    /// No attached value matched the requested type, exactly or by capability.
    #[error("no value attached for {0}")]
    Unresolved(&'static str),
}

impl ResolveError {
    /// Build an [`ResolveError::Unresolved`] naming `T`.
    #[must_use]
    pub fn unresolved<T: ?Sized>() -> Self { Self::Unresolved(std::any::type_name::<T>()) }

    /// Name of the type that could not be resolved.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unresolved(name) => name,
        }
    }
}
