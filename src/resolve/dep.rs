//! Attached dependency parameter.

use std::{fmt, ops::Deref, rc::Rc};

use super::{FromScenario, ResolveError};
use crate::Scenario;

/// A dependency attached to the scenario, handed to a step by type.
///
/// `Dep<T>` wraps the same `Rc<T>` that was attached, so every step asking
/// for `T` observes one shared instance. `T` may be a trait object, in which
/// case the value is found through a capability view when no exact entry
/// exists.
pub struct Dep<T: ?Sized>(Rc<T>);

impl<T: ?Sized> Dep<T> {
    /// Consume the parameter and return the shared allocation.
    #[must_use]
    pub fn into_inner(self) -> Rc<T> { self.0 }

    /// Borrow the shared allocation.
    #[must_use]
    pub fn as_rc(&self) -> &Rc<T> { &self.0 }

    /// Whether this parameter refers to the allocation behind `other`.
    ///
    /// Only addresses are compared, so a trait-object view matches the
    /// concrete value it was made from.
    ///
    /// ```rust
    /// use std::rc::Rc;
    ///
    /// use scenario::resolve::Dep;
    ///
    /// let value = Rc::new(3u8);
    /// let dep: Dep<u8> = Dep::from(Rc::clone(&value));
    /// assert!(dep.is(&value));
    /// assert!(!dep.is(&Rc::new(3u8)));
    /// ```
    #[must_use]
    pub fn is<U: ?Sized>(&self, other: &Rc<U>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(other))
    }
}

impl<T: ?Sized> Clone for Dep<T> {
    fn clone(&self) -> Self { Self(Rc::clone(&self.0)) }
}

impl<T: ?Sized> fmt::Debug for Dep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> From<Rc<T>> for Dep<T> {
    fn from(inner: Rc<T>) -> Self { Self(inner) }
}

impl<T> From<T> for Dep<T> {
    fn from(inner: T) -> Self { Self(Rc::new(inner)) }
}

impl<T: ?Sized> Deref for Dep<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<T> FromScenario for Dep<T>
where
    T: ?Sized + 'static,
{
    fn from_scenario(scenario: &Scenario) -> Result<Self, ResolveError> {
        scenario
            .resolve::<T>()
            .map(Self)
            .ok_or_else(ResolveError::unresolved::<T>)
    }
}
