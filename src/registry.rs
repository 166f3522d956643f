//! Type-keyed store of dependency values attached to a scenario.
//!
//! `Registry` keeps one value per concrete type, keyed by `TypeId`. Values are
//! held as `Rc<T>` behind `Box<dyn Any>` so a lookup hands out the very
//! allocation that was attached rather than a copy. Besides its exact type an
//! entry may carry capability views: the same allocation seen as another type,
//! usually a trait object. Views are what the assignable lookup searches.

use std::{
    any::{Any, TypeId, type_name},
    rc::Rc,
};

use indexmap::IndexMap;

/// One typed view of an attached allocation.
///
/// `value` always holds an `Rc<V>` where `V` is the type identified by
/// `type_id`.
struct View {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any>,
}

impl View {
    fn new<V: ?Sized + 'static>(value: Rc<V>) -> Self {
        Self {
            type_id: TypeId::of::<V>(),
            type_name: type_name::<V>(),
            value: Box::new(value),
        }
    }

    fn downcast<V: ?Sized + 'static>(&self) -> Option<Rc<V>> {
        self.value.downcast_ref::<Rc<V>>().cloned()
    }
}

struct Entry {
    exact: View,
    capabilities: Vec<View>,
}

/// Stores attached dependency values keyed by their exact type.
///
/// Iteration order, and so the tie-break for assignable lookups, is the order
/// in which each exact type was first attached. Replacing a value keeps its
/// slot.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
///
/// use scenario::Registry;
///
/// let mut registry = Registry::default();
/// let value = Rc::new(42u32);
/// registry.attach(Rc::clone(&value));
/// let found = registry.get::<u32>().expect("value should exist");
/// assert!(Rc::ptr_eq(&found, &value));
/// ```
#[derive(Default)]
pub struct Registry {
    entries: IndexMap<TypeId, Entry>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Attach a value under its exact type `T`.
    ///
    /// Any value previously attached under the same type is replaced, along
    /// with the capability views it carried. Returns `true` when a value was
    /// replaced.
    pub fn attach<T>(&mut self, value: Rc<T>) -> bool
    where
        T: ?Sized + 'static,
    {
        self.insert(Entry {
            exact: View::new(value),
            capabilities: Vec::new(),
        })
    }

    /// Attach a value under its exact type `T` together with a view of it as
    /// `I`.
    ///
    /// `upcast` receives the attached allocation and normally performs an
    /// unsizing coercion, so lookups for `I` find this value when no exact
    /// `I` entry exists.
    ///
    /// ```rust
    /// use std::{fmt::Display, rc::Rc};
    ///
    /// use scenario::Registry;
    ///
    /// let mut registry = Registry::default();
    /// registry.attach_as::<u8, dyn Display>(Rc::new(7), |value| value);
    /// let shown = registry.resolve::<dyn Display>().expect("view should resolve");
    /// assert_eq!(shown.to_string(), "7");
    /// ```
    pub fn attach_as<T, I>(&mut self, value: Rc<T>, upcast: impl FnOnce(Rc<T>) -> Rc<I>) -> bool
    where
        T: ?Sized + 'static,
        I: ?Sized + 'static,
    {
        let view = View::new(upcast(Rc::clone(&value)));
        self.insert(Entry {
            exact: View::new(value),
            capabilities: vec![view],
        })
    }

    /// Add a view as `I` to the value currently attached under `T`.
    ///
    /// Returns `false` when nothing is attached under `T`.
    pub fn grant<T, I>(&mut self, upcast: impl FnOnce(Rc<T>) -> Rc<I>) -> bool
    where
        T: ?Sized + 'static,
        I: ?Sized + 'static,
    {
        let Some(value) = self.get::<T>() else {
            return false;
        };
        let view = upcast(Rc::clone(&value));
        self.grant_view(&value, view)
    }

    /// Add `view` as a capability of the value attached under `T`.
    ///
    /// Returns `false`, leaving the registry untouched, unless `value` is the
    /// allocation currently attached under `T`.
    pub fn grant_view<T, I>(&mut self, value: &Rc<T>, view: Rc<I>) -> bool
    where
        T: ?Sized + 'static,
        I: ?Sized + 'static,
    {
        let Some(entry) = self.entries.get_mut(&TypeId::of::<T>()) else {
            return false;
        };
        let attached = entry.exact.downcast::<T>();
        if !attached.is_some_and(|attached| Rc::ptr_eq(&attached, value)) {
            return false;
        }
        entry.capabilities.push(View::new(view));
        true
    }

    fn insert(&mut self, entry: Entry) -> bool {
        let name = entry.exact.type_name;
        let replaced = self.entries.insert(entry.exact.type_id, entry).is_some();
        if replaced {
            tracing::debug!(type_name = name, "replaced attached value");
        } else {
            tracing::trace!(type_name = name, "attached value");
        }
        replaced
    }

    /// Retrieve the value attached under exactly `T`.
    #[must_use]
    pub fn get<T>(&self) -> Option<Rc<T>>
    where
        T: ?Sized + 'static,
    {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.exact.downcast::<T>())
    }

    /// Find the first value that has a capability view as `T`.
    ///
    /// Entries are scanned in first-attachment order.
    #[must_use]
    pub fn find_assignable<T>(&self) -> Option<Rc<T>>
    where
        T: ?Sized + 'static,
    {
        let wanted = TypeId::of::<T>();
        self.entries
            .values()
            .flat_map(|entry| entry.capabilities.iter())
            .find(|view| view.type_id == wanted)
            .and_then(View::downcast::<T>)
    }

    /// Resolve `T` by exact type, falling back to an assignable value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::rc::Rc;
    ///
    /// use scenario::Registry;
    ///
    /// let mut registry = Registry::default();
    /// assert!(registry.resolve::<String>().is_none());
    /// registry.attach(Rc::new(String::from("hello")));
    /// assert_eq!(registry.resolve::<String>().as_deref().map(String::as_str), Some("hello"));
    /// ```
    #[must_use]
    pub fn resolve<T>(&self) -> Option<Rc<T>>
    where
        T: ?Sized + 'static,
    {
        self.get::<T>().or_else(|| self.find_assignable::<T>())
    }

    /// Whether a value is attached under exactly `T`.
    #[must_use]
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of attached values.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether no value is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Names of the attached exact types, in iteration order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|entry| entry.exact.type_name)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}
