//! Binding lifetimes.
//!
//! - [`Scope::Singleton`]: materialized once, the same instance afterwards
//! - [`Scope::Transient`]: the factory runs on every resolve
//!
//! Bindings backed by a ready instance behave like singletons whatever
//! their scope: there is nothing to re-run.
use std::fmt;

/// Defines how long a resolved value lives within the container.
///
/// # Examples
/// ```
/// use wireflow_container::scope::Scope;
///
/// assert_eq!(Scope::from_singleton(true), Scope::Singleton);
/// assert!(!Scope::Transient.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum Scope {
    /// One instance shared by every resolution.
    ///
    /// A factory-backed singleton runs its factory on first resolve and
    /// caches the product until the binding is deleted.
    Singleton,

    /// New instance on every resolve call.
    ///
    /// Never cached.
    #[default]
    Transient,
}

impl Scope {
    /// Maps the boolean `singleton` flag onto a scope.
    #[inline]
    pub fn from_singleton(singleton: bool) -> Self {
        if singleton { Scope::Singleton } else { Scope::Transient }
    }

    /// Returns `true` if this scope caches instances.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "Singleton"),
            Scope::Transient => write!(f, "Transient"),
        }
    }
}
