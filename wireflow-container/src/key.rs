//! Interface identification.
//!
//! [`InterfaceKey`] identifies the abstract type a binding satisfies.
//! It wraps the [`TypeId`] of the interface (usually a `dyn Trait`)
//! together with its type name for diagnostics.
//!
//! [`Interface`] marks the types that may be used as an explicit
//! interface in [`DIContainer::provide`](crate::container::DIContainer::provide).

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use wireflow_support::rendering::shorten_type_name;

/// Marker for abstract capability types.
///
/// Implemented for trait objects by the `#[interface]` attribute, which
/// also refuses traits without at least one required method. Implement it
/// by hand only for `dyn Trait` types:
///
/// ```
/// use wireflow_container::key::Interface;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// impl Interface for dyn Greeter {}
/// ```
pub trait Interface: Send + Sync + 'static {
    /// Human-readable interface name used in logs and errors.
    fn interface_name() -> &'static str {
        type_name::<Self>()
    }
}

/// Identifies an interface in the container.
///
/// # Examples
/// ```
/// use wireflow_container::key::InterfaceKey;
///
/// let key = InterfaceKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key, InterfaceKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct InterfaceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl InterfaceKey {
    /// Creates a key for type `I`.
    #[inline]
    pub fn of<I: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<I>(),
            type_name: type_name::<I>(),
        }
    }

    /// Returns the [`TypeId`] of the interface.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without module paths.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

// Equality and hashing ignore the name: TypeId alone is the identity.
impl PartialEq for InterfaceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for InterfaceKey {}

impl Hash for InterfaceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceKey({})", self.type_name)
    }
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    impl Interface for dyn Greeter {}

    #[test]
    fn key_of_trait_object() {
        let key = InterfaceKey::of::<dyn Greeter>();
        assert!(key.type_name().contains("Greeter"));
        assert_eq!(key.short_name(), "dyn Greeter");
    }

    #[test]
    fn key_equality_same_type() {
        assert_eq!(InterfaceKey::of::<dyn Greeter>(), InterfaceKey::of::<dyn Greeter>());
    }

    #[test]
    fn key_inequality_different_types() {
        assert_ne!(InterfaceKey::of::<dyn Greeter>(), InterfaceKey::of::<String>());
    }

    #[test]
    fn key_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(InterfaceKey::of::<String>(), "string");
        map.insert(InterfaceKey::of::<dyn Greeter>(), "greeter");
        assert_eq!(map.get(&InterfaceKey::of::<dyn Greeter>()), Some(&"greeter"));
        assert_eq!(map.get(&InterfaceKey::of::<bool>()), None);
    }

    #[test]
    fn interface_name_defaults_to_type_name() {
        assert!(<dyn Greeter as Interface>::interface_name().contains("Greeter"));
    }
}
