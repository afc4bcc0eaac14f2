//! Serializable diagnostics of a container's bindings.

use serde::Serialize;

use crate::scope::Scope;

/// Point-in-time view of a container, from [`DIContainer::snapshot`].
///
/// [`DIContainer::snapshot`]: crate::container::DIContainer::snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ContainerSnapshot {
    /// Bound interfaces, sorted by type name.
    pub interfaces: Vec<InterfaceSnapshot>,
    /// Number of registered binding names.
    pub names: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceSnapshot {
    pub interface: String,
    /// Bindings in resolution order.
    pub bindings: Vec<BindingSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BindingSnapshot {
    pub implementation: String,
    pub scope: Scope,
    /// Whether a value is cached in the binding.
    pub materialized: bool,
    pub name: Option<String>,
}
