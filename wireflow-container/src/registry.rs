//! Name registry: the `name → binding` index.
//!
//! Names live in their own namespace, orthogonal to how many bindings an
//! interface has. Each [`RegistryEntry`] points at one specific record of
//! its interface.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::dependency::RecordId;
use crate::error::ValidationError;
use crate::key::InterfaceKey;

/// What a binding name resolves to.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// The binding name, unique across the container.
    pub name: String,
    /// The interface the named binding satisfies.
    pub interface: InterfaceKey,
    /// Concrete type behind the binding, for diagnostics.
    pub implementation: &'static str,
    pub(crate) record: RecordId,
}

/// Stores all named bindings of a container.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: HashMap<String, RegistryEntry>,
}

impl Registry {
    /// Inserts or replaces the entry for `entry.name`.
    ///
    /// Returns the replaced entry, if any.
    ///
    /// # Errors
    /// Returns [`ValidationError::NameTaken`] if the name is already
    /// registered and `allow_override` is false.
    pub fn upsert(
        &mut self,
        entry: RegistryEntry,
        allow_override: bool,
    ) -> Result<Option<RegistryEntry>, ValidationError> {
        if !allow_override && let Some(existing) = self.entries.get(&entry.name) {
            return Err(ValidationError::NameTaken {
                name: entry.name,
                interface: existing.interface,
            });
        }

        debug!(name = %entry.name, interface = %entry.interface, "Registered binding name");
        Ok(self.entries.insert(entry.name.clone(), entry))
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Drops every entry that points at `interface`, returning how many.
    pub fn purge_interface(&mut self, interface: InterfaceKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.interface != interface);
        let purged = before - self.entries.len();
        if purged > 0 {
            trace!(interface = %interface, purged, "Purged binding names");
        }
        purged
    }

    /// Name of the entry pointing at `record`, if any.
    pub fn name_of(&self, record: RecordId) -> Option<&str> {
        self.entries
            .values()
            .find(|entry| entry.record == record)
            .map(|entry| entry.name.as_str())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
