//! # The Container: heart of Wireflow
//!
//! [`DIContainer`] owns two maps behind one lock:
//!
//! ```text
//! dependencies: InterfaceKey ──> [Dependency, Dependency, ...]   (insertion order)
//! registry:     name         ──> RegistryEntry ──> one Dependency
//! ```
//!
//! `provide` validates a [`Binding`] and appends a record; `resolve`,
//! `resolve_named` and `resolve_all` pick records and materialize them
//! outside the lock; `delete` drops an interface's whole list.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use wireflow_container::prelude::*;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str) -> String;
//! }
//! impl Interface for dyn Logger {}
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) -> String { format!("[LOG] {msg}") }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let container = DIContainer::new();
//! container
//!     .provide(Binding::<dyn Logger>::factory(|| Arc::new(ConsoleLogger) as Arc<dyn Logger>)
//!         .singleton(true))
//!     .expect("valid binding");
//!
//! let logger = container.resolve::<dyn Logger>().await.expect("bound");
//! assert_eq!(logger.log("hi"), "[LOG] hi");
//! # });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, trace, warn};
use wireflow_support::naming::validate_name;
use wireflow_support::rendering::suggest_similar;

use crate::binding::Binding;
use crate::dependency::{self, Dependency};
use crate::error::{LookupError, Result, ValidationError};
use crate::inject::Inject;
use crate::key::{Interface, InterfaceKey};
use crate::provider::Provider;
use crate::registry::{Registry, RegistryEntry};
use crate::snapshot::{BindingSnapshot, ContainerSnapshot, InterfaceSnapshot};

const MAX_SUGGESTIONS: usize = 3;

// ============================================================
// Configuration
// ============================================================

/// Behavioural switches of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    /// `delete` also removes names pointing at the deleted interface.
    pub cascade_delete: bool,
    /// Re-providing an existing name replaces its entry.
    pub allow_name_override: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            cascade_delete: true,
            allow_name_override: true,
        }
    }
}

/// Builds a [`DIContainer`] with non-default configuration.
///
/// ```rust
/// use wireflow_container::prelude::*;
///
/// let container = DIContainer::builder()
///     .cascade_delete(false)
///     .allow_name_override(false)
///     .build();
/// assert!(!container.config().cascade_delete);
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    config: ContainerConfig,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Whether `delete` purges names of the deleted interface.
    pub fn cascade_delete(mut self, cascade: bool) -> Self {
        self.config.cascade_delete = cascade;
        self
    }

    /// Whether an existing binding name may be re-provided.
    pub fn allow_name_override(mut self, allow: bool) -> Self {
        self.config.allow_name_override = allow;
        self
    }

    pub fn build(self) -> DIContainer {
        debug!(config = ?self.config, "Building container");
        DIContainer::with_config(self.config)
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

#[derive(Debug, Default)]
struct State {
    dependencies: HashMap<InterfaceKey, Vec<Arc<Dependency>>>,
    registry: Registry,
}

impl State {
    /// Picks the record a lookup refers to. An empty name means the
    /// first binding of the interface.
    fn select(&self, interface: InterfaceKey, name: Option<&str>) -> Result<Arc<Dependency>> {
        let Some(name) = name.filter(|name| !name.is_empty()) else {
            return self
                .records(interface)
                .and_then(|records| records.first().cloned())
                .ok_or_else(|| self.not_found(interface, None).into());
        };

        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| self.not_found(interface, Some(name)))?;

        if entry.interface != interface {
            warn!(name, requested = %interface, registered = %entry.interface, "Interface mismatch");
            return Err(ValidationError::InterfaceMismatch {
                name: name.to_string(),
                requested: interface,
                registered: entry.interface,
            }
            .into());
        }

        self.records(interface)
            .and_then(|records| records.iter().find(|record| record.id() == entry.record).cloned())
            .ok_or_else(|| self.not_found(interface, Some(name)).into())
    }

    /// Picks the record at `index` in provision order.
    fn select_at(&self, interface: InterfaceKey, index: usize) -> Result<Arc<Dependency>> {
        self.records(interface)
            .and_then(|records| records.get(index).cloned())
            .ok_or_else(|| self.not_found(interface, None).into())
    }

    /// Non-empty record list of `interface`.
    fn records(&self, interface: InterfaceKey) -> Option<&[Arc<Dependency>]> {
        self.dependencies
            .get(&interface)
            .map(Vec::as_slice)
            .filter(|records| !records.is_empty())
    }

    fn not_found(&self, interface: InterfaceKey, name: Option<&str>) -> LookupError {
        let suggestions = match name {
            Some(name) => suggest_similar(name, &self.registry.names(), MAX_SUGGESTIONS),
            None => {
                let bound: Vec<&str> = self
                    .dependencies
                    .iter()
                    .filter(|(_, records)| !records.is_empty())
                    .map(|(key, _)| key.type_name())
                    .collect();
                suggest_similar(interface.type_name(), &bound, MAX_SUGGESTIONS)
            }
        };

        trace!(interface = %interface, name, "Lookup failed");
        LookupError {
            requested: interface,
            name: name.map(str::to_string),
            suggestions,
        }
    }
}

/// Thread-safe dependency injection registry.
///
/// Both maps sit behind a single [`parking_lot::Mutex`] which is never held
/// across an `.await`: lookups clone the selected records out and
/// materialize them afterwards, each record serializing its own singleton
/// initialization.
pub struct DIContainer {
    config: ContainerConfig,
    state: Mutex<State>,
}

impl DIContainer {
    /// Creates an empty container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates a builder for a non-default configuration.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::default()),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ── provide ──

    /// Binds an implementation of the interface `I`.
    ///
    /// `I` must be an [`Interface`], normally a `dyn Trait`. The binding is
    /// appended after any earlier bindings of `I`; if it is named, the name
    /// is (re)pointed at it.
    ///
    /// # Errors
    /// [`ValidationError`] when the binding has neither an instance nor a
    /// factory, when its name is malformed, or when the name is taken and
    /// overriding is disabled. The container is unchanged on error.
    pub fn provide<I>(&self, binding: Binding<I>) -> Result<()>
    where
        I: ?Sized + Interface,
    {
        self.insert(InterfaceKey::of::<I>(), binding)
    }

    /// Binds a value or factory with no separate interface: the binding is
    /// keyed by the concrete type `T` itself.
    ///
    /// # Errors
    /// Same as [`provide`](Self::provide).
    pub fn provide_concrete<T>(&self, binding: Binding<T>) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        self.insert(InterfaceKey::of::<T>(), binding)
    }

    #[instrument(skip_all, fields(interface = %interface), name = "provide")]
    fn insert<I>(&self, interface: InterfaceKey, binding: Binding<I>) -> Result<()>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let implementation = binding.implementation_name();
        let Binding {
            instance,
            factory,
            scope,
            name,
            ..
        } = binding;

        let record = Dependency::new(
            interface,
            implementation,
            instance.map(dependency::erase_instance),
            factory.map(dependency::erase_factory),
            scope,
        )
        .inspect_err(|err| warn!(%err, "Rejected binding"))?;

        if let Some(ref name) = name {
            validate_name(name)
                .map_err(ValidationError::from)
                .inspect_err(|err| warn!(%err, "Rejected binding"))?;
        }

        let mut state = self.state.lock();

        if let Some(name) = name.clone() {
            let entry = RegistryEntry {
                name,
                interface,
                implementation,
                record: record.id(),
            };
            if let Some(replaced) = state.registry.upsert(entry, self.config.allow_name_override)? {
                debug!(name = %replaced.name, previous = %replaced.interface, "Replaced binding name");
            }
        }

        let records = state.dependencies.entry(interface).or_default();
        records.push(Arc::new(record));

        debug!(
            implementation,
            %scope,
            name = name.as_deref(),
            position = records.len() - 1,
            "Provided binding"
        );
        Ok(())
    }

    // ── resolve ──

    /// Resolves the first binding of `I`.
    ///
    /// ```rust,ignore
    /// let db: Arc<dyn Database> = container.resolve::<dyn Database>().await?;
    /// ```
    ///
    /// # Errors
    /// [`LookupError`] if `I` has no binding; any error of the factory.
    pub async fn resolve<I>(&self) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.lookup(None).await
    }

    /// Resolves the binding registered under `name`; an empty `name`
    /// resolves the first binding of `I`. Use [`resolve_at`](Self::resolve_at)
    /// to pick another binding by position.
    ///
    /// # Errors
    /// [`LookupError`] if the name is unknown, or
    /// [`ValidationError::InterfaceMismatch`] if it belongs to another
    /// interface.
    pub async fn resolve_named<I>(&self, name: &str) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.lookup(Some(name)).await
    }

    async fn lookup<I>(&self, name: Option<&str>) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let interface = InterfaceKey::of::<I>();
        trace!(interface = %interface, name, "Resolving");

        let record = {
            let state = self.state.lock();
            state.select(interface, name)?
        };

        let instance = record.get().await?;
        dependency::downcast::<I>(&instance, interface)
    }

    /// Resolves the binding of `I` at `index`, counting in provision order.
    ///
    /// # Errors
    /// [`LookupError`] if `I` has no binding at `index`.
    pub async fn resolve_at<I>(&self, index: usize) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let interface = InterfaceKey::of::<I>();
        trace!(interface = %interface, index, "Resolving by position");

        let record = {
            let state = self.state.lock();
            state.select_at(interface, index)?
        };

        let instance = record.get().await?;
        dependency::downcast::<I>(&instance, interface)
    }

    /// Resolves every binding of `I`, in the order they were provided.
    ///
    /// # Errors
    /// [`LookupError`] if `I` has no binding; [`ValidationError`] if a
    /// stored record is malformed; any error of a factory.
    pub async fn resolve_all<I>(&self) -> Result<Vec<Arc<I>>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let interface = InterfaceKey::of::<I>();
        trace!(interface = %interface, "Resolving all");

        let records = {
            let state = self.state.lock();
            state
                .records(interface)
                .map(<[_]>::to_vec)
                .ok_or_else(|| state.not_found(interface, None))?
        };

        let mut resolved = Vec::with_capacity(records.len());
        for record in records {
            let instance = record.get().await?;
            resolved.push(dependency::downcast::<I>(&instance, interface)?);
        }
        Ok(resolved)
    }

    /// Builds a `T` from the container; see [`Inject`].
    pub async fn inject<T: Inject>(&self) -> Result<T> {
        T::inject(self).await
    }

    // ── delete ──

    /// Removes every binding of `I`. Deleting an unknown interface is a
    /// no-op.
    ///
    /// With `cascade_delete` (the default) names pointing at `I` are
    /// removed too; otherwise they stay but no longer resolve.
    pub fn delete<I>(&self)
    where
        I: ?Sized + 'static,
    {
        let interface = InterfaceKey::of::<I>();
        let mut state = self.state.lock();

        let removed = state.dependencies.remove(&interface).map_or(0, |records| records.len());
        let purged = if self.config.cascade_delete {
            state.registry.purge_interface(interface)
        } else {
            0
        };

        debug!(interface = %interface, removed, purged, "Deleted bindings");
    }

    // ── providers ──

    /// Lets a [`Provider`] register its bindings.
    ///
    /// # Errors
    /// The first error returned by the provider.
    pub fn install(&self, provider: &dyn Provider) -> Result<()> {
        debug!(provider = provider.name(), "Installing provider");
        provider.register(self)
    }

    // ── introspection ──

    /// `true` if `I` has at least one binding.
    pub fn contains<I>(&self) -> bool
    where
        I: ?Sized + 'static,
    {
        self.state.lock().records(InterfaceKey::of::<I>()).is_some()
    }

    /// Number of interfaces with at least one binding.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .dependencies
            .values()
            .filter(|records| !records.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All binding names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.state
            .lock()
            .registry
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Serializable view of every binding, sorted by interface name.
    pub fn snapshot(&self) -> ContainerSnapshot {
        let state = self.state.lock();

        let mut interfaces: Vec<InterfaceSnapshot> = state
            .dependencies
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(interface, records)| InterfaceSnapshot {
                interface: interface.type_name().to_string(),
                bindings: records
                    .iter()
                    .map(|record| BindingSnapshot {
                        implementation: record.implementation().to_string(),
                        scope: record.scope(),
                        materialized: record.is_materialized(),
                        name: state.registry.name_of(record.id()).map(str::to_string),
                    })
                    .collect(),
            })
            .collect();
        interfaces.sort_by(|a, b| a.interface.cmp(&b.interface));

        ContainerSnapshot {
            interfaces,
            names: state.registry.len(),
        }
    }
}

impl Default for DIContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DIContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("DIContainer")
            .field("interfaces", &state.dependencies.len())
            .field("names", &state.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{ContainerBuilder, ContainerConfig, DIContainer};
    pub use crate::binding::Binding;
    pub use crate::error::{ContainerError, LookupError, Result, ValidationError};
    pub use crate::global::global;
    pub use crate::inject::{FromContainer, Inject};
    pub use crate::key::{Interface, InterfaceKey};
    pub use crate::provider::Provider;
    pub use crate::scope::Scope;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
