//! Binding descriptions passed to `provide`.
//!
//! A [`Binding`] collects everything `provide` needs: an optional ready
//! instance, an optional factory, the [`Scope`] and an optional name.
//! Nothing is validated here; `provide` does that atomically.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use wireflow_container::binding::Binding;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! let ready = Binding::<dyn Greeter>::instance(Arc::new(English)).named("english");
//! let lazy = Binding::<dyn Greeter>::factory(|| Arc::new(English) as Arc<dyn Greeter>)
//!     .singleton(true);
//! # let _ = (ready, lazy);
//! ```

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::dependency::{BoxFuture, FactoryFn, Produce};
use crate::error::Result;
use crate::scope::Scope;

/// Everything needed to bind one implementation of `I`.
pub struct Binding<I: ?Sized> {
    pub(crate) instance: Option<Arc<I>>,
    pub(crate) factory: Option<FactoryFn<I>>,
    pub(crate) scope: Scope,
    pub(crate) name: Option<String>,
    pub(crate) implementation: Option<&'static str>,
}

impl<I> Binding<I>
where
    I: ?Sized + Send + Sync + 'static,
{
    /// An empty binding. `provide` rejects it until an instance or a
    /// factory is attached.
    pub fn new() -> Self {
        Self {
            instance: None,
            factory: None,
            scope: Scope::default(),
            name: None,
            implementation: None,
        }
    }

    /// Binds a ready instance. Every resolve returns this very `Arc`.
    pub fn instance(instance: Arc<I>) -> Self {
        Self::new().with_instance(instance)
    }

    /// Binds a synchronous factory.
    ///
    /// The factory may return `Arc<I>`, `Option<Arc<I>>` or a `Result` of
    /// either; see [`Produce`].
    pub fn factory<F, P>(factory: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: Produce<I>,
    {
        let factory: FactoryFn<I> = Arc::new(move || -> BoxFuture<Result<Option<Arc<I>>>> {
            let produced = factory().into_produced();
            Box::pin(std::future::ready(produced))
        });
        Self {
            factory: Some(factory),
            ..Self::new()
        }
    }

    /// Binds an asynchronous factory.
    pub fn async_factory<F, Fut, P>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = P> + Send + 'static,
        P: Produce<I>,
    {
        let factory: FactoryFn<I> = Arc::new(move || -> BoxFuture<Result<Option<Arc<I>>>> {
            let pending = factory();
            Box::pin(async move { pending.await.into_produced() })
        });
        Self {
            factory: Some(factory),
            ..Self::new()
        }
    }

    /// Attaches a ready instance; it takes precedence over any factory.
    pub fn with_instance(mut self, instance: Arc<I>) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Maps the `singleton` flag onto [`Scope`].
    pub fn singleton(self, singleton: bool) -> Self {
        self.scope(Scope::from_singleton(singleton))
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Also indexes the binding under `name`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Records the concrete type behind the binding, for diagnostics.
    pub fn implemented_by<T: ?Sized>(mut self) -> Self {
        self.implementation = Some(type_name::<T>());
        self
    }

    pub(crate) fn implementation_name(&self) -> &'static str {
        self.implementation.unwrap_or_else(type_name::<I>)
    }
}

impl<T> Binding<T>
where
    T: Send + Sync + 'static,
{
    /// Binds a concrete value, wrapping it in an `Arc`.
    pub fn value(value: T) -> Self {
        Self::instance(Arc::new(value)).implemented_by::<T>()
    }
}

impl<I> Default for Binding<I>
where
    I: ?Sized + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized> fmt::Debug for Binding<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("interface", &type_name::<I>())
            .field("has_instance", &self.instance.is_some())
            .field("has_factory", &self.factory.is_some())
            .field("scope", &self.scope)
            .field("name", &self.name)
            .finish()
    }
}
