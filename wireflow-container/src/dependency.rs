//! Dependency records: the materialization state of one binding.
//!
//! A record holds an optional ready instance, an optional factory and a
//! [`Scope`]. Values are stored type-erased: an `Arc<I>` boxed into
//! `Arc<dyn Any + Send + Sync>`, and downcast back on resolve.
//!
//! ```text
//! Unmaterialized ──get() [Singleton]──> Materialized
//!       │
//!       └── get() [Transient] runs the factory every time
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::{BoxError, ContainerError, Result, ValidationError};
use crate::key::InterfaceKey;
use crate::scope::Scope;

/// Boxed, sendable future used by factories.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Typed factory as held by a [`Binding`](crate::binding::Binding).
pub type FactoryFn<I> = Arc<dyn Fn() -> BoxFuture<Result<Option<Arc<I>>>> + Send + Sync>;

/// A type-erased `Arc<I>`.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type ErasedFactory = Arc<dyn Fn() -> BoxFuture<Result<Option<Instance>>> + Send + Sync>;

/// Identifies a record inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        RecordId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a factory may return.
///
/// `None` is an empty result and fails validation; `Err` is passed to the
/// caller as [`ContainerError::Factory`].
pub trait Produce<I: ?Sized>: Send + 'static {
    fn into_produced(self) -> Result<Option<Arc<I>>>;
}

impl<I> Produce<I> for Arc<I>
where
    I: ?Sized + Send + Sync + 'static,
{
    fn into_produced(self) -> Result<Option<Arc<I>>> {
        Ok(Some(self))
    }
}

impl<I> Produce<I> for Option<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    fn into_produced(self) -> Result<Option<Arc<I>>> {
        Ok(self)
    }
}

impl<I, E> Produce<I> for std::result::Result<Arc<I>, E>
where
    I: ?Sized + Send + Sync + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn into_produced(self) -> Result<Option<Arc<I>>> {
        self.map(Some).map_err(|e| ContainerError::Factory(e.into()))
    }
}

impl<I, E> Produce<I> for std::result::Result<Option<Arc<I>>, E>
where
    I: ?Sized + Send + Sync + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn into_produced(self) -> Result<Option<Arc<I>>> {
        self.map_err(|e| ContainerError::Factory(e.into()))
    }
}

/// Erases an `Arc<I>` for storage.
pub(crate) fn erase_instance<I>(instance: Arc<I>) -> Instance
where
    I: ?Sized + Send + Sync + 'static,
{
    Arc::new(instance)
}

/// Erases a typed factory for storage.
pub(crate) fn erase_factory<I>(factory: FactoryFn<I>) -> ErasedFactory
where
    I: ?Sized + Send + Sync + 'static,
{
    Arc::new(move || -> BoxFuture<Result<Option<Instance>>> {
        let produced = factory();
        Box::pin(async move { Ok(produced.await?.map(erase_instance)) })
    })
}

/// Recovers the `Arc<I>` stored in an erased instance.
pub(crate) fn downcast<I>(instance: &Instance, interface: InterfaceKey) -> Result<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<I>>()
        .cloned()
        .ok_or_else(|| ValidationError::MalformedRecord { interface }.into())
}

/// Materialization state of one binding.
pub(crate) struct Dependency {
    id: RecordId,
    interface: InterfaceKey,
    implementation: &'static str,
    scope: Scope,
    instance: OnceCell<Instance>,
    factory: Option<ErasedFactory>,
}

impl Dependency {
    /// Creates a record.
    ///
    /// # Errors
    /// [`ValidationError::MissingSource`] when neither an instance nor a
    /// factory is given.
    pub fn new(
        interface: InterfaceKey,
        implementation: &'static str,
        instance: Option<Instance>,
        factory: Option<ErasedFactory>,
        scope: Scope,
    ) -> std::result::Result<Self, ValidationError> {
        if instance.is_none() && factory.is_none() {
            return Err(ValidationError::MissingSource { interface });
        }

        Ok(Self {
            id: RecordId::next(),
            interface,
            implementation,
            scope,
            instance: OnceCell::new_with(instance),
            factory,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// `true` once a value is cached in the record.
    pub fn is_materialized(&self) -> bool {
        self.instance.initialized()
    }

    /// Produces the binding's value.
    ///
    /// A cached instance wins. Otherwise the factory runs; for a singleton
    /// its product is cached, and concurrent callers wait for the first
    /// one so the factory runs at most once. A cancelled initialization
    /// leaves the record unmaterialized.
    pub async fn get(&self) -> Result<Instance> {
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let Some(factory) = self.factory.as_ref() else {
            return Err(ValidationError::MalformedRecord {
                interface: self.interface,
            }
            .into());
        };

        if !self.scope.is_cached() {
            return self.produce(factory).await;
        }

        let instance = self
            .instance
            .get_or_try_init(|| self.produce(factory))
            .await?;
        Ok(instance.clone())
    }

    async fn produce(&self, factory: &ErasedFactory) -> Result<Instance> {
        trace!(interface = %self.interface, scope = %self.scope, "Running factory");
        factory().await?.ok_or_else(|| {
            ValidationError::EmptyFactoryResult {
                interface: self.interface,
            }
            .into()
        })
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("interface", &self.interface)
            .field("implementation", &self.implementation)
            .field("scope", &self.scope)
            .field("materialized", &self.is_materialized())
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    trait Counter: Send + Sync + fmt::Debug {
        fn value(&self) -> u32;
    }

    #[derive(Debug)]
    struct Fixed(u32);

    impl Counter for Fixed {
        fn value(&self) -> u32 {
            self.0
        }
    }

    type CounterFuture = BoxFuture<Result<Option<Arc<dyn Counter>>>>;

    fn key() -> InterfaceKey {
        InterfaceKey::of::<dyn Counter>()
    }

    fn counting_factory(calls: Arc<AtomicU32>) -> ErasedFactory {
        let typed: FactoryFn<dyn Counter> = Arc::new(move || -> CounterFuture {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { (Arc::new(Fixed(n)) as Arc<dyn Counter>).into_produced() })
        });
        erase_factory(typed)
    }

    fn value_of(instance: &Instance) -> u32 {
        downcast::<dyn Counter>(instance, key()).unwrap().value()
    }

    #[test]
    fn new_without_source_fails() {
        let err = Dependency::new(key(), "none", None, None, Scope::Singleton).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSource { .. }));
    }

    #[tokio::test]
    async fn instance_record_returns_same_value() {
        let counter: Arc<dyn Counter> = Arc::new(Fixed(7));
        let record = Dependency::new(
            key(),
            "Fixed",
            Some(erase_instance(counter.clone())),
            None,
            Scope::Transient,
        )
        .unwrap();

        assert!(record.is_materialized());
        let a = downcast::<dyn Counter>(&record.get().await.unwrap(), key()).unwrap();
        let b = downcast::<dyn Counter>(&record.get().await.unwrap(), key()).unwrap();
        assert!(Arc::ptr_eq(&a, &counter));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn singleton_factory_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let record =
            Dependency::new(key(), "Fixed", None, Some(counting_factory(calls.clone())), Scope::Singleton)
                .unwrap();

        assert!(!record.is_materialized());
        let a = record.get().await.unwrap();
        let b = record.get().await.unwrap();

        assert!(record.is_materialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn transient_factory_runs_every_time() {
        let calls = Arc::new(AtomicU32::new(0));
        let record =
            Dependency::new(key(), "Fixed", None, Some(counting_factory(calls.clone())), Scope::Transient)
                .unwrap();

        let a = record.get().await.unwrap();
        let b = record.get().await.unwrap();

        assert_eq!(value_of(&a), 0);
        assert_eq!(value_of(&b), 1);
        assert!(!record.is_materialized());
    }

    #[tokio::test]
    async fn concurrent_singleton_materialization_is_serialized() {
        let calls = Arc::new(AtomicU32::new(0));
        let typed: FactoryFn<dyn Counter> = {
            let calls = calls.clone();
            Arc::new(move || -> CounterFuture {
                let calls = calls.clone();
                Box::pin(async move {
                    tokio::task::yield_now().await;
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    (Arc::new(Fixed(n)) as Arc<dyn Counter>).into_produced()
                })
            })
        };
        let record = Arc::new(
            Dependency::new(key(), "Fixed", None, Some(erase_factory(typed)), Scope::Singleton)
                .unwrap(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let record = record.clone();
                tokio::spawn(async move { value_of(&record.get().await.unwrap()) })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_factory_result_is_validation_error() {
        let typed: FactoryFn<dyn Counter> =
            Arc::new(|| -> CounterFuture { Box::pin(async { None::<Arc<dyn Counter>>.into_produced() }) });
        let record =
            Dependency::new(key(), "Fixed", None, Some(erase_factory(typed)), Scope::Singleton).unwrap();

        let err = record.get().await.unwrap_err();
        assert!(matches!(
            err,
            ContainerError::Validation(ValidationError::EmptyFactoryResult { .. })
        ));
        assert!(!record.is_materialized());
    }

    #[tokio::test]
    async fn failed_singleton_can_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let typed: FactoryFn<dyn Counter> = {
            let calls = calls.clone();
            Arc::new(move || -> CounterFuture {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                Box::pin(async move {
                    let produced: std::result::Result<Arc<dyn Counter>, BoxError> = if attempt == 0 {
                        Err("not yet".into())
                    } else {
                        Ok(Arc::new(Fixed(attempt)))
                    };
                    produced.into_produced()
                })
            })
        };
        let record =
            Dependency::new(key(), "Fixed", None, Some(erase_factory(typed)), Scope::Singleton).unwrap();

        let err = record.get().await.unwrap_err();
        assert!(err.is_factory());
        assert_eq!(err.to_string(), "not yet");

        assert_eq!(value_of(&record.get().await.unwrap()), 1);
        assert_eq!(value_of(&record.get().await.unwrap()), 1);
    }

    #[test]
    fn downcast_to_wrong_interface_is_malformed() {
        let instance = erase_instance(Arc::new(String::from("not a counter")));
        let err = downcast::<dyn Counter>(&instance, key()).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::Validation(ValidationError::MalformedRecord { .. })
        ));
    }
}
