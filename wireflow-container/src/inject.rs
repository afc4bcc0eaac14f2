//! Building values out of the container.
//!
//! [`Inject`] is implemented by types that can assemble themselves from a
//! [`DIContainer`], usually through `#[derive(Inject)]`. Each field is
//! produced by its [`FromContainer`] impl:
//!
//! | Field type | Resolution |
//! |---|---|
//! | `Arc<I>` | `resolve::<I>()`, or `resolve_named::<I>(name)` |
//! | `Option<Arc<I>>` | as above, `None` when nothing is bound |
//! | `Vec<Arc<I>>` | `resolve_all::<I>()` |

use std::sync::Arc;

use async_trait::async_trait;

use crate::container::DIContainer;
use crate::error::{ContainerError, Result, ValidationError};
use crate::key::InterfaceKey;

/// A type that can be built entirely from container bindings.
///
/// ```rust,ignore
/// #[derive(Inject)]
/// struct Checkout {
///     #[inject(name = "stripe")]
///     payments: Arc<dyn Payments>,
///     audit: Vec<Arc<dyn AuditSink>>,
/// }
///
/// let checkout: Checkout = container.inject().await?;
/// ```
#[async_trait]
pub trait Inject: Sized {
    async fn inject(container: &DIContainer) -> Result<Self>;
}

/// A single injectable value, optionally selected by binding name.
#[async_trait]
pub trait FromContainer: Sized {
    async fn from_container(container: &DIContainer, name: Option<&str>) -> Result<Self>;
}

#[async_trait]
impl<I> FromContainer for Arc<I>
where
    I: ?Sized + Send + Sync + 'static,
{
    async fn from_container(container: &DIContainer, name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => container.resolve_named::<I>(name).await,
            None => container.resolve::<I>().await,
        }
    }
}

#[async_trait]
impl<I> FromContainer for Option<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    async fn from_container(container: &DIContainer, name: Option<&str>) -> Result<Self> {
        match Arc::<I>::from_container(container, name).await {
            Ok(value) => Ok(Some(value)),
            Err(ContainerError::Lookup(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl<I> FromContainer for Vec<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    async fn from_container(container: &DIContainer, name: Option<&str>) -> Result<Self> {
        if let Some(name) = name {
            return Err(ValidationError::NamedCollection {
                name: name.to_string(),
                interface: InterfaceKey::of::<I>(),
            }
            .into());
        }
        container.resolve_all::<I>().await
    }
}
