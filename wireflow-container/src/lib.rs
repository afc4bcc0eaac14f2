//! Core container implementation for Wireflow DI.

pub mod binding;
pub mod container;
pub mod dependency;
pub mod error;
pub mod global;
pub mod inject;
pub mod key;
pub mod provider;
pub mod registry;
pub mod scope;
pub mod snapshot;

pub use async_trait::async_trait;
pub use binding::Binding;
pub use container::{ContainerBuilder, ContainerConfig, DIContainer, prelude};
pub use dependency::{BoxFuture, FactoryFn, Produce};
pub use error::{BoxError, ContainerError, LookupError, Result, ValidationError};
pub use global::global;
pub use inject::{FromContainer, Inject};
pub use key::{Interface, InterfaceKey};
pub use provider::Provider;
pub use registry::RegistryEntry;
pub use scope::Scope;
