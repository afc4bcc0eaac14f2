//! # Wireflow: async dependency injection registry
//!
//! Bind implementations of interfaces (trait objects) or factories that
//! produce them, optionally under a name, then resolve one or all of them.
//!
//! ```rust
//! use std::sync::Arc;
//! use wireflow::prelude::*;
//!
//! #[interface]
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let container = DIContainer::new();
//! container.provide(Binding::<dyn Greeter>::instance(Arc::new(English)))?;
//!
//! let greeter = container.resolve::<dyn Greeter>().await?;
//! assert_eq!(greeter.greet(), "hello");
//! # Ok::<(), ContainerError>(())
//! # }).unwrap();
//! ```

pub use wireflow_container::*;
pub use wireflow_derive::*;
pub use wireflow_support::*;

pub mod prelude {
    pub use wireflow_container::prelude::*;
    pub use wireflow_derive::{Inject, interface};
}
