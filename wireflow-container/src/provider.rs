//! Provider trait: a module of related bindings.
//!
//! Providers group the `provide` calls of one area of an application so
//! they can be installed together:
//!
//! ```rust,ignore
//! container.install(&DatabaseProvider)?;
//! container.install(&MailProvider)?;
//! ```

use crate::container::DIContainer;
use crate::error::Result;

/// A module that registers related bindings into a container.
pub trait Provider: Send + Sync {
    /// Provide this module's bindings.
    ///
    /// Called by [`DIContainer::install`]; the first error stops it.
    fn register(&self, container: &DIContainer) -> Result<()>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
