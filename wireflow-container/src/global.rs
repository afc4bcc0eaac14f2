//! The process-wide default container.

use once_cell::sync::Lazy;

use crate::container::DIContainer;

static GLOBAL: Lazy<DIContainer> = Lazy::new(DIContainer::new);

/// Returns the shared default container, creating it on first use.
///
/// Code that does not thread its own [`DIContainer`] around can bind and
/// resolve here.
pub fn global() -> &'static DIContainer {
    &GLOBAL
}
