//! Derive and attribute macros for Wireflow.

pub use wireflow_macros::{Inject, interface};
