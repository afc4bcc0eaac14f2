//! # Wireflow Support
//!
//! Shared utilities for the Wireflow DI crates.
//!
//! This crate provides:
//! - Binding-name validation
//! - Text rendering for error messages

pub mod naming;
pub mod rendering;

pub use naming::{NameError, validate_name};
