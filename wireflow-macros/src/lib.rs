//! Procedural macros for Wireflow.
//!
//! Generated code refers to the facade crate as `::wireflow`.

mod inject;
mod interface;

/// Implements `wireflow::Inject` for a struct with named fields.
///
/// Every field type must implement `wireflow::FromContainer`
/// (`Arc<I>`, `Option<Arc<I>>` or `Vec<Arc<I>>`). A field marked
/// `#[inject(name = "...")]` resolves that named binding.
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    crate::inject::derive(input).unwrap_or_else(|e| e)
}

/// Declares a trait as an injectable interface.
///
/// Adds `Send + Sync` supertraits when missing and implements
/// `wireflow::Interface` for `dyn Trait`. A trait without at least one
/// required method is rejected, as are generic traits and traits with
/// associated types.
#[proc_macro_attribute]
pub fn interface(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    crate::interface::expand(attr, item).unwrap_or_else(|e| e)
}
