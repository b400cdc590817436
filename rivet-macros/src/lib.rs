//! Proc-Macros implementations for the rivet dependency-resolution crates

#[cfg(feature = "injectable-derive")]
mod injectable;

/// Derive macro generating the shape table that lets the injector construct
/// a struct.
///
/// Fields without attributes become constructor parameters, resolved in
/// declaration order: `Rc<X>` fields (including `Rc<dyn Trait>`) resolve as
/// shared pointers, anything else resolves by value and must implement
/// `Clone`. Primitive-typed fields resolve to their zero values.
///
/// Fields marked `#[inject]` are injectable properties: they are
/// initialized through `Default` during construction and assigned
/// afterwards by resolving their type (an `Option<X>` field receives
/// `Some(value)`). A marked field that is not `pub` has no public setter,
/// and resolving the type fails.
///
/// # Example
/// ```ignore
/// use rivet_di::{Injectable, interface};
/// use std::rc::Rc;
///
/// interface! { Logger }
///
/// #[derive(Injectable)]
/// struct Service {
///     logger: Rc<dyn Logger>,
///     retries: i32,
///     #[inject]
///     pub metrics: Option<Rc<Metrics>>,
/// }
/// ```
#[cfg(feature = "injectable-derive")]
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    injectable::expand_injectable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
