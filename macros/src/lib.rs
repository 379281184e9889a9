//! Proc macros for alloy-ui: `sketch!` markup specs.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `alloy-ui`.

use proc_macro::TokenStream;

mod sketch_macro;

/// Markup for a component spec.
///
/// Expands to a `ComponentSpec` builder chain.
///
/// # Syntax
///
/// - `<tag />` or `<tag attrs...> children </tag>`
/// - children are elements, string literals (text components) or `{expr}`
///   evaluating to anything `Into<AlloySpec>`
///
/// # Attributes
///
/// - `uid="value"` becomes `.with_uid("value")`
/// - `class="a b"` adds each class
/// - `style="color: red; width: 1px"` adds each declaration
/// - `html="..."` sets the inner html, `value=".."` the form value
/// - `behaviour={expr}` adds a configured behaviour (repeatable)
/// - anything else becomes an attribute; values are literals or `{expr}`
///
/// # Example
///
/// ```ignore
/// sketch! {
///     <button uid="save" class="btn" type="button" behaviour={Toggling::config(cfg)}>
///         "Save"
///         <span class="icon" />
///     </button>
/// }
/// ```
#[proc_macro]
pub fn sketch(input: TokenStream) -> TokenStream {
    sketch_macro::sketch_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
