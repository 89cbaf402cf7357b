//! Derive macros for the recommender's dependency injection.
//!
//! - `#[derive(Context)]` makes every field of the root context extractable
//! - `#[derive(FromContext)]` builds a service by extracting each of its fields
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! export that trait at its root.

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, Fields, FieldsNamed};

mod context;
mod from_context;

/// Derive `FromRef<Self>` for the type of each field.
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub db: Database,
///     pub model: ModelHandle,
/// }
///
/// // impl FromRef<Context> for Database { ... }
/// // impl FromRef<Context> for ModelHandle { ... }
/// ```
///
/// Every field type must be `Clone` and appear only once.
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::expand(input)
}

/// Derive `FromRef<Context>` for a service whose fields all resolve from it.
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct RecommendationService {
///     db: Database,
///     model: ModelHandle,
/// }
/// ```
///
/// The context defaults to `crate::context::Context` and can be overridden
/// with `#[from_context(Context = "path::To::Context")]`.
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    from_context::expand(input)
}

/// Named fields of a struct, or a spanned error naming the derive.
fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<&'a FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{} needs a struct with named fields", derive),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{} can only be derived for structs", derive),
        )),
    }
}
