//! Derive macros for the Fixture Creator library
//!
//! This crate provides the `Describe` derive, which records a struct's
//! declared fields at compile time so a fixture can be generated for it.

use proc_macro::TokenStream;

mod describe;

/// Derive macro for automatically implementing the Describe trait
///
/// The generated implementation reports the struct's fields in declaration
/// order, with each field's type written the way it appears in the source.
///
/// # Basic Usage
///
/// ```rust
/// use fixture_creator::Describe;
///
/// #[derive(Describe)]
/// struct Xpto {
///     s1: String,
///     address: Address,
/// }
/// ```
///
/// # Customization
///
/// ```rust
/// use fixture_creator::Describe;
///
/// #[derive(Describe)]
/// #[describe(name = "Person", package = "br.com.kimae.in", import = "java.time.LocalDate")]
/// struct PersonRecord {
///     #[describe(ty = "LocalDate")]
///     born: chrono::NaiveDate,
///     #[describe(rename = "fullName", ty = "String")]
///     full_name: Box<str>,
/// }
/// ```
///
/// # Supported Attributes
///
/// On the struct:
/// - `name = "..."`: simple name of the described type (defaults to the struct name)
/// - `package = "..."`: package that bare, non-imported type names resolve into
/// - `import = "..."`: qualified type made visible by its simple name (repeatable)
///
/// On a field:
/// - `rename = "..."`: field name to report
/// - `ty = "..."`: declared type to report instead of the Rust type
#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    describe::derive_describe_impl(input)
}
