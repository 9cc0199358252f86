//! Procedural macros for bulksql.
//!
//! `#[derive(BulkRow)]` gives a struct named-field access by column name, so
//! its values can be bound by the bulk INSERT/UPDATE/DELETE generators.
//! The facade crate `bulksql` re-exports it.

use proc_macro::TokenStream;
use quote::quote;

mod parse;
mod validate;

use parse::{RowDef, parse_row};

/// Derive macro for the `BulkRow` trait.
///
/// Generates a `field(&self, column)` lookup that clones the matching field
/// into a `Value`, plus the static column list. Every non-skipped field type
/// must implement `Clone` and `Into<Value>`.
///
/// # Attributes
///
/// - `#[bulk(rename_all = "PascalCase")]` - Derive column names from field
///   names (`snake_case`, `PascalCase`, `camelCase`, `SCREAMING_SNAKE_CASE`)
/// - `#[bulk(crate = "path")]` - Path to the crate exporting `BulkRow`
///   (defaults to `::bulksql`)
/// - `#[bulk(column = "Name")]` - Override a field's column name
/// - `#[bulk(skip)]` - Exclude a field from column access
///
/// # Example
///
/// ```ignore
/// use bulksql::BulkRow;
///
/// #[derive(BulkRow, Clone)]
/// #[bulk(rename_all = "PascalCase")]
/// struct TestTable {
///     id: i64,
///     text_col: String,
///     #[bulk(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(BulkRow, attributes(bulk))]
pub fn derive_bulk_row(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let row = match parse_row(&input) {
        Ok(r) => r,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_row(&row) {
        return e.to_compile_error().into();
    }

    generate_bulk_row_impl(&row).into()
}

fn generate_bulk_row_impl(row: &RowDef) -> proc_macro2::TokenStream {
    let name = &row.name;
    let krate = &row.crate_path;
    let (impl_generics, ty_generics, where_clause) = row.generics.split_for_impl();

    let column_names: Vec<&str> = row.columns().map(|f| f.column_name.as_str()).collect();
    let arms = row.columns().map(|f| {
        let column = &f.column_name;
        let field = &f.name;
        quote! {
            #column => ::core::option::Option::Some(
                <#krate::Value as ::core::convert::From<_>>::from(
                    ::core::clone::Clone::clone(&self.#field),
                ),
            ),
        }
    });

    quote! {
        impl #impl_generics #krate::BulkRow for #name #ty_generics #where_clause {
            fn field(&self, column: &str) -> ::core::option::Option<#krate::Value> {
                match column {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn columns() -> &'static [&'static str] {
                &[#(#column_names),*]
            }
        }
    }
}
