//! Parsing logic for the BulkRow derive macro.
//!
//! Extracts `#[bulk(...)]` attributes from the derive input into `RowDef` and
//! `FieldDef` structures used for code generation.

use proc_macro2::Span;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Generics, Ident, Lit, Path, Result};

/// Naming convention applied to field names that have no explicit `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    /// Keep the Rust field name (`text_col`)
    #[default]
    None,
    /// `TextCol`
    PascalCase,
    /// `textCol`
    CamelCase,
    /// `TEXT_COL`
    ScreamingSnakeCase,
}

impl RenameRule {
    fn parse(value: &str, span: Span) -> Result<Self> {
        match value {
            "snake_case" | "none" => Ok(RenameRule::None),
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnakeCase),
            other => Err(Error::new(
                span,
                format!(
                    "unknown rename_all rule '{other}'; expected one of \
                     snake_case, PascalCase, camelCase, SCREAMING_SNAKE_CASE"
                ),
            )),
        }
    }

    /// Apply the rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::None => field.to_string(),
            RenameRule::PascalCase => to_pascal_case(field),
            RenameRule::CamelCase => {
                let pascal = to_pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
            RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
        }
    }
}

/// Parsed row definition from a struct with `#[derive(BulkRow)]`.
#[derive(Debug)]
pub struct RowDef {
    /// The struct name.
    pub name: Ident,
    /// Parsed field definitions, skipped fields included.
    pub fields: Vec<FieldDef>,
    /// Generic parameters from the struct.
    pub generics: Generics,
    /// Path to the crate exporting `BulkRow` and `Value`.
    pub crate_path: Path,
}

/// Parsed field definition from a struct field.
#[derive(Debug)]
pub struct FieldDef {
    /// The Rust field name (e.g., `text_col`).
    pub name: Ident,
    /// The column name the field answers to (e.g., `"TextCol"`).
    pub column_name: String,
    /// Excluded from column access.
    pub skip: bool,
}

impl RowDef {
    /// Fields that participate in column access.
    pub fn columns(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.skip)
    }
}

#[derive(Default)]
struct StructAttrs {
    rename_all: RenameRule,
    crate_path: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    skip: bool,
}

/// Parse a derive input into a row definition.
pub fn parse_row(input: &DeriveInput) -> Result<RowDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();
    let StructAttrs {
        rename_all,
        crate_path,
    } = parse_struct_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields, rename_all)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "BulkRow can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "BulkRow can only be derived for structs, not unions",
            ));
        }
    };

    let crate_path = match crate_path {
        Some(path) => path,
        None => syn::parse_quote!(::bulksql),
    };

    Ok(RowDef {
        name,
        fields,
        generics,
        crate_path,
    })
}

fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("bulk") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: Lit = meta.value()?.parse()?;
                let Lit::Str(lit_str) = value else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for rename_all",
                    ));
                };
                result.rename_all = RenameRule::parse(&lit_str.value(), lit_str.span())?;
                Ok(())
            } else if meta.path.is_ident("crate") {
                let value: Lit = meta.value()?.parse()?;
                let Lit::Str(lit_str) = value else {
                    return Err(Error::new_spanned(value, "expected string literal for crate"));
                };
                result.crate_path = Some(lit_str.parse()?);
                Ok(())
            } else {
                Err(meta.error(
                    "unknown bulk struct attribute; expected `rename_all` or `crate`",
                ))
            }
        })?;
    }

    Ok(result)
}

fn parse_fields(fields: &Fields, rename_all: RenameRule) -> Result<Vec<FieldDef>> {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| parse_field(field, rename_all))
            .collect(),
        Fields::Unnamed(_) => Err(Error::new(
            Span::call_site(),
            "BulkRow requires a struct with named fields, not a tuple struct",
        )),
        Fields::Unit => Err(Error::new(
            Span::call_site(),
            "BulkRow requires a struct with fields, not a unit struct",
        )),
    }
}

fn parse_field(field: &Field, rename_all: RenameRule) -> Result<FieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let attrs = parse_field_attrs(&field.attrs)?;

    // Raw identifiers (`r#type`) answer to their unprefixed name
    let plain = name.to_string();
    let plain = plain.strip_prefix("r#").unwrap_or(&plain);
    let column_name = attrs.column.unwrap_or_else(|| rename_all.apply(plain));

    Ok(FieldDef {
        name,
        column_name,
        skip: attrs.skip,
    })
}

fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("bulk") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
                Ok(())
            } else if meta.path.is_ident("column") {
                if result.column.is_some() {
                    return Err(Error::new_spanned(
                        meta.path,
                        "duplicate bulk attribute: column",
                    ));
                }
                let value: Lit = meta.value()?.parse()?;
                let Lit::Str(lit_str) = value else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for column name",
                    ));
                };
                result.column = Some(lit_str.value());
                Ok(())
            } else {
                Err(meta.error("unknown bulk field attribute; expected `column` or `skip`"))
            }
        })?;
    }

    Ok(result)
}

/// Convert a snake_case name to PascalCase (`text_col` -> `TextCol`).
fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut upper_next = true;

    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
