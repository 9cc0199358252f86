//! Compile-time validation for the BulkRow derive macro.

use std::collections::HashSet;

use syn::Error;

use crate::parse::RowDef;

/// Validate a parsed row definition.
///
/// Collects every problem and reports them together.
pub fn validate_row(row: &RowDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    validate_has_columns(row, &mut errors);
    validate_column_names(row, &mut errors);
    validate_no_duplicate_columns(row, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let mut combined = errors.remove(0);
        for err in errors {
            combined.combine(err);
        }
        Err(combined)
    }
}

fn validate_has_columns(row: &RowDef, errors: &mut Vec<Error>) {
    if row.columns().next().is_none() {
        errors.push(Error::new(
            row.name.span(),
            "BulkRow struct must have at least one non-skipped field",
        ));
    }
}

/// Column names end up in SQL text and placeholder names, so they must be
/// plain identifiers.
fn validate_column_names(row: &RowDef, errors: &mut Vec<Error>) {
    for field in row.columns() {
        let name = &field.column_name;
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_start || !valid_rest {
            errors.push(Error::new(
                field.name.span(),
                format!(
                    "column name '{name}' must start with a letter or underscore \
                     and contain only ASCII letters, digits and underscores"
                ),
            ));
        }
    }
}

fn validate_no_duplicate_columns(row: &RowDef, errors: &mut Vec<Error>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for field in row.columns() {
        if !seen.insert(&field.column_name) {
            errors.push(Error::new(
                field.name.span(),
                format!(
                    "duplicate column name '{}'; another field already maps to this column",
                    field.column_name
                ),
            ));
        }
    }
}
