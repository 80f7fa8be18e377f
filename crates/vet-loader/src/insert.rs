//! Multi-row INSERT construction.

use crate::error::LoaderError;
use mysql_async::{Params, Value};
use vet_types::{SeedValue, Table};

/// Maximum number of `?` placeholders MySQL accepts in one prepared statement.
pub const MAX_PLACEHOLDERS: usize = 65_535;

/// Largest chunk size that fits in one prepared statement for `table`.
pub fn max_chunk_size(table: Table) -> usize {
    MAX_PLACEHOLDERS / table.columns().len()
}

/// Check that a chunk of `rows` rows can be bound into one statement.
pub fn check_chunk_size(table: Table, rows: usize) -> Result<(), LoaderError> {
    if rows == 0 {
        return Err(LoaderError::InvalidChunkSize(rows));
    }

    let placeholders = rows * table.columns().len();
    if placeholders > MAX_PLACEHOLDERS {
        return Err(LoaderError::TooManyPlaceholders {
            table: table.name(),
            rows,
            placeholders,
            limit: MAX_PLACEHOLDERS,
        });
    }

    Ok(())
}

/// Build one INSERT statement covering every row, with positional parameters.
///
/// Each row must hold one value per column of `table`, in column order.
pub fn build_bulk_insert(
    table: Table,
    rows: Vec<Vec<SeedValue>>,
) -> Result<(String, Params), LoaderError> {
    check_chunk_size(table, rows.len())?;

    let width = table.columns().len();
    let mut params: Vec<Value> = Vec::with_capacity(rows.len() * width);

    for row in &rows {
        if row.len() != width {
            return Err(LoaderError::Store(format!(
                "row for '{table}' has {} values, expected {width}",
                row.len()
            )));
        }
    }

    let sql = table.bulk_insert_statement(rows.len());
    for row in rows {
        params.extend(row.into_iter().map(Value::from));
    }

    Ok((sql, Params::Positional(params)))
}
