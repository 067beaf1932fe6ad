//! CSV reading and writing.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::table::{Table, Value};

/// Read a headed CSV file, inferring each cell's type.
///
/// Records shorter than the header are padded with nulls.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a record is malformed.
pub fn read(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Value::infer).collect());
    }

    Ok(Table::from_rows(headers, rows))
}

/// Write `table` as CSV with a header row. Nulls are written as empty fields.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write(table: &Table, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        writer.write_record(table.row(row).map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
