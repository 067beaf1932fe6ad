//! XLSX reading (calamine) and writing (`rust_xlsxwriter`).

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{Duration, NaiveDate};
use rust_xlsxwriter::Workbook;

use crate::error::{Result, TableError};
use crate::table::{Table, Value};

/// Read the first worksheet of a workbook. The first row is the header.
///
/// # Errors
///
/// Returns an error if the workbook cannot be opened or has no worksheet.
pub fn read(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::EmptyWorkbook(path.to_path_buf()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::new());
    };
    let headers: Vec<String> = header.iter().map(ToString::to_string).collect();
    let records = rows.map(|row| row.iter().map(cell_value).collect()).collect();

    Ok(Table::from_rows(headers, records))
}

/// Convert one worksheet cell.
///
/// Excel date cells are rendered as `YYYY-MM-DD HH:MM:SS` text so the
/// temporal builder can parse them like any other timestamp string.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::float(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn excel_serial_to_text(serial: f64) -> Value {
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return Value::Null;
    };
    let millis = (serial * 86_400_000.0).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|offset| epoch.checked_add_signed(offset))
        .map_or(Value::Null, |dt| {
            Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string())
        })
}

/// Write `table` to a single-sheet workbook with a header row.
///
/// Null cells are left blank. Positions beyond the sheet limits surface as
/// writer errors.
///
/// # Errors
///
/// Returns an error if a cell cannot be written or the file cannot be saved.
#[allow(clippy::cast_precision_loss)]
pub fn write(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(c).unwrap_or(u16::MAX);
        worksheet.write_string(0, col, column.name.as_str())?;

        for (r, value) in column.values.iter().enumerate() {
            let row = u32::try_from(r + 1).unwrap_or(u32::MAX);
            match value {
                Value::Null => {}
                Value::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Value::Int(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                Value::Float(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                Value::Text(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
