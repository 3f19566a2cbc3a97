// Excel import (xlsx, xlsm, xls, xlsb, ods) into raw counts

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use invcheck_recon::model::{Cell, RawCount, RawSheet};
use invcheck_recon::ReconError;

/// Maximum number of data rows read per sheet (guards against runaway ranges)
const MAX_ROWS: usize = 1_048_576;

/// Import every sheet of a workbook. The first row of each sheet is its
/// header row; the rows below it are kept in order, blanks included.
pub fn import(path: &Path, label: &str) -> Result<RawCount, ReconError> {
    let display = path.display().to_string();

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ReconError::malformed(&display, format!("failed to open Excel file: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(ReconError::malformed(&display, "Excel file contains no sheets"));
    }

    let mut count = RawCount::new(label);

    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name).map_err(|e| {
            ReconError::malformed(&display, format!("failed to read sheet '{sheet_name}': {e}"))
        })?;

        // The range starts at the first used cell, not at A1
        let header_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(cells) => cells.iter().map(|c| to_cell(c).to_text()).collect(),
            None => Vec::new(),
        };

        let mut sheet = RawSheet {
            name: sheet_name.clone(),
            header_row,
            headers,
            rows: Vec::new(),
        };

        for row in rows.take(MAX_ROWS) {
            sheet.rows.push(row.iter().map(to_cell).collect());
        }

        log::debug!(
            "{}: sheet '{}' has {} column(s), {} data row(s)",
            label,
            sheet.name,
            sheet.headers.len(),
            sheet.rows.len()
        );
        count.sheets.push(sheet);
    }

    Ok(count)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Serial number, 1900 date system
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}
