use crate::config::ColumnConfig;
use crate::error::ReconError;
use crate::model::{Cell, NormalizedRow, RawCount, RawSheet};

/// A count flattened into one table, still carrying what the merge stage
/// needs to report a schema failure.
#[derive(Debug, Clone)]
pub struct NormalizedCount {
    pub label: String,
    pub required: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

/// Flatten every sheet that carries the barcode, product name and quantity
/// columns. The sheet name becomes the brand unless `track_brand` is off.
///
/// Sheets without those columns are skipped. If no sheet qualifies the whole
/// count is rejected with [`ReconError::Schema`].
pub fn normalize(
    raw: &RawCount,
    columns: &ColumnConfig,
    track_brand: bool,
) -> Result<NormalizedCount, ReconError> {
    let mut rows = Vec::new();
    let mut qualifying = 0usize;

    for sheet in &raw.sheets {
        let (barcode_idx, name_idx, qty_idx) = match (
            sheet.column(&columns.barcode),
            sheet.column(&columns.product_name),
            sheet.column(&columns.quantity),
        ) {
            (Some(b), Some(n), Some(q)) => (b, n, q),
            _ => {
                log::debug!(
                    "count '{}': skipping sheet '{}' (required columns missing)",
                    raw.label,
                    sheet.name
                );
                continue;
            }
        };
        qualifying += 1;

        let brand = if track_brand { sheet.name.clone() } else { String::new() };
        let before = rows.len();

        for (i, row) in sheet.rows.iter().enumerate() {
            let barcode = cell_at(row, barcode_idx);
            if barcode.is_blank() {
                continue;
            }

            let quantity = parse_quantity(cell_at(row, qty_idx))
                .ok_or_else(|| invalid_quantity(raw, sheet, i, cell_at(row, qty_idx)))?;

            rows.push(NormalizedRow {
                barcode: barcode.to_text(),
                product_name: cell_at(row, name_idx).to_text(),
                brand: brand.clone(),
                quantity,
            });
        }

        log::debug!(
            "count '{}': sheet '{}' contributed {} row(s)",
            raw.label,
            sheet.name,
            rows.len() - before
        );
    }

    if qualifying == 0 {
        return Err(ReconError::Schema {
            count: raw.label.clone(),
            required: columns.required(),
        });
    }

    Ok(NormalizedCount {
        label: raw.label.clone(),
        required: columns.required(),
        rows,
    })
}

const EMPTY: Cell = Cell::Empty;

fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY)
}

/// Blank counts as zero; anything else must be a finite, non-negative number.
fn parse_quantity(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) => *n,
        Cell::Text(s) if s.trim().is_empty() => 0.0,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Bool(_) => return None,
    };
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

fn invalid_quantity(raw: &RawCount, sheet: &RawSheet, data_idx: usize, cell: &Cell) -> ReconError {
    ReconError::InvalidQuantity {
        count: raw.label.clone(),
        sheet: sheet.name.clone(),
        // header_row is zero-based and data starts right below it
        row: sheet.header_row + data_idx + 2,
        value: cell.to_text(),
    }
}
