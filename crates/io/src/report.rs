// Accuracy report export: a two-sheet xlsx workbook

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use invcheck_recon::model::{BrandSummary, MergedRow, ReconResult};
use invcheck_recon::ReconError;

pub const DETAIL_SHEET: &str = "Detailed Comparison";
pub const SUMMARY_SHEET: &str = "Brand Accuracy Summary";

pub const DETAIL_HEADERS: [&str; 9] = [
    "Barcodes",
    "Product Name",
    "Brand",
    "Qty_1",
    "Qty_2",
    "Difference",
    "Base Total",
    "New Product",
    "Accuracy %",
];

pub const SUMMARY_HEADERS: [&str; 6] = [
    "Brand",
    "Qty_1",
    "Qty_2",
    "Difference",
    "Base Total",
    "Accuracy %",
];

/// Write the report workbook to `path`.
pub fn export_report(result: &ReconResult, path: &Path) -> Result<(), ReconError> {
    let mut workbook = build_workbook(result).map_err(xlsx_err)?;
    workbook.save(path).map_err(|e| {
        ReconError::Io(format!("cannot write report {}: {e}", path.display()))
    })?;
    log::info!(
        "wrote report {} ({} item row(s), {} brand row(s))",
        path.display(),
        result.rows.len(),
        result.brands.len()
    );
    Ok(())
}

/// Same workbook as [`export_report`], kept in memory.
pub fn write_report_buffer(result: &ReconResult) -> Result<Vec<u8>, ReconError> {
    let mut workbook = build_workbook(result).map_err(xlsx_err)?;
    workbook.save_to_buffer().map_err(xlsx_err)
}

fn xlsx_err(e: XlsxError) -> ReconError {
    ReconError::Io(format!("XLSX error: {e}"))
}

fn build_workbook(result: &ReconResult) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(DETAIL_SHEET)?;
        write_header(sheet, &DETAIL_HEADERS, &header_format)?;
        for (i, row) in result.rows.iter().enumerate() {
            write_detail_row(sheet, (i + 1) as u32, row)?;
        }
        sheet.set_column_width(0, 18)?;
        sheet.set_column_width(1, 32)?;
        sheet.set_column_width(2, 16)?;
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_header(sheet, &SUMMARY_HEADERS, &header_format)?;
        for (i, brand) in result.brands.iter().enumerate() {
            write_summary_row(sheet, (i + 1) as u32, brand)?;
        }
        sheet.set_column_width(0, 20)?;
    }

    Ok(workbook)
}

fn write_header(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_detail_row(sheet: &mut Worksheet, r: u32, row: &MergedRow) -> Result<(), XlsxError> {
    // Barcodes stay text so long codes keep every digit
    sheet.write_string(r, 0, &row.barcode)?;
    write_text(sheet, r, 1, &row.product_name)?;
    write_text(sheet, r, 2, &row.brand)?;
    sheet.write_number(r, 3, row.qty1)?;
    sheet.write_number(r, 4, row.qty2)?;
    sheet.write_number(r, 5, row.difference)?;
    sheet.write_number(r, 6, row.base_total)?;
    sheet.write_boolean(r, 7, row.is_new_product)?;
    sheet.write_number(r, 8, row.accuracy_pct)?;
    Ok(())
}

fn write_summary_row(sheet: &mut Worksheet, r: u32, brand: &BrandSummary) -> Result<(), XlsxError> {
    write_text(sheet, r, 0, &brand.brand)?;
    sheet.write_number(r, 1, brand.qty1_total)?;
    sheet.write_number(r, 2, brand.qty2_total)?;
    sheet.write_number(r, 3, brand.difference_total)?;
    sheet.write_number(r, 4, brand.base_total_sum)?;
    sheet.write_number(r, 5, brand.accuracy_pct)?;
    Ok(())
}

fn write_text(sheet: &mut Worksheet, r: u32, c: u16, value: &str) -> Result<(), XlsxError> {
    if !value.is_empty() {
        sheet.write_string(r, c, value)?;
    }
    Ok(())
}
