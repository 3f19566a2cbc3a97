//! Export a reconciliation report and load it back through the count loader.

use invcheck_io::report::{DETAIL_HEADERS, DETAIL_SHEET, SUMMARY_HEADERS, SUMMARY_SHEET};
use invcheck_io::{export_report, load_workbook};
use invcheck_recon::config::{PolicyConfig, ReconConfig};
use invcheck_recon::model::{Cell, RawCount, RawSheet};

fn count(label: &str, rows: &[(&str, &str, f64)]) -> RawCount {
    let mut sheet = RawSheet::new("Acme", &["Barcodes", "Product Name", "Actual Quantity"]);
    for (code, name, qty) in rows {
        sheet = sheet.with_row(vec![
            Cell::Text((*code).into()),
            Cell::Text((*name).into()),
            Cell::Number(*qty),
        ]);
    }
    RawCount::new(label).with_sheet(sheet)
}

fn config(track_brand: bool) -> ReconConfig {
    ReconConfig {
        policy: PolicyConfig {
            exclude_new_products: false,
            track_brand,
        },
        ..ReconConfig::default()
    }
}

#[test]
fn report_reloads_with_same_figures() {
    let first = count("first", &[("0042", "Bolt", 3.0), ("5", "", 1.0), ("7", "Nut", 1.5)]);
    let second = count("second", &[("0042", "Bolt", 2.0), ("5", "", 1.0), ("9", "Washer", 4.0)]);
    let result = invcheck_recon::run(&config(true), &first, &second).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    export_report(&result, &path).unwrap();

    let loaded = load_workbook(&path).unwrap();
    assert_eq!(loaded.label, "report.xlsx");
    assert_eq!(loaded.sheets.len(), 2);

    let detail = &loaded.sheets[0];
    assert_eq!(detail.name, DETAIL_SHEET);
    assert_eq!(detail.headers, DETAIL_HEADERS.to_vec());
    assert_eq!(detail.rows.len(), result.rows.len());

    for (row, expected) in detail.rows.iter().zip(&result.rows) {
        // Leading zeros survive because barcodes are written as text
        assert_eq!(row[0].to_text(), expected.barcode);
        assert_eq!(row[1].to_text(), expected.product_name);
        assert_eq!(row[2].to_text(), expected.brand);
        assert_eq!(row[3], Cell::Number(expected.qty1));
        assert_eq!(row[4], Cell::Number(expected.qty2));
        assert_eq!(row[5], Cell::Number(expected.difference));
        assert_eq!(row[6], Cell::Number(expected.base_total));
        assert_eq!(row[7], Cell::Bool(expected.is_new_product));
        assert_eq!(row[8], Cell::Number(expected.accuracy_pct));
    }

    // Unnamed item comes back blank, not missing
    let unnamed = detail.rows.iter().find(|r| r[0].to_text() == "5").unwrap();
    assert_eq!(unnamed[1], Cell::Empty);
    assert_eq!(unnamed[2].to_text(), "Acme");

    let summary = &loaded.sheets[1];
    assert_eq!(summary.name, SUMMARY_SHEET);
    assert_eq!(summary.headers, SUMMARY_HEADERS.to_vec());
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0][0].to_text(), "Acme");
    assert_eq!(summary.rows[0][5], Cell::Number(result.brands[0].accuracy_pct));
}

#[test]
fn untracked_brand_leaves_summary_header_only() {
    let first = count("first", &[("1", "Bolt", 3.0)]);
    let second = count("second", &[("1", "Bolt", 3.0)]);
    let result = invcheck_recon::run(&config(false), &first, &second).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    export_report(&result, &path).unwrap();

    let loaded = load_workbook(&path).unwrap();
    let summary = &loaded.sheets[1];
    assert_eq!(summary.headers, SUMMARY_HEADERS.to_vec());
    assert!(summary.rows.is_empty());

    // Brand column present but blank
    let detail = &loaded.sheets[0];
    assert_eq!(detail.rows[0][2], Cell::Empty);
}
