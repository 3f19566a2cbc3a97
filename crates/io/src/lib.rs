// File I/O: loading count workbooks and writing the accuracy report

pub mod csv;
pub mod report;
pub mod xlsx;

use std::path::Path;

use invcheck_recon::model::RawCount;
use invcheck_recon::ReconError;

pub use report::{export_report, write_report_buffer};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];
const TEXT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Extensions `load_workbook` accepts, for help and error text.
pub fn supported_extensions() -> String {
    WORKBOOK_EXTENSIONS
        .iter()
        .chain(TEXT_EXTENSIONS.iter())
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a count file. Spreadsheet formats go through calamine with one
/// sheet per brand; a delimited text file (.csv, .tsv, .txt) is a single
/// sheet named after its stem.
/// The count is labelled with the file name.
pub fn load_workbook(path: &Path) -> Result<RawCount, ReconError> {
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some(e) if WORKBOOK_EXTENSIONS.contains(&e) => xlsx::import(path, &label),
        Some(e) if TEXT_EXTENSIONS.contains(&e) => {
            Ok(RawCount::new(label).with_sheet(csv::import(path)?))
        }
        _ => Err(ReconError::malformed(
            path.display().to_string(),
            format!("unsupported file type (expected one of {})", supported_extensions()),
        )),
    }
}
