// CSV import: one file is one sheet, named after the file stem

use std::io::Read;
use std::path::Path;

use invcheck_recon::model::{Cell, RawSheet};
use invcheck_recon::ReconError;

/// Load a delimited text file as a single sheet. The first record is the
/// header row; the sheet (and so the brand) is named after the file stem.
pub fn import(path: &Path) -> Result<RawSheet, ReconError> {
    let content = read_file_as_utf8(path)
        .map_err(|e| ReconError::malformed(path.display().to_string(), e))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let delimiter = sniff_delimiter(&content);

    import_from_string(&name, &content, delimiter)
        .map_err(|e| ReconError::malformed(path.display().to_string(), e))
}

const DELIMITERS: [u8; 3] = [b',', b';', b'\t'];
const SAMPLE_LINES: usize = 10;

/// Count exports come out of Excel with a comma, a semicolon (locales with a
/// decimal comma) or a tab. Pick the one that splits the header row into
/// several fields and keeps that field count on the most sampled data rows;
/// a wider split wins a tie.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SAMPLE_LINES).collect();
    let Some((header, data)) = sample.split_first() else {
        return b',';
    };

    DELIMITERS
        .iter()
        .filter_map(|&delim| {
            let width = field_count(header, delim);
            if width <= 1 {
                return None;
            }
            let agreeing = data.iter().filter(|line| field_count(line, delim) == width).count();
            Some((delim, (agreeing, width)))
        })
        .max_by_key(|&(_, score)| score)
        .map(|(delim, _)| delim)
        .unwrap_or(b',')
}

/// Fields on one line, honouring quotes.
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252 exports).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

fn import_from_string(name: &str, content: &str, delimiter: u8) -> Result<RawSheet, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut sheet = RawSheet {
        name: name.to_string(),
        header_row: 0,
        headers,
        rows: Vec::new(),
    };

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        let row = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        sheet.rows.push(row);
    }

    Ok(sheet)
}
