use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell as handed over by the workbook loader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Display form used for identifiers and names. Integral numbers render
    /// without a decimal point so numeric barcodes join against text ones.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Self::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One sheet of a count. The sheet name doubles as the brand.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub name: String,
    /// Zero-based sheet row holding `headers`; data rows follow it directly.
    pub header_row: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            header_row: 0,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.rows.push(row);
        self
    }

    /// Position of a header. Both sides are trimmed before comparing.
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// A full count snapshot: every sheet of one workbook, in workbook order.
#[derive(Debug, Clone, Default)]
pub struct RawCount {
    pub label: String,
    pub sheets: Vec<RawSheet>,
}

impl RawCount {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, sheet: RawSheet) -> Self {
        self.sheets.push(sheet);
        self
    }
}

/// A flattened count row. `barcode` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub barcode: String,
    pub product_name: String,
    pub brand: String,
    pub quantity: f64,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// One barcode of the outer join, with both quantities and its accuracy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub barcode: String,
    pub product_name: String,
    pub brand: String,
    pub qty1: f64,
    pub qty2: f64,
    pub difference: f64,
    pub base_total: f64,
    pub is_new_product: bool,
    pub accuracy_pct: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSummary {
    pub brand: String,
    pub items: usize,
    pub qty1_total: f64,
    pub qty2_total: f64,
    pub difference_total: f64,
    pub base_total_sum: f64,
    pub accuracy_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallMetrics {
    pub evaluated_items: usize,
    pub excluded_new_products: usize,
    pub match_rate: f64,
    pub avg_difference: f64,
    pub total_difference: f64,
    pub overall_accuracy: f64,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub first_label: String,
    pub second_label: String,
    pub exclude_new_products: bool,
    pub track_brand: bool,
    /// Barcodes seen more than once within a single count.
    pub duplicate_barcodes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub overall: OverallMetrics,
    pub brands: Vec<BrandSummary>,
    pub rows: Vec<MergedRow>,
}
