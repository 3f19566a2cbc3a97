use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// No sheet of a count carries the required columns, or nothing survives normalization.
    Schema { count: String, required: Vec<String> },
    /// The file cannot be read as a spreadsheet at all.
    MalformedFile { path: String, message: String },
    /// A quantity cell that is not a non-negative number.
    InvalidQuantity {
        count: String,
        sheet: String,
        row: usize,
        value: String,
    },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty or shared column names, empty report path).
    ConfigValidation(String),
    /// IO error (config read, report write, etc.).
    Io(String),
}

impl ReconError {
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedFile {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema { count, required } => {
                write!(
                    f,
                    "count '{count}': no sheet with barcoded rows under the required columns {}",
                    required
                        .iter()
                        .map(|c| format!("'{c}'"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Self::MalformedFile { path, message } => {
                write!(f, "cannot read '{path}' as a spreadsheet: {message}")
            }
            Self::InvalidQuantity { count, sheet, row, value } => {
                write!(
                    f,
                    "count '{count}', sheet '{sheet}', row {row}: invalid quantity '{value}'"
                )
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
