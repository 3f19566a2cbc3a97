use serde::Deserialize;

use crate::error::ReconError;

pub const DEFAULT_REPORT_FILE: &str = "Inventory_Accuracy_Report.xlsx";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "Inventory Accuracy".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            policy: PolicyConfig::default(),
            columns: ColumnConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Scoring policy.
///
/// `exclude_new_products` drops rows that only appear in the second count
/// from the overall metrics and brand summaries; they stay in the detailed
/// table. `track_brand` controls whether sheet names are kept as brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub exclude_new_products: bool,
    #[serde(default = "default_true")]
    pub track_brand: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            exclude_new_products: false,
            track_brand: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    #[serde(default = "default_barcode")]
    pub barcode: String,
    #[serde(default = "default_product_name")]
    pub product_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
}

fn default_barcode() -> String {
    "Barcodes".into()
}

fn default_product_name() -> String {
    "Product Name".into()
}

fn default_quantity() -> String {
    "Actual Quantity".into()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            barcode: default_barcode(),
            product_name: default_product_name(),
            quantity: default_quantity(),
        }
    }
}

impl ColumnConfig {
    pub fn required(&self) -> Vec<String> {
        vec![
            self.barcode.clone(),
            self.product_name.clone(),
            self.quantity.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let cols = &self.columns;
        for (key, value) in [
            ("barcode", &cols.barcode),
            ("product_name", &cols.product_name),
            ("quantity", &cols.quantity),
        ] {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{key} must not be empty"
                )));
            }
        }

        // One physical column cannot feed two fields
        if cols.barcode.trim() == cols.product_name.trim()
            || cols.barcode.trim() == cols.quantity.trim()
            || cols.product_name.trim() == cols.quantity.trim()
        {
            return Err(ReconError::ConfigValidation(
                "columns.barcode, columns.product_name and columns.quantity must be distinct".into(),
            ));
        }

        if let Some(ref report) = self.output.report {
            if report.trim().is_empty() {
                return Err(ReconError::ConfigValidation("output.report must not be empty".into()));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name = "Q3 cycle count"

[policy]
exclude_new_products = true
track_brand = false

[columns]
barcode = "EAN"
product_name = "Item"
quantity = "Counted"

[output]
report = "q3.xlsx"
"#;

    #[test]
    fn parse_full() {
        let config = ReconConfig::from_toml(FULL).unwrap();
        assert_eq!(config.name, "Q3 cycle count");
        assert!(config.policy.exclude_new_products);
        assert!(!config.policy.track_brand);
        assert_eq!(config.columns.barcode, "EAN");
        assert_eq!(config.columns.required(), vec!["EAN", "Item", "Counted"]);
        assert_eq!(config.output.report.as_deref(), Some("q3.xlsx"));
    }

    #[test]
    fn empty_input_uses_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config.name, "Inventory Accuracy");
        assert_eq!(config.policy, PolicyConfig::default());
        assert!(!config.policy.exclude_new_products);
        assert!(config.policy.track_brand);
        assert_eq!(config.columns.barcode, "Barcodes");
        assert_eq!(config.columns.product_name, "Product Name");
        assert_eq!(config.columns.quantity, "Actual Quantity");
        assert!(config.output.report.is_none());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = ReconConfig::from_toml("[policy]\nexclude_new_products = true\n").unwrap();
        assert!(config.policy.exclude_new_products);
        assert!(config.policy.track_brand);
    }

    #[test]
    fn reject_unknown_key() {
        let err = ReconConfig::from_toml("[policy]\nexclude_new = true\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_empty_column() {
        let err = ReconConfig::from_toml("[columns]\nquantity = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("columns.quantity"));
    }

    #[test]
    fn reject_shared_column() {
        let err = ReconConfig::from_toml("[columns]\nbarcode = \"Code\"\nproduct_name = \"Code\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }
}
