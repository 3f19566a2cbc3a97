//! `invcheck run` and `invcheck validate`.

use std::path::{Path, PathBuf};

use clap::Args;

use invcheck_recon::config::DEFAULT_REPORT_FILE;
use invcheck_recon::{ReconConfig, ReconResult};

use crate::exit_codes::{EXIT_BELOW_THRESHOLD, EXIT_INVALID_CONFIG};
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Workbook (or CSV) holding the first count
    pub first: PathBuf,

    /// Workbook (or CSV) holding the second count
    pub second: PathBuf,

    /// TOML config file (column names, policy, outputs)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Leave items only found in the second count out of the metrics
    #[arg(long)]
    pub exclude_new_products: bool,

    /// Ignore sheet names: no brand column, no brand summary
    #[arg(long)]
    pub no_brand: bool,

    /// Write the accuracy workbook (default name when FILE is omitted)
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_REPORT_FILE)]
    pub report: Option<PathBuf>,

    /// Print the full result as JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Write the full JSON result to a file
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Fail (exit 8) when overall accuracy is below this percentage
    #[arg(long, value_name = "PCT")]
    pub min_accuracy: Option<f64>,

    /// Also print the per-item comparison table
    #[arg(long)]
    pub details: bool,
}

fn config_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
}

/// Load the config file (or defaults) and apply command-line overrides.
/// Relative output paths from the file resolve against its directory.
fn resolve_config(args: &RunArgs) -> Result<(ReconConfig, Option<PathBuf>, Option<PathBuf>), CliError> {
    let (mut config, report, json) = match args.config {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            let config = ReconConfig::from_toml(&text)?;
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            let report = config.output.report.as_ref().map(|p| base_dir.join(p));
            let json = config.output.json.as_ref().map(|p| base_dir.join(p));
            (config, report, json)
        }
        None => (ReconConfig::default(), None, None),
    };

    if args.exclude_new_products {
        config.policy.exclude_new_products = true;
    }
    if args.no_brand {
        config.policy.track_brand = false;
    }

    let report = args.report.clone().or(report);
    let json = args.output.clone().or(json);
    Ok((config, report, json))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    if let Some(min) = args.min_accuracy {
        if !(0.0..=100.0).contains(&min) {
            return Err(CliError::args(format!("--min-accuracy must be between 0 and 100, got {min}")));
        }
    }
    for path in [&args.first, &args.second] {
        if !path.exists() {
            return Err(CliError::args(format!("file not found: {}", path.display()))
                .with_hint("pass the first count, then the second: invcheck run <FIRST> <SECOND>"));
        }
    }

    let (config, report_path, json_path) = resolve_config(&args)?;
    log::debug!(
        "config '{}': exclude_new_products={}, track_brand={}",
        config.name,
        config.policy.exclude_new_products,
        config.policy.track_brand
    );

    let first = invcheck_io::load_workbook(&args.first)?;
    let second = invcheck_io::load_workbook(&args.second)?;

    let result = invcheck_recon::run(&config, &first, &second)?;

    // Output
    if let Some(ref path) = report_path {
        invcheck_io::export_report(&result, path)?;
        eprintln!("wrote {}", path.display());
    }

    if json_path.is_some() || args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = json_path {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    print_summary(&result);
    if result.meta.track_brand {
        print_brands(&result);
    }
    if args.details {
        print_details(&result);
    }

    if let Some(min) = args.min_accuracy {
        let accuracy = result.overall.overall_accuracy;
        if accuracy < min {
            return Err(CliError {
                code: EXIT_BELOW_THRESHOLD,
                message: format!("overall accuracy {accuracy:.2}% is below the required {min:.2}%"),
                hint: None,
            });
        }
    }

    Ok(())
}

fn print_summary(result: &ReconResult) {
    let o = &result.overall;
    let m = &result.meta;
    eprintln!(
        "{} vs {}: {} item(s) evaluated, {} new product(s) excluded",
        m.first_label, m.second_label, o.evaluated_items, o.excluded_new_products,
    );
    eprintln!("  match rate:        {:.2}%", o.match_rate);
    eprintln!("  avg difference:    {:.2}", o.avg_difference);
    eprintln!("  total difference:  {:.2}", o.total_difference);
    eprintln!("  overall accuracy:  {:.2}%", o.overall_accuracy);
    if !m.duplicate_barcodes.is_empty() {
        eprintln!("  duplicate barcodes: {}", m.duplicate_barcodes.len());
    }
}

fn print_brands(result: &ReconResult) {
    if result.brands.is_empty() {
        return;
    }
    let width = result
        .brands
        .iter()
        .map(|b| b.brand.chars().count())
        .max()
        .unwrap_or(0)
        .max("Brand".len());

    eprintln!();
    eprintln!(
        "{:<width$}  {:>10}  {:>10}  {:>10}  {:>10}",
        "Brand", "Qty_1", "Qty_2", "Difference", "Accuracy %"
    );
    for b in &result.brands {
        eprintln!(
            "{:<width$}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}",
            b.brand, b.qty1_total, b.qty2_total, b.difference_total, b.accuracy_pct
        );
    }
}

fn print_details(result: &ReconResult) {
    let code_width = result
        .rows
        .iter()
        .map(|r| r.barcode.chars().count())
        .max()
        .unwrap_or(0)
        .max("Barcodes".len());

    eprintln!();
    eprintln!(
        "{:<code_width$}  {:>10}  {:>10}  {:>10}  {:>10}  Product",
        "Barcodes", "Qty_1", "Qty_2", "Difference", "Accuracy %"
    );
    for r in &result.rows {
        let marker = if r.is_new_product { " (new)" } else { "" };
        eprintln!(
            "{:<code_width$}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}  {}{}",
            r.barcode, r.qty1, r.qty2, r.difference, r.accuracy_pct, r.product_name, marker
        );
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;

    match ReconConfig::from_toml(&config_str) {
        Ok(config) => {
            let c = &config.columns;
            eprintln!(
                "valid: '{}' reading columns '{}', '{}', '{}' (exclude_new_products={}, track_brand={})",
                config.name,
                c.barcode,
                c.product_name,
                c.quantity,
                config.policy.exclude_new_products,
                config.policy.track_brand,
            );
            Ok(())
        }
        Err(e) => Err(config_err(e.to_string())),
    }
}
