use crate::aggregate::aggregate;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::merge::{duplicate_barcodes, merge};
use crate::model::{RawCount, ReconMeta, ReconResult};
use crate::normalize::normalize;

/// Run reconciliation per config: normalize both counts, join them, score.
pub fn run(config: &ReconConfig, first: &RawCount, second: &RawCount) -> Result<ReconResult, ReconError> {
    let policy = &config.policy;

    let norm_first = normalize(first, &config.columns, policy.track_brand)?;
    let norm_second = normalize(second, &config.columns, policy.track_brand)?;
    log::debug!(
        "normalized {} row(s) from '{}', {} row(s) from '{}'",
        norm_first.rows.len(),
        norm_first.label,
        norm_second.rows.len(),
        norm_second.label
    );

    let rows = merge(&norm_first, &norm_second)?;

    let duplicates = duplicate_barcodes(&norm_first, &norm_second);
    if !duplicates.is_empty() {
        log::warn!(
            "{} barcode(s) appear more than once within a count and were joined against every match: {}",
            duplicates.len(),
            preview(&duplicates)
        );
    }

    let (overall, brands) = aggregate(&rows, policy);
    log::info!(
        "reconciled {} item(s) across {} brand(s): match rate {:.2}%, accuracy {:.2}%",
        rows.len(),
        brands.len(),
        overall.match_rate,
        overall.overall_accuracy
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            first_label: first.label.clone(),
            second_label: second.label.clone(),
            exclude_new_products: policy.exclude_new_products,
            track_brand: policy.track_brand,
            duplicate_barcodes: duplicates,
        },
        overall,
        brands,
        rows,
    })
}

fn preview(items: &[String]) -> String {
    const MAX: usize = 10;
    if items.len() <= MAX {
        items.join(", ")
    } else {
        format!("{}, ... (+{} more)", items[..MAX].join(", "), items.len() - MAX)
    }
}
