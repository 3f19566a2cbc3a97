use std::collections::BTreeMap;

use crate::accuracy::{accuracy_pct, mean_or};
use crate::config::PolicyConfig;
use crate::model::{BrandSummary, MergedRow, OverallMetrics};

/// Roll merged rows up into headline metrics and per-brand summaries.
///
/// Under `exclude_new_products` the new-product rows are left out of both.
/// An empty evaluated set scores as a full match (rate 100, accuracy 100,
/// difference 0).
pub fn aggregate(rows: &[MergedRow], policy: &PolicyConfig) -> (OverallMetrics, Vec<BrandSummary>) {
    let evaluated: Vec<&MergedRow> = rows
        .iter()
        .filter(|r| !(policy.exclude_new_products && r.is_new_product))
        .collect();

    let overall = overall_metrics(&evaluated, rows.len() - evaluated.len());
    let brands = if policy.track_brand {
        brand_summaries(&evaluated)
    } else {
        Vec::new()
    };

    (overall, brands)
}

fn overall_metrics(evaluated: &[&MergedRow], excluded: usize) -> OverallMetrics {
    let matches = evaluated.iter().filter(|r| r.difference == 0.0).count();
    let match_rate = if evaluated.is_empty() {
        100.0
    } else {
        matches as f64 / evaluated.len() as f64 * 100.0
    };

    OverallMetrics {
        evaluated_items: evaluated.len(),
        excluded_new_products: excluded,
        match_rate,
        avg_difference: mean_or(evaluated.iter().map(|r| r.difference), 0.0),
        total_difference: evaluated.iter().map(|r| r.difference).sum(),
        overall_accuracy: mean_or(evaluated.iter().map(|r| r.accuracy_pct), 100.0),
    }
}

/// Group by brand and score the sums, not the mean of row accuracies.
fn brand_summaries(evaluated: &[&MergedRow]) -> Vec<BrandSummary> {
    // brand -> (items, qty1, qty2, difference, base_total)
    let mut groups: BTreeMap<&str, (usize, f64, f64, f64, f64)> = BTreeMap::new();

    for row in evaluated {
        let entry = groups.entry(row.brand.as_str()).or_insert((0, 0.0, 0.0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += row.qty1;
        entry.2 += row.qty2;
        entry.3 += row.difference;
        entry.4 += row.base_total;
    }

    groups
        .into_iter()
        .map(|(brand, (items, qty1, qty2, difference, base))| BrandSummary {
            brand: brand.to_string(),
            items,
            qty1_total: qty1,
            qty2_total: qty2,
            difference_total: difference,
            base_total_sum: base,
            accuracy_pct: accuracy_pct(difference, base),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accuracy::{base_total, difference, is_new_product};

    fn row(barcode: &str, brand: &str, qty1: f64, qty2: f64) -> MergedRow {
        let difference = difference(qty1, qty2);
        let base_total = base_total(qty1, qty2);
        MergedRow {
            barcode: barcode.into(),
            product_name: format!("item {barcode}"),
            brand: brand.into(),
            qty1,
            qty2,
            difference,
            base_total,
            is_new_product: is_new_product(qty1, qty2),
            accuracy_pct: accuracy_pct(difference, base_total),
        }
    }

    fn include_all() -> PolicyConfig {
        PolicyConfig::default()
    }

    fn exclude_new() -> PolicyConfig {
        PolicyConfig {
            exclude_new_products: true,
            track_brand: true,
        }
    }

    #[test]
    fn exact_agreement() {
        let rows = vec![row("A", "X", 3.0, 3.0), row("B", "X", 0.0, 0.0), row("C", "Y", 8.0, 8.0)];
        let (overall, brands) = aggregate(&rows, &include_all());
        assert_eq!(overall.match_rate, 100.0);
        assert_eq!(overall.overall_accuracy, 100.0);
        assert_eq!(overall.total_difference, 0.0);
        assert_eq!(overall.avg_difference, 0.0);
        assert!(brands.iter().all(|b| b.accuracy_pct == 100.0));
    }

    #[test]
    fn mixed_metrics() {
        // A: exact, B: 10 vs 0 (acc 0), C: 4 vs 2 (diff 2, base 3)
        let rows = vec![row("A", "X", 5.0, 5.0), row("B", "X", 10.0, 0.0), row("C", "Y", 4.0, 2.0)];
        let (overall, _) = aggregate(&rows, &include_all());
        assert!((overall.match_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(overall.total_difference, 12.0);
        assert_eq!(overall.avg_difference, 4.0);
        let c_acc = 100.0 - 2.0 / 3.0 * 100.0;
        assert!((overall.overall_accuracy - (100.0 + 0.0 + c_acc) / 3.0).abs() < 1e-9);
        assert_eq!(overall.evaluated_items, 3);
        assert_eq!(overall.excluded_new_products, 0);
    }

    #[test]
    fn empty_evaluated_set_uses_sentinels() {
        let (overall, brands) = aggregate(&[], &include_all());
        assert_eq!(overall.match_rate, 100.0);
        assert_eq!(overall.avg_difference, 0.0);
        assert_eq!(overall.total_difference, 0.0);
        assert_eq!(overall.overall_accuracy, 100.0);
        assert!(brands.is_empty());
    }

    #[test]
    fn only_new_products_excluded_leaves_empty_set() {
        let rows = vec![row("B", "Y", 0.0, 5.0)];
        let (overall, brands) = aggregate(&rows, &exclude_new());
        assert_eq!(overall.evaluated_items, 0);
        assert_eq!(overall.excluded_new_products, 1);
        assert_eq!(overall.match_rate, 100.0);
        assert_eq!(overall.overall_accuracy, 100.0);
        assert!(!overall.avg_difference.is_nan());
        assert!(brands.is_empty());
    }

    #[test]
    fn exclusion_policy_drops_new_products() {
        let rows = vec![row("A", "X", 4.0, 4.0), row("B", "Y", 0.0, 5.0), row("C", "Y", 2.0, 2.0)];

        let (overall, brands) = aggregate(&rows, &exclude_new());
        assert_eq!(overall.evaluated_items, 2);
        assert_eq!(overall.match_rate, 100.0);
        let y = brands.iter().find(|b| b.brand == "Y").unwrap();
        assert_eq!(y.items, 1);
        assert_eq!(y.qty2_total, 2.0);
        assert_eq!(y.accuracy_pct, 100.0);

        let (overall, brands) = aggregate(&rows, &include_all());
        assert_eq!(overall.evaluated_items, 3);
        let y = brands.iter().find(|b| b.brand == "Y").unwrap();
        assert_eq!(y.items, 2);
        assert_eq!(y.qty2_total, 7.0);
        assert!(y.accuracy_pct < 100.0);
    }

    #[test]
    fn brand_accuracy_uses_sums_not_row_mean() {
        // base totals 1 and 100, differences 1 and 0
        let rows = vec![row("S", "X", 1.5, 0.5), row("L", "X", 100.0, 100.0)];
        assert_eq!(rows[0].base_total, 1.0);
        assert_eq!(rows[0].difference, 1.0);

        let (_, brands) = aggregate(&rows, &include_all());
        let x = &brands[0];
        let expected = 100.0 - 1.0 / 101.0 * 100.0;
        assert!((x.accuracy_pct - expected).abs() < 1e-9);
        assert!((x.accuracy_pct - 99.0099).abs() < 1e-3);

        let row_mean = (rows[0].accuracy_pct + rows[1].accuracy_pct) / 2.0;
        assert!((x.accuracy_pct - row_mean).abs() > 1.0);
    }

    #[test]
    fn brands_sorted_and_summed() {
        let rows = vec![row("A", "Zeta", 1.0, 2.0), row("B", "Alpha", 3.0, 3.0), row("C", "Zeta", 4.0, 4.0)];
        let (_, brands) = aggregate(&rows, &include_all());
        let names: Vec<_> = brands.iter().map(|b| b.brand.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        let zeta = &brands[1];
        assert_eq!(zeta.qty1_total, 5.0);
        assert_eq!(zeta.qty2_total, 6.0);
        assert_eq!(zeta.difference_total, 1.0);
        assert_eq!(zeta.base_total_sum, 5.5);
    }

    #[test]
    fn untracked_brand_yields_no_summaries() {
        let rows = vec![row("A", "", 1.0, 1.0)];
        let policy = PolicyConfig {
            exclude_new_products: false,
            track_brand: false,
        };
        let (overall, brands) = aggregate(&rows, &policy);
        assert_eq!(overall.evaluated_items, 1);
        assert!(brands.is_empty());
    }
}
