use std::collections::{BTreeMap, BTreeSet};

use crate::accuracy::{accuracy_pct, base_total, difference, is_new_product};
use crate::error::ReconError;
use crate::model::{MergedRow, NormalizedRow};
use crate::normalize::NormalizedCount;

/// Full outer join of two normalized counts on barcode.
///
/// Output is ordered by barcode. A barcode repeated within one count joins
/// against every occurrence on the other side, so m × n rows come out for
/// it; see [`duplicate_barcodes`].
pub fn merge(first: &NormalizedCount, second: &NormalizedCount) -> Result<Vec<MergedRow>, ReconError> {
    for count in [first, second] {
        if count.rows.is_empty() {
            return Err(ReconError::Schema {
                count: count.label.clone(),
                required: count.required.clone(),
            });
        }
    }

    let left_map = index_by_barcode(&first.rows);
    let right_map = index_by_barcode(&second.rows);

    let keys: BTreeSet<&str> = left_map.keys().chain(right_map.keys()).copied().collect();

    let mut merged = Vec::with_capacity(keys.len());
    for key in keys {
        match (left_map.get(key), right_map.get(key)) {
            (Some(lefts), Some(rights)) => {
                for left in lefts {
                    for right in rights {
                        merged.push(merged_row(key, Some(*left), Some(*right)));
                    }
                }
            }
            (Some(lefts), None) => {
                for left in lefts {
                    merged.push(merged_row(key, Some(*left), None));
                }
            }
            (None, Some(rights)) => {
                for right in rights {
                    merged.push(merged_row(key, None, Some(*right)));
                }
            }
            (None, None) => {}
        }
    }

    Ok(merged)
}

/// Barcodes that occur more than once within either count, sorted.
pub fn duplicate_barcodes(first: &NormalizedCount, second: &NormalizedCount) -> Vec<String> {
    let mut dups = BTreeSet::new();
    for count in [first, second] {
        for (key, rows) in index_by_barcode(&count.rows) {
            if rows.len() > 1 {
                dups.insert(key.to_string());
            }
        }
    }
    dups.into_iter().collect()
}

fn index_by_barcode(rows: &[NormalizedRow]) -> BTreeMap<&str, Vec<&NormalizedRow>> {
    let mut map: BTreeMap<&str, Vec<&NormalizedRow>> = BTreeMap::new();
    for row in rows {
        map.entry(row.barcode.as_str()).or_default().push(row);
    }
    map
}

fn merged_row(barcode: &str, left: Option<&NormalizedRow>, right: Option<&NormalizedRow>) -> MergedRow {
    let qty1 = left.map(|r| r.quantity).unwrap_or(0.0);
    let qty2 = right.map(|r| r.quantity).unwrap_or(0.0);
    let difference = difference(qty1, qty2);
    let base_total = base_total(qty1, qty2);

    MergedRow {
        barcode: barcode.to_string(),
        product_name: coalesce(left.map(|r| r.product_name.as_str()), right.map(|r| r.product_name.as_str())),
        brand: coalesce(left.map(|r| r.brand.as_str()), right.map(|r| r.brand.as_str())),
        qty1,
        qty2,
        difference,
        base_total,
        is_new_product: is_new_product(qty1, qty2),
        accuracy_pct: accuracy_pct(difference, base_total),
    }
}

/// First non-empty value wins.
fn coalesce(first: Option<&str>, second: Option<&str>) -> String {
    first
        .filter(|s| !s.is_empty())
        .or(second)
        .unwrap_or("")
        .to_string()
}
