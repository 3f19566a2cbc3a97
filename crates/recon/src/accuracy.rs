//! Row-level formulas shared by the merge and aggregation stages.

/// Accuracy of two counts relative to their average, clamped to `[0, 100]`.
///
/// A zero base (both counts zero) is full agreement.
pub fn accuracy_pct(difference: f64, base_total: f64) -> f64 {
    if base_total == 0.0 {
        return 100.0;
    }
    (100.0 - difference / base_total * 100.0).clamp(0.0, 100.0)
}

pub fn difference(qty1: f64, qty2: f64) -> f64 {
    (qty1 - qty2).abs()
}

pub fn base_total(qty1: f64, qty2: f64) -> f64 {
    (qty1 + qty2) / 2.0
}

/// Missing from the first count, present in the second.
pub fn is_new_product(qty1: f64, qty2: f64) -> bool {
    qty1 == 0.0 && qty2 > 0.0
}

/// Mean of `values`, or `empty` when there is nothing to average.
pub fn mean_or(values: impl IntoIterator<Item = f64>, empty: f64) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        empty
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_base_is_perfect() {
        assert_eq!(accuracy_pct(0.0, 0.0), 100.0);
    }

    #[test]
    fn exact_agreement() {
        assert_eq!(accuracy_pct(difference(7.0, 7.0), base_total(7.0, 7.0)), 100.0);
    }

    #[test]
    fn partial_agreement() {
        // 10 vs 8: diff 2, base 9
        let pct = accuracy_pct(difference(10.0, 8.0), base_total(10.0, 8.0));
        assert!((pct - (100.0 - 2.0 / 9.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn one_sided_clamps_to_zero() {
        // 10 vs 0: diff 10, base 5 → 100 - 200 = -100 → 0
        assert_eq!(accuracy_pct(difference(10.0, 0.0), base_total(10.0, 0.0)), 0.0);
    }

    #[test]
    fn new_product_rule() {
        assert!(is_new_product(0.0, 5.0));
        assert!(!is_new_product(0.0, 0.0));
        assert!(!is_new_product(3.0, 5.0));
        assert!(!is_new_product(5.0, 0.0));
    }

    #[test]
    fn mean_of_empty_uses_sentinel() {
        assert_eq!(mean_or(Vec::<f64>::new(), 100.0), 100.0);
        assert_eq!(mean_or([2.0, 4.0], 0.0), 3.0);
    }
}
