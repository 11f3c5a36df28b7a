//! Rolling window helpers shared by the analytics engines.
//!
//! All functions take plain `f64` slices, oldest-first.

use statrs::statistics::Statistics;

/// Last `k` values of a slice (or all of it when shorter)
pub fn tail(values: &[f64], k: usize) -> &[f64] {
    &values[values.len().saturating_sub(k)..]
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Population standard deviation, `None` for an empty slice
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().population_std_dev())
}

/// Split at `mid = n / 2`: first half `[0, mid)`, second half `[mid, n)`
pub fn split_halves(values: &[f64]) -> (&[f64], &[f64]) {
    values.split_at(values.len() / 2)
}

/// Means of both halves; `None` with fewer than 2 values
pub fn half_means(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let (first, second) = split_halves(values);
    Some((mean(first)?, mean(second)?))
}

/// Percent change from `from` to `to`; 0 when `from` is zero
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Largest and smallest value, `None` for an empty slice
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}
