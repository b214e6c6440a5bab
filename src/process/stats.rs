//! Column statistics over the present values of a float column.
//!
//! Nulls (and NaN, should one slip in) are skipped, so every function here
//! answers `None` on a column with nothing observed.

use arrow::array::Float64Array;

/// Present, non-NaN values in row order.
pub fn observed(arr: &Float64Array) -> Vec<f64> {
    arr.iter().flatten().filter(|v| !v.is_nan()).collect()
}

/// Present values sorted ascending.
pub fn sorted_observed(arr: &Float64Array) -> Vec<f64> {
    let mut values = observed(arr);
    values.sort_by(f64::total_cmp);
    values
}

/// Linear-interpolated quantile of an ascending slice, `q` in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(arr: &Float64Array) -> Option<f64> {
    quantile(&sorted_observed(arr), 0.5)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator); needs two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn median_skips_nulls() {
        let arr = Float64Array::from(vec![Some(5.0), None, Some(1.0), Some(3.0), None]);
        assert_eq!(median(&arr), Some(3.0));
    }

    #[test]
    fn median_of_even_count_interpolates() {
        let arr = Float64Array::from(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(median(&arr), Some(2.5));
    }

    #[test]
    fn median_of_nothing_is_none() {
        let arr = Float64Array::from(vec![None, None]);
        assert_eq!(median(&arr), None);
    }

    #[test]
    fn quartiles_match_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 10.0];
        assert_eq!(quantile(&sorted, 0.25), Some(2.0));
        assert_eq!(quantile(&sorted, 0.75), Some(4.0));
        assert_eq!(quantile(&sorted, 1.0), Some(10.0));
        assert!(approx(quantile(&[1.0, 2.0], 0.25).unwrap(), 1.25));
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), Some(5.0));
        assert!(approx(sample_std(&v).unwrap(), (32.0f64 / 7.0).sqrt()));
        assert_eq!(sample_std(&[1.0]), None);
    }
}
