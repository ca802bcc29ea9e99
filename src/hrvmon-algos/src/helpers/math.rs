pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1 denominator), `0.0` below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0_f64;
    }
    let mean = mean(values);
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Population variance (n denominator), `0.0` for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0_f64;
    }
    let mean = mean(values);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Ordinary least squares slope of `values` against their index.
/// `None` when the index has no variance (fewer than two points).
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0_f64, 0_f64), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 { None } else { Some(num / den) }
}

pub use hrvmon_types::round_float;
