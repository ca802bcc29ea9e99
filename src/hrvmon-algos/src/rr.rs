/// Maximum relative change between an interval and the last kept one.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 0.2;

/// Heart rate (bpm) to RR interval (ms). Non-positive or non-finite rates
/// have no interval and yield `None`.
pub fn heart_rate_to_rr(bpm: f64) -> Option<f64> {
    (bpm.is_finite() && bpm > 0.0).then(|| 60_000.0 / bpm)
}

/// Converts a heart-rate series, dropping unusable entries.
pub fn heart_rates_to_rr(bpm: &[f64]) -> Vec<f64> {
    bpm.iter().copied().filter_map(heart_rate_to_rr).collect()
}

/// Causal successive-difference filter.
///
/// The first interval is always kept. Every following interval is compared
/// with the last *kept* one and kept iff `|curr - kept| / kept <= threshold`,
/// so a rejected artifact never becomes the new reference.
pub fn filter_outliers(rr: &[f64], threshold: f64) -> Vec<f64> {
    if rr.len() < 2 {
        return rr.to_vec();
    }

    let mut reference = rr[0];
    let mut kept = Vec::with_capacity(rr.len());
    kept.push(reference);

    for &curr in &rr[1..] {
        if reference != 0.0 && ((curr - reference) / reference).abs() <= threshold {
            kept.push(curr);
            reference = curr;
        }
    }

    kept
}
