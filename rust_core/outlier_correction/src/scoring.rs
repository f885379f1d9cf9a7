//! Standard-score helpers used by the detection passes.

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / (values.len() as f64)
}

/// Sample standard deviation (ddof = 1); NaN with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    std_with_ddof(values, 1)
}

fn std_with_ddof(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / ((values.len() - ddof) as f64)).sqrt()
}

/// Standard score of every value against the slice's own mean and
/// population standard deviation (ddof = 0). A zero deviation gives NaN scores.
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_with_ddof(values, 0);
    values.iter().map(|v| (v - m) / sd).collect()
}

/// Centred rolling standard score with sample standard deviation.
///
/// For `window = w` the window around position `i` spans positions
/// `i - w/2 ..= i + w - w/2 - 1`: `w/2` samples before the point and
/// `ceil(w/2) - 1` after it. Positions without a full window, windows holding NaN,
/// and windows with zero deviation score `None`.
pub fn rolling_zscore(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }
    let before = window / 2;
    for i in before..=(n - window + before) {
        let w = &values[i - before..i - before + window];
        if w.iter().any(|v| v.is_nan()) {
            continue;
        }
        let sd = sample_std(w);
        if sd == 0.0 || !sd.is_finite() {
            continue;
        }
        out[i] = Some((values[i] - mean(w)) / sd);
    }
    out
}
