// src/data_analysis/metrics.rs

use ndarray::Array1;

/// Mean absolute error between two equally long series. NaN for empty input.
pub fn mean_absolute_error(truth: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if truth.is_empty() {
        return f64::NAN;
    }
    let total: f64 = truth
        .iter()
        .zip(predicted.iter())
        .map(|(&t, &p)| (t - p).abs())
        .sum();
    total / truth.len() as f64
}

/// Mean absolute percentage error, averaged only over rows where the true
/// value is non-zero. NaN when no row qualifies.
pub fn mean_absolute_percentage_error(truth: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (&t, &p) in truth.iter().zip(predicted.iter()) {
        if t != 0.0 {
            total += ((t - p) / t).abs();
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64 * 100.0
    }
}

/// Coefficient of determination, `1 - SS_res / SS_tot`. NaN when the true
/// series is constant (zero total sum of squares).
pub fn r_squared(truth: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let mean = match truth.mean() {
        Some(m) => m,
        None => return f64::NAN,
    };
    let ss_res: f64 = truth
        .iter()
        .zip(predicted.iter())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = truth.iter().map(|&t| (t - mean) * (t - mean)).sum();
    if ss_tot == 0.0 {
        f64::NAN
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Running sum of the series.
pub fn cumulative_sum(series: &Array1<f64>) -> Array1<f64> {
    let mut out = Array1::zeros(series.len());
    let mut running = 0.0;
    for (i, &value) in series.iter().enumerate() {
        running += value;
        out[i] = running;
    }
    out
}

/// Absolute error between the final values of two cumulative series.
pub fn trailing_absolute_error(truth_cum: &Array1<f64>, predicted_cum: &Array1<f64>) -> f64 {
    match (truth_cum.last(), predicted_cum.last()) {
        (Some(&t), Some(&p)) => (t - p).abs(),
        _ => f64::NAN,
    }
}

/// Trailing absolute error as a percentage of the final true value.
pub fn trailing_absolute_percentage_error(
    truth_cum: &Array1<f64>,
    predicted_cum: &Array1<f64>,
) -> f64 {
    match (truth_cum.last(), predicted_cum.last()) {
        (Some(&t), Some(&p)) => (t - p).abs() / t * 100.0,
        _ => f64::NAN,
    }
}


// src/data_analysis/metrics.rs
