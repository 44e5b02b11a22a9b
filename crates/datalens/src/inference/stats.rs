//! Numeric reducers shared by the profiler, relationship analysis and quality scans.
//!
//! Every reducer tolerates empty or short input and returns `None` (or 0 for
//! correlation) instead of dividing by zero.

use crate::profile::{HistogramBin, NumericStatistics};

/// Maximum number of histogram bins.
const MAX_HISTOGRAM_BINS: usize = 20;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population variance.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn population_std(values: &[f64]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Median of sorted values; the mean of the two central values for even length.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Index-based quantile: the value at `floor(n * p)`, without interpolation.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((sorted.len() as f64) * p).floor() as usize;
    sorted.get(idx.min(sorted.len() - 1)).copied()
}

/// Quantile with linear interpolation between the two nearest ranks.
pub fn quantile_linear(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Sample standard deviation (n − 1 denominator).
pub(crate) fn sample_std(values: &[f64], m: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let ss = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Adjusted Fisher-Pearson skewness. Requires at least four values and non-zero spread.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_std(values, m).filter(|s| *s > 0.0)?;
    let nf = n as f64;
    let sum_cubed = values.iter().map(|v| ((v - m) / s).powi(3)).sum::<f64>();
    let skew = nf / ((nf - 1.0) * (nf - 2.0)) * sum_cubed;
    skew.is_finite().then_some(skew)
}

/// Sample excess kurtosis. Requires at least four values and non-zero spread.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_std(values, m).filter(|s| *s > 0.0)?;
    let nf = n as f64;
    let sum_fourth = values.iter().map(|v| ((v - m) / s).powi(4)).sum::<f64>();
    let kurt = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum_fourth
        - 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    kurt.is_finite().then_some(kurt)
}

/// Full numeric summary, or `None` for an empty input.
pub fn numeric_statistics(values: &[f64]) -> Option<NumericStatistics> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let variance = population_variance(&sorted)?;

    Some(NumericStatistics {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: mean(&sorted)?,
        median: median_sorted(&sorted)?,
        std: variance.sqrt(),
        variance,
        q1: quantile_sorted(&sorted, 0.25)?,
        q2: quantile_sorted(&sorted, 0.5)?,
        q3: quantile_sorted(&sorted, 0.75)?,
        skewness: skewness(values),
        kurtosis: kurtosis(values),
    })
}

/// Pearson correlation. Returns 0 for fewer than two pairs or zero variance.
///
/// The inputs are truncated to the shorter length.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// Equal-width histogram with `min(20, ceil(sqrt(n)))` bins.
///
/// Bins are closed on the left and open on the right, except the last one
/// which also includes `max`. A constant column yields one bin.
pub fn histogram(values: &[f64]) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_count = ((values.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_HISTOGRAM_BINS);
    let width = (max - min) / bin_count as f64;

    if width == 0.0 || !width.is_finite() {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bin_count {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    bins
}

/// Indices of values more than `threshold` population standard deviations from the mean.
pub fn z_score_outliers(values: &[f64], threshold: f64) -> Vec<usize> {
    let (Some(m), Some(std)) = (mean(values), population_std(values)) else {
        return Vec::new();
    };
    if std == 0.0 {
        return Vec::new();
    }
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| (*v - m).abs() > threshold * std)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_inputs_are_none() {
        assert!(mean(&[]).is_none());
        assert!(median_sorted(&[]).is_none());
        assert!(numeric_statistics(&[]).is_none());
        assert!(skewness(&[1.0, 2.0, 3.0]).is_none());
        assert!(kurtosis(&[1.0, 2.0, 3.0]).is_none());
        assert!(histogram(&[]).is_empty());
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_index_quartiles() {
        let sorted: Vec<f64> = (1..=8).map(|v| v as f64).collect();
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(3.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(5.0));
        assert_eq!(quantile_sorted(&sorted, 0.75), Some(7.0));
    }

    #[test]
    fn test_linear_quartiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 12.0];
        assert_eq!(quantile_linear(&sorted, 0.25), Some(2.75));
        assert_eq!(quantile_linear(&sorted, 0.5), Some(4.5));
        assert_eq!(quantile_linear(&sorted, 0.75), Some(6.25));
        assert_eq!(quantile_linear(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_linear(&sorted, 1.0), Some(12.0));
        assert_eq!(quantile_linear(&[4.0], 0.75), Some(4.0));
        assert_eq!(quantile_linear(&[], 0.5), None);
        assert_eq!(quantile_linear(&sorted, 1.5), None);
    }

    #[test]
    fn test_numeric_statistics() {
        let stats = numeric_statistics(&[4.0, 2.0, 1.0, 3.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!(approx(stats.mean, 2.5));
        assert!(approx(stats.variance, 1.25));
        assert!(approx(stats.skewness.unwrap(), 0.0));
        assert!(approx(stats.kurtosis.unwrap(), -1.2));
    }

    #[test]
    fn test_constant_values_have_no_shape_moments() {
        let stats = numeric_statistics(&[5.0; 6]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert!(stats.skewness.is_none());
        assert!(stats.kurtosis.is_none());
    }

    #[test]
    fn test_pearson() {
        let x: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        assert!(approx(pearson(&x, &y), 1.0));

        let neg: Vec<f64> = x.iter().map(|v| -v).collect();
        assert!(approx(pearson(&x, &neg), -1.0));

        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_histogram_bins() {
        let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        let bins = histogram(&values);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins.last().unwrap().end, 99.0);

        let constant = histogram(&[3.0, 3.0, 3.0]);
        assert_eq!(constant.len(), 1);
        assert_eq!(constant[0].count, 3);
    }

    #[test]
    fn test_histogram_caps_bin_count() {
        let values: Vec<f64> = (0..10_000).map(|v| v as f64).collect();
        assert_eq!(histogram(&values).len(), 20);
    }

    #[test]
    fn test_z_score_outliers() {
        let mut values = vec![10.0; 30];
        values.push(1000.0);
        assert_eq!(z_score_outliers(&values, 3.0), vec![30]);
        assert!(z_score_outliers(&[1.0; 5], 3.0).is_empty());
    }
}
