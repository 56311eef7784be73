//! Least-squares fitting for the power-law report
//!
//! A power-law fit over a frequency distribution is a straight line in
//! log-log space, so a two-parameter ordinary least-squares fit in closed
//! form is all that is needed.

/// Ordinary least-squares fit of `y = slope * x + intercept`.
/// Degenerate inputs (fewer than two points, zero variance in x) fit a flat
/// line: `(0.0, mean(y))`.
pub fn least_squares(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let sxx: f64 = xs.iter().map(|x| (x - mean_x) * (x - mean_x)).sum();
    if sxx == 0.0 {
        return (0.0, mean_y);
    }
    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

/// Pearson correlation coefficient of two series; 0.0 when either series has
/// no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return 0.0;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let sxx: f64 = xs.iter().map(|x| (x - mean_x) * (x - mean_x)).sum();
    let syy: f64 = ys.iter().map(|y| (y - mean_y) * (y - mean_y)).sum();
    if sxx == 0.0 || syy == 0.0 {
        return 0.0;
    }
    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    sxy / (sxx * syy).sqrt()
}
