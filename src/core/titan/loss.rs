//! Loss functions over parallel predicted/actual sequences (natural log).

use crate::core::error::{check_parallel, Result};

/// Probability clip used to keep `ln` away from zero.
pub const EPSILON: f64 = 1e-15;

pub fn mse(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("mse", predicted, actual)?;
    let sum: f64 = predicted.iter().zip(actual).map(|(p, a)| (p - a).powi(2)).sum();
    Ok(sum / predicted.len() as f64)
}

pub fn mae(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("mae", predicted, actual)?;
    let sum: f64 = predicted.iter().zip(actual).map(|(p, a)| (p - a).abs()).sum();
    Ok(sum / predicted.len() as f64)
}

/// Binary cross-entropy; probabilities are clipped to [ε, 1-ε].
pub fn cross_entropy(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("cross_entropy", predicted, actual)?;
    let sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(&p, &y)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    Ok(sum / predicted.len() as f64)
}

/// `-Σ y ln(p)` for one-hot (or soft) targets.
pub fn categorical_cross_entropy(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("categorical_cross_entropy", predicted, actual)?;
    Ok(-predicted
        .iter()
        .zip(actual)
        .map(|(&p, &y)| y * p.max(EPSILON).ln())
        .sum::<f64>())
}

/// Quadratic for |error| <= delta, linear beyond.
pub fn huber(predicted: &[f64], actual: &[f64], delta: f64) -> Result<f64> {
    check_parallel("huber", predicted, actual)?;
    let sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| {
            let e = (p - a).abs();
            if e <= delta {
                0.5 * e * e
            } else {
                delta * (e - 0.5 * delta)
            }
        })
        .sum();
    Ok(sum / predicted.len() as f64)
}

/// `Σ a ln(a / p)` over `a > 0`; `p` is clamped to ε.
pub fn kl_divergence(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("kl_divergence", predicted, actual)?;
    Ok(predicted
        .iter()
        .zip(actual)
        .filter(|(_, &a)| a > 0.0)
        .map(|(&p, &a)| a * (a / p.max(EPSILON)).ln())
        .sum())
}

/// d(mse)/d(predicted).
pub fn mse_gradient(predicted: &[f64], actual: &[f64]) -> Result<Vec<f64>> {
    check_parallel("mse_gradient", predicted, actual)?;
    let n = predicted.len() as f64;
    Ok(predicted.iter().zip(actual).map(|(p, a)| 2.0 * (p - a) / n).collect())
}

/// d(cross_entropy)/d(predicted), with the same clipping as the loss.
pub fn cross_entropy_gradient(predicted: &[f64], actual: &[f64]) -> Result<Vec<f64>> {
    check_parallel("cross_entropy_gradient", predicted, actual)?;
    let n = predicted.len() as f64;
    Ok(predicted
        .iter()
        .zip(actual)
        .map(|(&p, &y)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            (p - y) / (p * (1.0 - p)) / n
        })
        .collect())
}
