//! Descriptive statistics and normalisation over flat samples.

use crate::core::error::{check_parallel, Result, TitanError};
use crate::core::titan::matrix::Matrix;

fn non_empty(data: &[f64], op: &'static str) -> Result<()> {
    if data.is_empty() {
        Err(TitanError::EmptyInput(op))
    } else {
        Ok(())
    }
}

fn sorted(data: &[f64]) -> Vec<f64> {
    let mut v = data.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v
}

/// Calculates the mean (average) of a dataset.
pub fn mean(data: &[f64]) -> Result<f64> {
    non_empty(data, "mean")?;
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population variance (divides by N).
pub fn variance(data: &[f64]) -> Result<f64> {
    let m = mean(data)?;
    Ok(data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64)
}

pub fn std_dev(data: &[f64]) -> Result<f64> {
    variance(data).map(f64::sqrt)
}

/// Population covariance of two parallel samples.
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64> {
    check_parallel("covariance", x, y)?;
    let (mx, my) = (mean(x)?, mean(y)?);
    Ok(x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum::<f64>() / x.len() as f64)
}

/// Pearson correlation. A constant sample has no defined correlation; 0 is returned.
pub fn correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    let cov = covariance(x, y)?;
    let denom = std_dev(x)? * std_dev(y)?;
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(cov / denom)
}

pub fn median(data: &[f64]) -> Result<f64> {
    non_empty(data, "median")?;
    let v = sorted(data);
    let n = v.len();
    if n % 2 == 0 {
        Ok((v[n / 2 - 1] + v[n / 2]) / 2.0)
    } else {
        Ok(v[n / 2])
    }
}

/// p-th percentile, linear interpolation between the floor and ceil ranks.
pub fn percentile(data: &[f64], p: f64) -> Result<f64> {
    non_empty(data, "percentile")?;
    if !(0.0..=100.0).contains(&p) {
        return Err(TitanError::invalid(format!("percentile must be between 0 and 100, got {p}")));
    }
    let v = sorted(data);
    let rank = (p / 100.0) * (v.len() as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        Ok(v[lower])
    } else {
        let f = rank - lower as f64;
        Ok((1.0 - f) * v[lower] + f * v[upper])
    }
}

/// (x - μ) / σ; a constant sample maps to zeros.
pub fn z_score(data: &[f64]) -> Result<Vec<f64>> {
    let m = mean(data)?;
    let s = std_dev(data)?;
    if s == 0.0 {
        return Ok(vec![0.0; data.len()]);
    }
    Ok(data.iter().map(|x| (x - m) / s).collect())
}

/// Rescales into [0, 1]; a constant sample maps to zeros.
pub fn min_max(data: &[f64]) -> Result<Vec<f64>> {
    non_empty(data, "min_max")?;
    let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    if range == 0.0 {
        return Ok(vec![0.0; data.len()]);
    }
    Ok(data.iter().map(|x| (x - lo) / range).collect())
}

fn normalize_slice(values: &[f64], gamma: f64, beta: f64, epsilon: f64) -> Vec<f64> {
    let n = values.len() as f64;
    let mu = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / n;
    let denom = (var + epsilon).sqrt();
    values.iter().map(|x| gamma * (x - mu) / denom + beta).collect()
}

/// Batch normalisation: each column is normalised over the rows (the batch),
/// `γ(x-μ)/√(σ²+ε) + β`.
pub fn batch_norm(x: &Matrix, gamma: f64, beta: f64, epsilon: f64) -> Result<Matrix> {
    if x.is_empty() {
        return Err(TitanError::EmptyInput("batch_norm"));
    }
    let columns: Vec<Vec<f64>> = x
        .iter_columns()
        .map(|col| normalize_slice(&col, gamma, beta, epsilon))
        .collect();
    let data = (0..x.rows())
        .flat_map(|r| columns.iter().map(move |col| col[r]))
        .collect();
    Matrix::from_vec(x.rows(), x.cols(), data)
}

/// Layer normalisation: each row is normalised over its features.
pub fn layer_norm(x: &Matrix, gamma: f64, beta: f64, epsilon: f64) -> Result<Matrix> {
    if x.is_empty() {
        return Err(TitanError::EmptyInput("layer_norm"));
    }
    let data = x
        .iter_rows()
        .flat_map(|row| normalize_slice(row, gamma, beta, epsilon))
        .collect();
    Matrix::from_vec(x.rows(), x.cols(), data)
}
