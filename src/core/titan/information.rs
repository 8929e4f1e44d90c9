//! Information theory in bits (log base 2).
//!
//! Note `loss::cross_entropy` and `loss::kl_divergence` use the natural log;
//! the functions here are the base-2 counterparts shown on the dashboard.

use crate::core::error::{check_parallel, Result, TitanError};
use crate::core::titan::matrix::Matrix;

const EPSILON: f64 = 1e-15;

/// Shannon entropy `-Σ p log2 p`; zero-probability terms contribute nothing.
pub fn entropy(probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

/// Entropy of a joint distribution laid out as a matrix `P[x][y]`.
pub fn joint_entropy(joint: &Matrix) -> f64 {
    entropy(joint.as_slice())
}

/// Row and column marginals of a joint distribution.
pub fn marginals(joint: &Matrix) -> (Vec<f64>, Vec<f64>) {
    let px = joint.iter_rows().map(|row| row.iter().sum()).collect();
    let py = joint.iter_columns().map(|col| col.iter().sum()).collect();
    (px, py)
}

/// `I(X;Y) = H(X) + H(Y) - H(X,Y)`.
pub fn mutual_information(joint: &Matrix) -> Result<f64> {
    if joint.is_empty() {
        return Err(TitanError::EmptyInput("mutual_information"));
    }
    let (px, py) = marginals(joint);
    Ok(entropy(&px) + entropy(&py) - joint_entropy(joint))
}

/// `-Σ p log2 q`, with `q` clamped to ε.
pub fn cross_entropy(p: &[f64], q: &[f64]) -> Result<f64> {
    check_parallel("cross_entropy", p, q)?;
    Ok(-p
        .iter()
        .zip(q)
        .filter(|(&pi, _)| pi > 0.0)
        .map(|(&pi, &qi)| pi * qi.max(EPSILON).log2())
        .sum::<f64>())
}

/// `Σ p log2(p / q)`.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Result<f64> {
    Ok(cross_entropy(p, q)? - entropy(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_bits() {
        assert_eq!(entropy(&[1.0]), 0.0);
        assert_eq!(entropy(&[0.5, 0.5]), 1.0);
        assert_eq!(entropy(&[0.25; 4]), 2.0);
        assert_eq!(entropy(&[0.5, 0.5, 0.0]), 1.0);
    }

    #[test]
    fn test_mutual_information() {
        // perfectly correlated bits share one bit of information
        let joint = Matrix::from_rows(&[vec![0.5, 0.0], vec![0.0, 0.5]]).unwrap();
        assert!((mutual_information(&joint).unwrap() - 1.0).abs() < 1e-12);
        // independent bits share none
        let indep = Matrix::filled(2, 2, 0.25);
        assert!(mutual_information(&indep).unwrap().abs() < 1e-12);
        assert_eq!(joint_entropy(&indep), 2.0);
    }

    #[test]
    fn test_cross_entropy_and_kl() {
        let p = [0.5, 0.5];
        assert!((cross_entropy(&p, &p).unwrap() - 1.0).abs() < 1e-12);
        assert!((cross_entropy(&p, &[0.25, 0.75]).unwrap() - (-0.5 * 0.25f64.log2() - 0.5 * 0.75f64.log2())).abs() < 1e-12);
        assert!(kl_divergence(&p, &p).unwrap().abs() < 1e-12);
        assert!(cross_entropy(&p, &[1.0]).is_err());
    }
}
