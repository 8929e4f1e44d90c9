//! Weight penalties and inverted dropout.

use crate::core::error::{Result, TitanError};
use crate::core::titan::matrix::Matrix;
use rand::Rng;

/// λ Σ|w|
pub fn l1_penalty(weights: &Matrix, lambda: f64) -> f64 {
    lambda * weights.as_slice().iter().map(|w| w.abs()).sum::<f64>()
}

/// λ/2 Σw²
pub fn l2_penalty(weights: &Matrix, lambda: f64) -> f64 {
    0.5 * lambda * weights.as_slice().iter().map(|w| w * w).sum::<f64>()
}

/// Convex mix of the L1 and L2 penalties.
pub fn elastic_net(weights: &Matrix, lambda: f64, l1_ratio: f64) -> f64 {
    l1_ratio * l1_penalty(weights, lambda) + (1.0 - l1_ratio) * l2_penalty(weights, lambda)
}

pub fn l1_gradient(weights: &Matrix, lambda: f64) -> Matrix {
    weights.map(|w| {
        if w > 0.0 {
            lambda
        } else if w < 0.0 {
            -lambda
        } else {
            0.0
        }
    })
}

pub fn l2_gradient(weights: &Matrix, lambda: f64) -> Matrix {
    weights.scale(lambda)
}

/// Inverted dropout. Each entry survives with probability `1 - rate` and is
/// scaled by `1 / (1 - rate)`. Returns `(output, mask)`.
pub fn dropout<R: Rng + ?Sized>(rng: &mut R, input: &Matrix, rate: f64) -> Result<(Matrix, Matrix)> {
    if !(0.0..1.0).contains(&rate) {
        return Err(TitanError::invalid(format!("dropout rate must be in [0, 1), got {rate}")));
    }
    let keep = 1.0 - rate;
    let mask = input.map(|_| if rng.gen::<f64>() < keep { 1.0 } else { 0.0 });
    let output = input.hadamard(&mask)?.scale(1.0 / keep);
    Ok((output, mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_penalties() {
        let w = Matrix::row_vector(&[1.0, -2.0, 0.0]);
        assert_eq!(l1_penalty(&w, 0.5), 1.5);
        assert_eq!(l2_penalty(&w, 0.5), 1.25);
        assert_eq!(elastic_net(&w, 0.5, 1.0), 1.5);
        assert_eq!(l1_gradient(&w, 0.1).as_slice(), &[0.1, -0.1, 0.0]);
        assert_eq!(l2_gradient(&w, 2.0).as_slice(), &[2.0, -4.0, 0.0]);
    }

    #[test]
    fn test_dropout_scales_survivors() {
        let mut rng = StdRng::seed_from_u64(11);
        let x = Matrix::ones(20, 20);
        let (out, mask) = dropout(&mut rng, &x, 0.25).unwrap();
        for (o, m) in out.as_slice().iter().zip(mask.as_slice()) {
            if *m == 1.0 {
                assert!((o - 1.0 / 0.75).abs() < 1e-12);
            } else {
                assert_eq!(*o, 0.0);
            }
        }
        let kept = mask.sum() / 400.0;
        assert!((kept - 0.75).abs() < 0.1, "kept fraction {kept}");
    }

    #[test]
    fn test_dropout_rejects_bad_rate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(dropout(&mut rng, &Matrix::ones(1, 1), 1.0).is_err());
        assert!(dropout(&mut rng, &Matrix::ones(1, 1), -0.1).is_err());
        let (out, _) = dropout(&mut rng, &Matrix::ones(2, 2), 0.0).unwrap();
        assert_eq!(out, Matrix::ones(2, 2));
    }
}
