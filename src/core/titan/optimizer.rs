//! Optimizer update rules.
//!
//! Every rule is a pure function: it takes the gradient and the prior
//! `OptimizerState` and hands back the update delta plus the next state. The
//! caller owns the weights and threads the returned state into the next call,
//! one state per parameter tensor.
//!
//! Shapes are checked up front; a gradient that disagrees with the stored
//! moments (or with the weights, for AdamW) is rejected before any arithmetic.

use crate::core::error::{Result, TitanError};
use crate::core::titan::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Per-tensor accumulator: step counter plus first/second moment estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerState {
    pub step: u64,
    pub m: Option<Matrix>,
    pub v: Option<Matrix>,
}

/// Result of one optimizer call. Add `update` into the weights.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerStep {
    pub update: Matrix,
    pub state: OptimizerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamConfig {
    pub lr: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        AdamConfig { lr: 0.001, beta1: 0.9, beta2: 0.999, epsilon: 1e-8 }
    }
}

fn ensure_shape(op: &'static str, gradient: &Matrix, other: Option<&Matrix>) -> Result<()> {
    match other {
        Some(m) if m.shape() != gradient.shape() => {
            crate::debug_log!("{op}: rejecting gradient {:?} against {:?}", gradient.shape(), m.shape());
            Err(TitanError::DimensionMismatch { op, left: gradient.shape(), right: m.shape() })
        }
        _ => Ok(()),
    }
}

/// Plain gradient descent: `update = -lr * gradient`.
pub fn sgd(gradient: &Matrix, lr: f64) -> Matrix {
    gradient.scale(-lr)
}

/// Momentum SGD. Returns `(update, velocity)`; the update is the new velocity.
pub fn sgd_momentum(
    gradient: &Matrix,
    velocity: Option<&Matrix>,
    lr: f64,
    momentum: f64,
) -> Result<(Matrix, Matrix)> {
    ensure_shape("sgd_momentum", gradient, velocity)?;
    let next = match velocity {
        Some(v) => v.zip_map(gradient, "sgd_momentum", |v, g| momentum * v - lr * g)?,
        None => gradient.scale(-lr),
    };
    Ok((next.clone(), next))
}

/// Adam moment update shared by `adam` and `adam_w`.
fn adam_moments(gradient: &Matrix, state: &OptimizerState, cfg: &AdamConfig, op: &'static str) -> Result<OptimizerStep> {
    ensure_shape(op, gradient, state.m.as_ref())?;
    ensure_shape(op, gradient, state.v.as_ref())?;

    let t = state.step + 1;
    let zeros = || Matrix::zeros(gradient.rows(), gradient.cols());
    let m_prev = state.m.clone().unwrap_or_else(zeros);
    let v_prev = state.v.clone().unwrap_or_else(zeros);

    let m = m_prev.zip_map(gradient, op, |m, g| cfg.beta1 * m + (1.0 - cfg.beta1) * g)?;
    let v = v_prev.zip_map(gradient, op, |v, g| cfg.beta2 * v + (1.0 - cfg.beta2) * g * g)?;

    let bias1 = 1.0 - cfg.beta1.powf(t as f64);
    let bias2 = 1.0 - cfg.beta2.powf(t as f64);
    let update = m.zip_map(&v, op, |m, v| {
        let m_hat = m / bias1;
        let v_hat = v / bias2;
        -cfg.lr * m_hat / (v_hat.sqrt() + cfg.epsilon)
    })?;

    Ok(OptimizerStep { update, state: OptimizerState { step: t, m: Some(m), v: Some(v) } })
}

/// Adam with bias-corrected moments: `update = -lr * m̂ / (√v̂ + ε)`.
pub fn adam(gradient: &Matrix, state: &OptimizerState, cfg: &AdamConfig) -> Result<OptimizerStep> {
    adam_moments(gradient, state, cfg, "adam")
}

/// AdamW: the Adam update plus decoupled weight decay `-lr * weight_decay * weights`.
pub fn adam_w(
    gradient: &Matrix,
    weights: &Matrix,
    state: &OptimizerState,
    cfg: &AdamConfig,
    weight_decay: f64,
) -> Result<OptimizerStep> {
    ensure_shape("adam_w", gradient, Some(weights))?;
    let step = adam_moments(gradient, state, cfg, "adam_w")?;
    let update = step
        .update
        .zip_map(weights, "adam_w", |u, w| u - cfg.lr * weight_decay * w)?;
    Ok(OptimizerStep { update, state: step.state })
}

/// RMSprop; the running mean of squared gradients lives in `state.v`.
pub fn rmsprop(gradient: &Matrix, state: &OptimizerState, lr: f64, decay: f64, epsilon: f64) -> Result<OptimizerStep> {
    ensure_shape("rmsprop", gradient, state.v.as_ref())?;
    let v = match &state.v {
        Some(v) => v.zip_map(gradient, "rmsprop", |v, g| decay * v + (1.0 - decay) * g * g)?,
        None => gradient.map(|g| (1.0 - decay) * g * g),
    };
    let update = gradient.zip_map(&v, "rmsprop", |g, v| -lr * g / (v.sqrt() + epsilon))?;
    Ok(OptimizerStep { update, state: OptimizerState { step: state.step + 1, m: None, v: Some(v) } })
}

/// AdaGrad; accumulated squared gradients live in `state.v`.
pub fn adagrad(gradient: &Matrix, state: &OptimizerState, lr: f64, epsilon: f64) -> Result<OptimizerStep> {
    ensure_shape("adagrad", gradient, state.v.as_ref())?;
    let squared = gradient.map(|g| g * g);
    let v = match &state.v {
        Some(v) => v.add(&squared)?,
        None => squared,
    };
    let update = gradient.zip_map(&v, "adagrad", |g, v| -lr * g / (v.sqrt() + epsilon))?;
    Ok(OptimizerStep { update, state: OptimizerState { step: state.step + 1, m: None, v: Some(v) } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd() {
        let g = Matrix::row_vector(&[1.0, -2.0]);
        assert_eq!(sgd(&g, 0.1).as_slice(), &[-0.1, 0.2]);
    }

    #[test]
    fn test_sgd_momentum_accumulates() {
        let g = Matrix::row_vector(&[1.0]);
        let (u1, v1) = sgd_momentum(&g, None, 0.1, 0.9).unwrap();
        assert_eq!(u1.as_slice(), &[-0.1]);
        let (u2, v2) = sgd_momentum(&g, Some(&v1), 0.1, 0.9).unwrap();
        assert!((u2.as_slice()[0] + 0.19).abs() < 1e-12);
        assert_eq!(u2, v2);
    }

    #[test]
    fn test_saved_state_with_short_moments_is_rejected() {
        let src = r#"{"step":3,"m":{"rows":2,"cols":2,"data":[1.0]},"v":null}"#;
        assert!(serde_json::from_str::<OptimizerState>(src).is_err());
        let good = r#"{"step":3,"m":{"rows":1,"cols":2,"data":[0.1,0.2]},"v":{"rows":1,"cols":2,"data":[0.01,0.04]}}"#;
        let state: OptimizerState = serde_json::from_str(good).unwrap();
        assert!(adam(&Matrix::ones(2, 2), &state, &AdamConfig::default()).is_err());
        assert!(adam(&Matrix::ones(1, 2), &state, &AdamConfig::default()).is_ok());
    }

    #[test]
    fn test_adam_first_step_is_lr_sized() {
        let g = Matrix::row_vector(&[0.5, -3.0]);
        let cfg = AdamConfig::default();
        let step = adam(&g, &OptimizerState::default(), &cfg).unwrap();
        assert_eq!(step.state.step, 1);
        // after bias correction the first update is -lr * sign(g)
        assert!((step.update.as_slice()[0] + 0.001).abs() < 1e-6);
        assert!((step.update.as_slice()[1] - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_adam_rejects_shape_change() {
        let cfg = AdamConfig::default();
        let first = adam(&Matrix::ones(2, 2), &OptimizerState::default(), &cfg).unwrap();
        let err = adam(&Matrix::ones(3, 1), &first.state, &cfg).unwrap_err();
        assert!(matches!(err, TitanError::DimensionMismatch { op: "adam", .. }));
    }

    #[test]
    fn test_adam_w_adds_decay() {
        let cfg = AdamConfig::default();
        let g = Matrix::row_vector(&[1.0]);
        let w = Matrix::row_vector(&[2.0]);
        let plain = adam(&g, &OptimizerState::default(), &cfg).unwrap();
        let decayed = adam_w(&g, &w, &OptimizerState::default(), &cfg, 0.01).unwrap();
        let diff = decayed.update.as_slice()[0] - plain.update.as_slice()[0];
        assert!((diff + 0.001 * 0.01 * 2.0).abs() < 1e-15);
        assert!(adam_w(&g, &Matrix::ones(2, 1), &OptimizerState::default(), &cfg, 0.01).is_err());
    }

    #[test]
    fn test_rmsprop_and_adagrad_track_state() {
        let g = Matrix::row_vector(&[2.0]);
        let s1 = rmsprop(&g, &OptimizerState::default(), 0.01, 0.9, 1e-8).unwrap();
        assert!((s1.state.v.as_ref().unwrap().as_slice()[0] - 0.4).abs() < 1e-12);
        let a1 = adagrad(&g, &OptimizerState::default(), 0.1, 1e-8).unwrap();
        let a2 = adagrad(&g, &a1.state, 0.1, 1e-8).unwrap();
        assert_eq!(a2.state.v.as_ref().unwrap().as_slice(), &[8.0]);
        assert_eq!(a2.state.step, 2);
        assert!(a2.update.as_slice()[0].abs() < a1.update.as_slice()[0].abs());
    }
}
