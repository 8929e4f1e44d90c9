//! Activation functions and their derivatives.
//!
//! Derivatives of `sigmoid` and `tanh` take the already-activated value, which
//! is what a backward pass has on hand.

use crate::core::titan::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative expressed through the sigmoid output `s = sigmoid(x)`.
pub fn sigmoid_derivative(s: f64) -> f64 {
    s * (1.0 - s)
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Derivative expressed through `t = tanh(x)`.
pub fn tanh_derivative(t: f64) -> f64 {
    1.0 - t * t
}

pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

pub fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

pub fn leaky_relu(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        alpha * x
    }
}

pub fn leaky_relu_derivative(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        alpha
    }
}

pub fn elu(x: f64, alpha: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        alpha * (x.exp() - 1.0)
    }
}

/// GELU, tanh approximation: 0.5x(1 + tanh(√(2/π)(x + 0.044715x³))).
pub fn gelu(x: f64) -> f64 {
    0.5 * x * (1.0 + ((2.0 / PI).sqrt() * (x + 0.044715 * x.powi(3))).tanh())
}

pub fn swish(x: f64) -> f64 {
    x * sigmoid(x)
}

pub fn softplus(x: f64) -> f64 {
    // ln(1 + e^x) without overflowing for large x
    if x > 30.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

/// Numerically stable softmax: the max is subtracted before exponentiating.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

pub fn log_softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_sum = values.iter().map(|&v| (v - max).exp()).sum::<f64>().ln();
    values.iter().map(|&v| v - max - log_sum).collect()
}

/// Named activation, selectable from config files and CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Activation {
    Linear,
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu { alpha: f64 },
    Gelu,
    Swish,
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Activation::Linear => x,
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => tanh(x),
            Activation::Relu => relu(x),
            Activation::LeakyRelu { alpha } => leaky_relu(x, alpha),
            Activation::Gelu => gelu(x),
            Activation::Swish => swish(x),
        }
    }

    pub fn apply_matrix(&self, m: &Matrix) -> Matrix {
        m.map(|x| self.apply(x))
    }
}
