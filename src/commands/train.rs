//! `titan train`: least-squares fit on seeded synthetic data, reporting the
//! per-step loss the training dashboard plots.

use anyhow::{Context, Result};
use colored::Colorize;
use rand::Rng;
use serde::Serialize;

use crate::cli::OptimizerKind;
use crate::config::TitanConfig;
use crate::core::titan::{
    loss,
    matrix::Matrix,
    optimizer::{self, AdamConfig, OptimizerState},
};

const SAMPLES: usize = 64;
const TRUE_WEIGHTS: [f64; 3] = [2.0, -3.0, 0.5];
const NOISE_STD: f64 = 0.1;
const MOMENTUM: f64 = 0.9;
const RMS_DECAY: f64 = 0.9;
const WEIGHT_DECAY: f64 = 0.01;

#[derive(Debug, Clone, Serialize)]
pub struct TracePoint {
    pub step: usize,
    pub lr: f64,
    pub loss: f64,
}

#[derive(Debug, Serialize)]
pub struct TrainReport {
    pub optimizer: String,
    pub trace: Vec<TracePoint>,
    pub weights: Vec<f64>,
    pub final_loss: f64,
}

/// Design matrix `X` (SAMPLES × 3) and targets `y = X·w* + noise`.
pub fn synthetic_problem<R: Rng + ?Sized>(rng: &mut R) -> Result<(Matrix, Matrix)> {
    let x = Matrix::random_normal(rng, SAMPLES, TRUE_WEIGHTS.len(), 0.0, 1.0)?;
    let w = Matrix::from_vec(TRUE_WEIGHTS.len(), 1, TRUE_WEIGHTS.to_vec())?;
    let noise = Matrix::random_normal(rng, SAMPLES, 1, 0.0, NOISE_STD)?;
    let y = x.multiply(&w)?.add(&noise)?;
    Ok((x, y))
}

fn loss_and_gradient(x: &Matrix, y: &Matrix, w: &Matrix) -> Result<(f64, Matrix)> {
    let pred = x.multiply(w)?;
    let l = loss::mse(pred.as_slice(), y.as_slice())?;
    // d/dw mean((Xw - y)^2) = 2/n Xᵀ(Xw - y)
    let residual = pred.subtract(y)?;
    let grad = x.transpose().multiply(&residual)?.scale(2.0 / x.rows() as f64);
    Ok((l, grad))
}

/// Run `steps` optimizer iterations, threading the optimizer state through
/// each call.
pub fn fit(
    kind: OptimizerKind,
    steps: usize,
    base_lr: f64,
    cfg: &TitanConfig,
    seed: Option<u64>,
) -> Result<TrainReport> {
    let mut rng = super::make_rng(seed);
    let (x, y) = synthetic_problem(&mut rng)?;
    let mut w = Matrix::zeros(x.cols(), 1);
    let mut state = OptimizerState::default();
    let mut velocity: Option<Matrix> = None;
    let mut trace = Vec::with_capacity(steps);

    for step in 0..steps {
        let lr = cfg.schedule.lr_at(base_lr, step);
        let (l, grad) = loss_and_gradient(&x, &y, &w)?;
        trace.push(TracePoint { step, lr, loss: l });

        let adam_cfg = AdamConfig { lr, ..cfg.adam };
        let update = match kind {
            OptimizerKind::Sgd => optimizer::sgd(&grad, lr),
            OptimizerKind::Momentum => {
                let (u, v) = optimizer::sgd_momentum(&grad, velocity.as_ref(), lr, MOMENTUM)?;
                velocity = Some(v);
                u
            }
            OptimizerKind::Adam => {
                let s = optimizer::adam(&grad, &state, &adam_cfg)?;
                state = s.state;
                s.update
            }
            OptimizerKind::Adamw => {
                let s = optimizer::adam_w(&grad, &w, &state, &adam_cfg, WEIGHT_DECAY)?;
                state = s.state;
                s.update
            }
            OptimizerKind::Rmsprop => {
                let s = optimizer::rmsprop(&grad, &state, lr, RMS_DECAY, adam_cfg.epsilon)?;
                state = s.state;
                s.update
            }
            OptimizerKind::Adagrad => {
                let s = optimizer::adagrad(&grad, &state, lr, adam_cfg.epsilon)?;
                state = s.state;
                s.update
            }
        };
        w = w.add(&update).with_context(|| format!("apply update at step {step}"))?;
    }

    let (final_loss, _) = loss_and_gradient(&x, &y, &w)?;
    crate::debug_log!("train: {kind:?} finished {steps} step(s), loss={final_loss:.6}");
    Ok(TrainReport {
        optimizer: format!("{kind:?}").to_lowercase(),
        trace,
        weights: w.into_vec(),
        final_loss,
    })
}

pub fn train_run(
    kind: OptimizerKind,
    steps: usize,
    lr: Option<f64>,
    every: usize,
    seed: Option<u64>,
    json: bool,
    cfg: &TitanConfig,
) -> Result<()> {
    let base_lr = lr.unwrap_or(cfg.adam.lr);
    let report = fit(kind, steps, base_lr, cfg, seed.or(cfg.seed))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let prec = cfg.precision;
    println!("{} {} for {} step(s), base lr {}", "Training".bold().cyan(), report.optimizer, steps, base_lr);
    for p in report.trace.iter().filter(|p| p.step % every.max(1) == 0) {
        println!("  step {:>5}  lr {:.*e}  loss {:.*}", p.step, prec, p.lr, prec, p.loss);
    }
    println!("{} loss={:.*}", "Final".bold().green(), prec, report.final_loss);
    let w: Vec<String> = report.weights.iter().map(|v| format!("{v:.prec$}")).collect();
    println!("  weights [{}]  (target {:?})", w.join(", "), TRUE_WEIGHTS);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TitanConfig {
        TitanConfig::default()
    }

    #[test]
    fn test_every_optimizer_reduces_loss() {
        for (kind, lr) in [
            (OptimizerKind::Sgd, 0.05),
            (OptimizerKind::Momentum, 0.02),
            (OptimizerKind::Adam, 0.05),
            (OptimizerKind::Adamw, 0.05),
            (OptimizerKind::Rmsprop, 0.05),
            (OptimizerKind::Adagrad, 0.5),
        ] {
            let r = fit(kind, 300, lr, &cfg(), Some(1)).unwrap();
            let first = r.trace[0].loss;
            assert!(r.final_loss < first * 0.1, "{kind:?}: {first} -> {}", r.final_loss);
        }
    }

    #[test]
    fn test_adam_recovers_weights() {
        let r = fit(OptimizerKind::Adam, 1500, 0.01, &cfg(), Some(2)).unwrap();
        for (w, t) in r.weights.iter().zip(TRUE_WEIGHTS) {
            assert!((w - t).abs() < 0.1, "{w} vs {t}");
        }
    }

    #[test]
    fn test_zero_steps() {
        let r = fit(OptimizerKind::Sgd, 0, 0.1, &cfg(), Some(3)).unwrap();
        assert!(r.trace.is_empty());
        assert_eq!(r.weights, vec![0.0; 3]);
    }
}
