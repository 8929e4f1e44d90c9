use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Learning-rate schedule, evaluated per epoch (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LrSchedule {
    #[default]
    Constant,
    /// Multiply by `gamma` every `step_size` epochs.
    StepDecay { step_size: usize, gamma: f64 },
    Exponential { gamma: f64 },
    /// Cosine from `base_lr` down to `min_lr` over `t_max` epochs, then held.
    CosineAnnealing { t_max: usize, min_lr: f64 },
    /// Linear ramp from 0 to `base_lr` over `warmup_steps`, then constant.
    LinearWarmup { warmup_steps: usize },
}

impl LrSchedule {
    pub fn lr_at(&self, base_lr: f64, epoch: usize) -> f64 {
        match *self {
            LrSchedule::Constant => base_lr,
            LrSchedule::StepDecay { step_size, gamma } => {
                base_lr * gamma.powi((epoch / step_size.max(1)) as i32)
            }
            LrSchedule::Exponential { gamma } => base_lr * gamma.powi(epoch as i32),
            LrSchedule::CosineAnnealing { t_max, min_lr } => {
                let t = epoch.min(t_max) as f64;
                let t_max = t_max.max(1) as f64;
                min_lr + 0.5 * (base_lr - min_lr) * (1.0 + (PI * t / t_max).cos())
            }
            LrSchedule::LinearWarmup { warmup_steps } => {
                if epoch >= warmup_steps {
                    base_lr
                } else {
                    base_lr * (epoch + 1) as f64 / warmup_steps as f64
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_decay() {
        let s = LrSchedule::StepDecay { step_size: 10, gamma: 0.5 };
        assert_eq!(s.lr_at(0.1, 0), 0.1);
        assert_eq!(s.lr_at(0.1, 9), 0.1);
        assert_eq!(s.lr_at(0.1, 10), 0.05);
        assert_eq!(s.lr_at(0.1, 25), 0.025);
    }

    #[test]
    fn test_cosine_annealing_endpoints() {
        let s = LrSchedule::CosineAnnealing { t_max: 100, min_lr: 0.001 };
        assert!((s.lr_at(0.1, 0) - 0.1).abs() < 1e-12);
        assert!((s.lr_at(0.1, 50) - 0.0505).abs() < 1e-12);
        assert!((s.lr_at(0.1, 100) - 0.001).abs() < 1e-12);
        assert!((s.lr_at(0.1, 500) - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_warmup_and_exponential() {
        let w = LrSchedule::LinearWarmup { warmup_steps: 4 };
        assert_eq!(w.lr_at(1.0, 0), 0.25);
        assert_eq!(w.lr_at(1.0, 3), 1.0);
        assert_eq!(w.lr_at(1.0, 10), 1.0);
        let e = LrSchedule::Exponential { gamma: 0.5 };
        assert_eq!(e.lr_at(1.0, 3), 0.125);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let s: LrSchedule = toml::from_str("kind = \"step_decay\"\nstep_size = 5\ngamma = 0.9").unwrap();
        assert_eq!(s, LrSchedule::StepDecay { step_size: 5, gamma: 0.9 });
    }
}
