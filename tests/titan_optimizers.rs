use mlops_titan::core::titan::matrix::Matrix;
use mlops_titan::core::titan::optimizer::{adam, adam_w, rmsprop, sgd, AdamConfig, OptimizerState};
use mlops_titan::core::TitanError;

#[test]
fn adam_step_under_constant_gradient_is_minus_lr() {
    let cfg = AdamConfig { lr: 0.01, ..AdamConfig::default() };
    let g = Matrix::from_vec(2, 2, vec![0.5, -2.0, 3.0, 1e-3]).unwrap();
    let mut state = OptimizerState::default();
    for _ in 0..50 {
        let step = adam(&g, &state, &cfg).unwrap();
        for (u, gi) in step.update.as_slice().iter().zip(g.as_slice()) {
            // bias correction makes every step ~ -lr * sign(g)
            assert!((u + cfg.lr * gi.signum()).abs() < 1e-4, "update {u} for grad {gi}");
        }
        state = step.state;
    }
    assert_eq!(state.step, 50);
}

#[test]
fn adam_rejects_gradient_of_new_shape() {
    let cfg = AdamConfig::default();
    let first = adam(&Matrix::ones(2, 2), &OptimizerState::default(), &cfg).unwrap();
    let err = adam(&Matrix::ones(3, 1), &first.state, &cfg).unwrap_err();
    assert!(matches!(err, TitanError::DimensionMismatch { op: "adam", .. }));
}

#[test]
fn adam_w_decays_weights_with_zero_gradient() {
    let cfg = AdamConfig { lr: 0.1, ..AdamConfig::default() };
    let w = Matrix::from_vec(1, 2, vec![1.0, -2.0]).unwrap();
    let step = adam_w(&Matrix::zeros(1, 2), &w, &OptimizerState::default(), &cfg, 0.5).unwrap();
    assert!(step.update.approx_eq(&Matrix::from_vec(1, 2, vec![-0.05, 0.1]).unwrap(), 1e-12));
    assert!(adam_w(&Matrix::zeros(1, 2), &Matrix::zeros(2, 1), &OptimizerState::default(), &cfg, 0.5).is_err());
}

#[test]
fn sgd_and_rmsprop_descend() {
    let g = Matrix::from_vec(1, 2, vec![1.0, -1.0]).unwrap();
    assert_eq!(sgd(&g, 0.1).as_slice(), &[-0.1, 0.1]);
    let step = rmsprop(&g, &OptimizerState::default(), 0.01, 0.9, 1e-8).unwrap();
    assert!(step.update.as_slice()[0] < 0.0);
    assert!(step.update.as_slice()[1] > 0.0);
}
