//! Titan numeric engine: matrices and training math on one side, a
//! state-vector quantum simulator on the other. The two halves share only the
//! error type.

pub mod activation;
pub mod information;
pub mod loss;
pub mod matrix;
pub mod metrics;
pub mod optimizer;
pub mod regularization;
pub mod scheduler;
pub mod statistics;

pub mod bloch;
pub mod circuit;
pub mod complex;
pub mod quantum_gates;
pub mod quantum_state;

// --- Dense reference backend (feature-gated) ---
#[cfg(feature = "dense")]
pub mod dense;

pub use complex::Complex;
pub use matrix::Matrix;
pub use quantum_state::QuantumState;
