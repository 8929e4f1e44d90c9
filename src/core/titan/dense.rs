//! Dense unitary reference path (feature: `dense`).
//!
//! Builds full `2^n × 2^n` operators with Kronecker products so the in-place
//! bit-paired simulator can be checked against a plain matrix-vector product.
use crate::core::error::{Result, TitanError};
use crate::core::titan::complex::Complex;
use crate::core::titan::quantum_gates::Gate;
use crate::core::titan::quantum_state::QuantumState;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as C64;

#[inline]
fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

impl From<Complex> for C64 {
    fn from(z: Complex) -> Self {
        C64::new(z.re, z.im)
    }
}

impl From<C64> for Complex {
    fn from(z: C64) -> Self {
        Complex::new(z.re, z.im)
    }
}

pub fn gate_matrix(g: &Gate) -> DMatrix<C64> {
    let m = g.matrix();
    DMatrix::from_row_slice(2, 2, &[m[0][0].into(), m[0][1].into(), m[1][0].into(), m[1][1].into()])
}

/// Kronecker product A ⊗ B
pub fn kron(a: &DMatrix<C64>, b: &DMatrix<C64>) -> DMatrix<C64> {
    let (ar, ac) = (a.nrows(), a.ncols());
    let (br, bc) = (b.nrows(), b.ncols());
    let mut out = DMatrix::<C64>::from_element(ar * br, ac * bc, c(0.0, 0.0));
    for i in 0..ar {
        for j in 0..ac {
            let aij = a[(i, j)];
            for k in 0..br {
                for l in 0..bc {
                    out[(i * br + k, j * bc + l)] = aij * b[(k, l)];
                }
            }
        }
    }
    out
}

/// Promote a 1-qubit gate onto `n_qubits`, acting on `target` (0 = least significant).
pub fn lift_1q(gate: &Gate, n_qubits: usize, target: usize) -> Result<DMatrix<C64>> {
    if target >= n_qubits {
        return Err(TitanError::QubitOutOfRange { qubit: target, num_qubits: n_qubits });
    }
    let u = gate_matrix(gate);
    let i2 = DMatrix::<C64>::identity(2, 2);
    // Most significant qubit first so that qubit q lands on index bit q.
    let mut acc = DMatrix::<C64>::from_element(1, 1, c(1.0, 0.0));
    for q in (0..n_qubits).rev() {
        let m = if q == target { &u } else { &i2 };
        acc = kron(&acc, m);
    }
    Ok(acc)
}

/// Full 2^n CNOT (control -> target).
pub fn cnot_n(n_qubits: usize, control: usize, target: usize) -> Result<DMatrix<C64>> {
    for q in [control, target] {
        if q >= n_qubits {
            return Err(TitanError::QubitOutOfRange { qubit: q, num_qubits: n_qubits });
        }
    }
    if control == target {
        return Err(TitanError::invalid("control and target must differ"));
    }
    let dim = 1usize << n_qubits;
    let mut m = DMatrix::<C64>::from_element(dim, dim, c(0.0, 0.0));
    for basis in 0..dim {
        let mut out = basis;
        if (basis >> control) & 1 == 1 {
            out ^= 1usize << target;
        }
        m[(out, basis)] = c(1.0, 0.0);
    }
    Ok(m)
}

/// `op · ψ` as a new state.
pub fn apply_dense(op: &DMatrix<C64>, psi: &QuantumState) -> Result<QuantumState> {
    if op.ncols() != psi.len() || op.nrows() != op.ncols() {
        return Err(TitanError::DimensionMismatch {
            op: "apply_dense",
            left: (op.nrows(), op.ncols()),
            right: (psi.len(), 1),
        });
    }
    let v = DVector::from_iterator(psi.len(), psi.amplitudes().iter().map(|&z| C64::from(z)));
    let out = op * v;
    QuantumState::from_amplitudes(psi.num_qubits(), out.iter().map(|&z| Complex::from(z)).collect())
}
