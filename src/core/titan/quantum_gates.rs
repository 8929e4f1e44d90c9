//! Standard single-qubit gates as fixed 2×2 complex matrices.
use crate::core::titan::complex::Complex;
use std::f64::consts::FRAC_PI_4;

#[inline]
fn c(r: f64, i: f64) -> Complex {
    Complex::new(r, i)
}

/// A 2×2 complex matrix `[[g00, g01], [g10, g11]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate(pub [[Complex; 2]; 2]);

impl Gate {
    pub fn new(g00: Complex, g01: Complex, g10: Complex, g11: Complex) -> Self {
        Gate([[g00, g01], [g10, g11]])
    }

    pub fn matrix(&self) -> &[[Complex; 2]; 2] {
        &self.0
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Gate {
        let m = &self.0;
        Gate::new(m[0][0].conj(), m[1][0].conj(), m[0][1].conj(), m[1][1].conj())
    }

    /// Matrix product `self · other` (apply `other` first).
    pub fn multiply(&self, other: &Gate) -> Gate {
        let (a, b) = (&self.0, &other.0);
        let mut out = [[Complex::ZERO; 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        Gate(out)
    }

    /// U†U = I within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        let p = self.adjoint().multiply(self);
        p.approx_eq(&identity(), tol)
    }

    pub fn approx_eq(&self, other: &Gate, tol: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| a.approx_eq(b, tol))
    }

    /// Apply to the amplitude pair (bit = 0, bit = 1).
    #[inline]
    pub fn apply_pair(&self, a0: Complex, a1: Complex) -> (Complex, Complex) {
        let m = &self.0;
        (m[0][0] * a0 + m[0][1] * a1, m[1][0] * a0 + m[1][1] * a1)
    }
}

pub fn identity() -> Gate {
    Gate::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0))
}

pub fn pauli_x() -> Gate {
    Gate::new(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0))
}

pub fn pauli_y() -> Gate {
    Gate::new(c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0))
}

pub fn pauli_z() -> Gate {
    Gate::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0))
}

pub fn hadamard() -> Gate {
    let s = 1.0_f64 / 2.0_f64.sqrt();
    Gate::new(c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0))
}

/// S gate: phase i on |1⟩.
pub fn phase() -> Gate {
    Gate::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0))
}

/// T gate: phase e^{iπ/4} on |1⟩.
pub fn t() -> Gate {
    Gate::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), Complex::from_polar(1.0, FRAC_PI_4))
}

pub fn rx(theta: f64) -> Gate {
    let (c0, s0) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    Gate::new(c(c0, 0.0), c(0.0, -s0), c(0.0, -s0), c(c0, 0.0))
}

pub fn ry(theta: f64) -> Gate {
    let (c0, s0) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    Gate::new(c(c0, 0.0), c(-s0, 0.0), c(s0, 0.0), c(c0, 0.0))
}

pub fn rz(theta: f64) -> Gate {
    Gate::new(
        Complex::from_polar(1.0, -theta / 2.0),
        c(0.0, 0.0),
        c(0.0, 0.0),
        Complex::from_polar(1.0, theta / 2.0),
    )
}
