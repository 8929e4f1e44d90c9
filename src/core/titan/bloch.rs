//! Bloch-sphere projection of a single qubit.
use crate::core::titan::complex::Complex;
use serde::Serialize;

/// Polar (`theta`) and azimuthal (`phi`) angles on the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlochAngles {
    pub theta: f64,
    pub phi: f64,
}

impl BlochAngles {
    /// θ = 2·acos(min(1, |α|)), φ = arg(β) − arg(α).
    ///
    /// The clamp keeps `acos` defined when rounding pushes |α| past 1.
    pub fn from_amplitudes(alpha: Complex, beta: Complex) -> Self {
        BlochAngles {
            theta: 2.0 * alpha.magnitude().min(1.0).acos(),
            phi: beta.phase() - alpha.phase(),
        }
    }

    /// Unit-sphere coordinates `(x, y, z)`.
    pub fn to_cartesian(&self) -> (f64, f64, f64) {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        (st * cp, st * sp, ct)
    }
}
