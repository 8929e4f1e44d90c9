use crate::core::error::{Result, TitanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Complex amplitude. Every operation returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };
    pub const I: Complex = Complex { re: 0.0, im: 1.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    pub const fn real(re: f64) -> Self {
        Complex { re, im: 0.0 }
    }

    // Magnitude of the complex number
    pub fn magnitude(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Squared magnitude; the Born-rule probability of an amplitude.
    pub fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    // Phase (angle) of the complex number in radians
    pub fn phase(&self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn conj(&self) -> Complex {
        Complex::new(self.re, -self.im)
    }

    pub fn scale(&self, k: f64) -> Complex {
        Complex::new(self.re * k, self.im * k)
    }

    pub fn divide(&self, other: &Complex) -> Result<Complex> {
        let denominator = other.norm_sqr();
        if denominator == 0.0 {
            return Err(TitanError::invalid("complex division by zero"));
        }
        Ok(Complex::new(
            (self.re * other.re + self.im * other.im) / denominator,
            (self.im * other.re - self.re * other.im) / denominator,
        ))
    }

    /// (magnitude, phase)
    pub fn to_polar(&self) -> (f64, f64) {
        (self.magnitude(), self.phase())
    }

    pub fn from_polar(magnitude: f64, phase: f64) -> Complex {
        Complex::new(magnitude * phase.cos(), magnitude * phase.sin())
    }

    pub fn approx_eq(&self, other: &Complex, tol: f64) -> bool {
        (self.re - other.re).abs() <= tol && (self.im - other.im).abs() <= tol
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(4);
        if self.im.is_sign_negative() {
            write!(f, "{:.*}-{:.*}i", prec, self.re, prec, -self.im)
        } else {
            write!(f, "{:.*}+{:.*}i", prec, self.re, prec, self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_arithmetic() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);
        assert_eq!(a + b, Complex::new(4.0, 1.0));
        assert_eq!(a - b, Complex::new(-2.0, 3.0));
        assert_eq!(a * b, Complex::new(5.0, 5.0));
        assert_eq!(-a, Complex::new(-1.0, -2.0));
        // receiver untouched
        assert_eq!(a, Complex::new(1.0, 2.0));
    }

    #[test]
    fn test_divide() {
        let a = Complex::new(5.0, 5.0);
        let b = Complex::new(3.0, -1.0);
        let q = a.divide(&b).unwrap();
        assert!(q.approx_eq(&Complex::new(1.0, 2.0), 1e-12));
        assert!(a.divide(&Complex::ZERO).is_err());
    }

    #[test]
    fn test_polar_round_trip() {
        let z = Complex::from_polar(2.0, FRAC_PI_2);
        assert!(z.approx_eq(&Complex::new(0.0, 2.0), 1e-12));
        let (r, theta) = z.to_polar();
        assert!((r - 2.0).abs() < 1e-12);
        assert!((theta - FRAC_PI_2).abs() < 1e-12);
        assert!((Complex::new(-1.0, 0.0).phase() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Complex::new(0.5, -0.25)), "0.5000-0.2500i");
        assert_eq!(format!("{:.1}", Complex::new(1.0, 2.0)), "1.0+2.0i");
    }
}
