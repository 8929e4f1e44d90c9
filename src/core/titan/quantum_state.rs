//! State-vector simulator.
//!
//! A register of `n` qubits is `2^n` complex amplitudes indexed by the basis
//! state; bit `q` of the index is qubit `q`. Gates act in place. Nothing is
//! renormalised automatically; call `normalize` after long gate sequences if
//! drift matters.

use crate::core::error::{Result, TitanError};
use crate::core::titan::bloch::BlochAngles;
use crate::core::titan::complex::Complex;
use crate::core::titan::quantum_gates::{self, Gate};
use rand::Rng;
use std::collections::BTreeMap;

pub const MAX_QUBITS: usize = 20;
const EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    num_qubits: usize,
    amplitudes: Vec<Complex>,
}

impl QuantumState {
    /// |0…0⟩ on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(TitanError::invalid(format!(
                "qubit count must be in 1..={MAX_QUBITS}, got {num_qubits}"
            )));
        }
        let mut amplitudes = vec![Complex::ZERO; 1usize << num_qubits];
        amplitudes[0] = Complex::ONE;
        Ok(QuantumState { num_qubits, amplitudes })
    }

    /// Adopt raw amplitudes; the length must be exactly `2^num_qubits`.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex>) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(TitanError::invalid(format!(
                "qubit count must be in 1..={MAX_QUBITS}, got {num_qubits}"
            )));
        }
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(TitanError::lengths("from_amplitudes", expected, amplitudes.len()));
        }
        Ok(QuantumState { num_qubits, amplitudes })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(TitanError::QubitOutOfRange { qubit, num_qubits: self.num_qubits });
        }
        Ok(())
    }

    fn check_pair(&self, control: usize, target: usize) -> Result<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(TitanError::invalid(format!(
                "control and target must differ (both {control})"
            )));
        }
        Ok(())
    }

    /// Apply a single-qubit gate. Amplitudes are paired across bit `qubit`:
    /// within each block of `2·step` indices, `i+j` (bit clear) pairs with
    /// `i+j+step` (bit set).
    pub fn apply_gate(&mut self, gate: &Gate, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let step = 1usize << qubit;
        let mut block = 0;
        while block < self.amplitudes.len() {
            for j in 0..step {
                let i0 = block + j;
                let i1 = i0 + step;
                let (n0, n1) = gate.apply_pair(self.amplitudes[i0], self.amplitudes[i1]);
                self.amplitudes[i0] = n0;
                self.amplitudes[i1] = n1;
            }
            block += step << 1;
        }
        Ok(())
    }

    /// Apply `gate` to `target` on the subspace where `control` is 1.
    pub fn apply_controlled(&mut self, gate: &Gate, control: usize, target: usize) -> Result<()> {
        self.check_pair(control, target)?;
        let (cbit, tbit) = (1usize << control, 1usize << target);
        for i in 0..self.amplitudes.len() {
            if i & cbit != 0 && i & tbit == 0 {
                let j = i | tbit;
                let (n0, n1) = gate.apply_pair(self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = n0;
                self.amplitudes[j] = n1;
            }
        }
        Ok(())
    }

    /// CNOT: swap `i` and `i ^ (1 << target)` wherever bit `control` is set,
    /// once per pair.
    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_pair(control, target)?;
        for i in 0..self.amplitudes.len() {
            if (i >> control) & 1 == 1 {
                let j = i ^ (1usize << target);
                if j > i {
                    self.amplitudes.swap(i, j);
                }
            }
        }
        Ok(())
    }

    /// Controlled-Z: negate amplitudes where both bits are set.
    pub fn apply_cz(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_pair(control, target)?;
        let mask = (1usize << control) | (1usize << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
        Ok(())
    }

    pub fn apply_swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_pair(a, b)?;
        for i in 0..self.amplitudes.len() {
            let (ba, bb) = ((i >> a) & 1, (i >> b) & 1);
            if ba == 1 && bb == 0 {
                let j = i ^ (1usize << a) ^ (1usize << b);
                self.amplitudes.swap(i, j);
            }
        }
        Ok(())
    }

    /// Born-rule probabilities, one per basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex::norm_sqr).collect()
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex::norm_sqr).sum()
    }

    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.norm_sqr().sqrt();
        if norm < EPS {
            return Err(TitanError::invalid("cannot normalize a zero state"));
        }
        for amp in &mut self.amplitudes {
            *amp = amp.scale(1.0 / norm);
        }
        Ok(())
    }

    /// Probability that `qubit` reads 1.
    pub fn probability_of_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let bit = 1usize << qubit;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & bit != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Full measurement. One uniform draw in [0, 1); the first basis index whose
    /// cumulative probability exceeds it is the outcome, and the state collapses
    /// onto that basis vector.
    pub fn measure<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut outcome = None;
        let mut last_nonzero = 0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p > 0.0 {
                last_nonzero = i;
            }
            cumulative += p;
            if cumulative > draw {
                outcome = Some(i);
                break;
            }
        }
        // rounding can leave the total mass a hair below the draw
        let outcome = outcome.unwrap_or(last_nonzero);
        crate::debug_log!("measure: draw={draw:.6} outcome={outcome:0width$b}", width = self.num_qubits);
        self.collapse_to(outcome);
        outcome
    }

    fn collapse_to(&mut self, index: usize) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp = if i == index { Complex::ONE } else { Complex::ZERO };
        }
    }

    /// Measure one qubit, collapsing only that qubit and renormalising the rest.
    pub fn measure_qubit<R: Rng + ?Sized>(&mut self, rng: &mut R, qubit: usize) -> Result<u8> {
        let p1 = self.probability_of_one(qubit)?;
        let bit = 1usize << qubit;
        let outcome: u8 = if rng.gen::<f64>() < p1 { 1 } else { 0 };
        let kept = if outcome == 1 { p1 } else { 1.0 - p1 };
        let scale = if kept > EPS { 1.0 / kept.sqrt() } else { 0.0 };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let set = i & bit != 0;
            *amp = if set == (outcome == 1) { amp.scale(scale) } else { Complex::ZERO };
        }
        crate::debug_log!("measure_qubit: q{qubit} -> {outcome} (p1={p1:.6})");
        Ok(outcome)
    }

    /// Histogram of `shots` full measurements, each on a copy of the current
    /// state. `self` is left untouched.
    pub fn sample_counts<R: Rng + ?Sized>(&self, rng: &mut R, shots: usize) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let mut copy = self.clone();
            *counts.entry(copy.measure(rng)).or_insert(0) += 1;
        }
        counts
    }

    /// |⟨self|other⟩|²
    pub fn fidelity(&self, other: &QuantumState) -> Result<f64> {
        if self.len() != other.len() {
            return Err(TitanError::lengths("fidelity", self.len(), other.len()));
        }
        let inner = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .fold(Complex::ZERO, |acc, (a, b)| acc + a.conj() * *b);
        Ok(inner.norm_sqr())
    }

    /// Bloch-sphere angles; only defined for a single qubit.
    pub fn bloch_angles(&self) -> Result<BlochAngles> {
        if self.num_qubits != 1 {
            return Err(TitanError::invalid(format!(
                "Bloch angles need a single qubit, state has {}",
                self.num_qubits
            )));
        }
        Ok(BlochAngles::from_amplitudes(self.amplitudes[0], self.amplitudes[1]))
    }

    // Convenience wrappers for the fixed gate set.
    pub fn h(&mut self, qubit: usize) -> Result<()> {
        self.apply_gate(&quantum_gates::hadamard(), qubit)
    }

    pub fn x(&mut self, qubit: usize) -> Result<()> {
        self.apply_gate(&quantum_gates::pauli_x(), qubit)
    }
}
