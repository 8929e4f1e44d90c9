//! Gate sequences as the visualisation layer sends them:
//! `[{ "type": "h", "qubits": [0] }, { "type": "rx", "qubits": [1], "params": [0.5] }]`.

use crate::core::error::{Result, TitanError};
use crate::core::titan::quantum_gates::{self, Gate};
use crate::core::titan::quantum_state::QuantumState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    Rx,
    Ry,
    Rz,
    Cnot,
    Cz,
    Swap,
}

impl GateKind {
    fn arity(self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Cz | GateKind::Swap => 2,
            _ => 1,
        }
    }

    fn param_count(self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    #[serde(rename = "type")]
    pub kind: GateKind,
    pub qubits: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl GateOp {
    pub fn new(kind: GateKind, qubits: &[usize]) -> Self {
        GateOp { kind, qubits: qubits.to_vec(), params: Vec::new() }
    }

    pub fn with_param(mut self, value: f64) -> Self {
        self.params.push(value);
        self
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.qubits.len() != self.kind.arity() {
            return Err(TitanError::invalid(format!(
                "gate #{index} ({:?}) takes {} qubit(s), got {}",
                self.kind,
                self.kind.arity(),
                self.qubits.len()
            )));
        }
        if self.params.len() != self.kind.param_count() {
            return Err(TitanError::invalid(format!(
                "gate #{index} ({:?}) takes {} parameter(s), got {}",
                self.kind,
                self.kind.param_count(),
                self.params.len()
            )));
        }
        Ok(())
    }

    fn single_qubit_gate(&self) -> Option<Gate> {
        let theta = self.params.first().copied().unwrap_or_default();
        Some(match self.kind {
            GateKind::H => quantum_gates::hadamard(),
            GateKind::X => quantum_gates::pauli_x(),
            GateKind::Y => quantum_gates::pauli_y(),
            GateKind::Z => quantum_gates::pauli_z(),
            GateKind::S => quantum_gates::phase(),
            GateKind::T => quantum_gates::t(),
            GateKind::Rx => quantum_gates::rx(theta),
            GateKind::Ry => quantum_gates::ry(theta),
            GateKind::Rz => quantum_gates::rz(theta),
            GateKind::Cnot | GateKind::Cz | GateKind::Swap => return None,
        })
    }

    pub fn apply(&self, state: &mut QuantumState) -> Result<()> {
        if let Some(gate) = self.single_qubit_gate() {
            return state.apply_gate(&gate, self.qubits[0]);
        }
        let (a, b) = (self.qubits[0], self.qubits[1]);
        match self.kind {
            GateKind::Cnot => state.apply_cnot(a, b),
            GateKind::Cz => state.apply_cz(a, b),
            _ => state.apply_swap(a, b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub num_qubits: usize,
    #[serde(default)]
    pub gates: Vec<GateOp>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Circuit { num_qubits, gates: Vec::new() }
    }

    pub fn push(&mut self, op: GateOp) -> &mut Self {
        self.gates.push(op);
        self
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(|e| TitanError::invalid(format!("circuit JSON: {e}")))
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(|e| TitanError::invalid(format!("circuit TOML: {e}")))
    }

    /// Check every op before touching a state.
    pub fn validate(&self) -> Result<()> {
        for (i, op) in self.gates.iter().enumerate() {
            op.validate(i)?;
            if let Some(&q) = op.qubits.iter().find(|&&q| q >= self.num_qubits) {
                return Err(TitanError::QubitOutOfRange { qubit: q, num_qubits: self.num_qubits });
            }
        }
        Ok(())
    }

    /// Apply every op to `state` in order.
    pub fn apply(&self, state: &mut QuantumState) -> Result<()> {
        self.validate()?;
        for op in &self.gates {
            op.apply(state)?;
        }
        Ok(())
    }

    /// Run on a fresh |0…0⟩ register.
    pub fn run(&self) -> Result<QuantumState> {
        let mut state = QuantumState::new(self.num_qubits)?;
        self.apply(&mut state)?;
        crate::debug_log!("circuit: {} gate(s) on {} qubit(s)", self.gates.len(), self.num_qubits);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    #[test]
    fn test_bell_from_json() {
        let c = Circuit::from_json_str(
            r#"{"num_qubits": 2, "gates": [{"type": "h", "qubits": [0]}, {"type": "cnot", "qubits": [0, 1]}]}"#,
        )
        .unwrap();
        let s = c.run().unwrap();
        let p = s.probabilities();
        assert!((p[0] - 0.5).abs() < 1e-12 && (p[3] - 0.5).abs() < 1e-12);
        assert!((s.amplitudes()[3].re - FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_from_toml() {
        let c = Circuit::from_toml_str(
            "num_qubits = 1\n\n[[gates]]\ntype = \"rx\"\nqubits = [0]\nparams = [3.141592653589793]\n",
        )
        .unwrap();
        assert_eq!(c.gates[0], GateOp::new(GateKind::Rx, &[0]).with_param(PI));
        let s = c.run().unwrap();
        assert!((s.probabilities()[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        let mut c = Circuit::new(2);
        c.push(GateOp::new(GateKind::Cnot, &[0]));
        assert!(c.run().is_err());

        let mut c = Circuit::new(2);
        c.push(GateOp::new(GateKind::Ry, &[0]));
        assert!(c.run().is_err());

        let mut c = Circuit::new(2);
        c.push(GateOp::new(GateKind::H, &[0])).push(GateOp::new(GateKind::X, &[2]));
        assert_eq!(c.run(), Err(TitanError::QubitOutOfRange { qubit: 2, num_qubits: 2 }));

        assert!(Circuit::from_json_str(r#"{"num_qubits": 1, "gates": [{"type": "toffoli", "qubits": [0]}]}"#).is_err());
    }

    #[test]
    fn test_extra_params_are_rejected() {
        let h = Circuit::from_json_str(r#"{"num_qubits": 1, "gates": [{"type": "h", "qubits": [0], "params": [1.0]}]}"#).unwrap();
        assert!(matches!(h.run(), Err(TitanError::InvalidArgument(_))));

        let mut c = Circuit::new(1);
        c.push(GateOp::new(GateKind::Rx, &[0]).with_param(0.5).with_param(0.25));
        assert!(c.run().is_err());
    }

    #[test]
    fn test_serializes_with_type_field() {
        let op = GateOp::new(GateKind::H, &[1]);
        assert_eq!(serde_json::to_string(&op).unwrap(), r#"{"type":"h","qubits":[1]}"#);
    }
}
