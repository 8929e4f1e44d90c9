//! `titan circuit`: run a gate sequence file on the state-vector simulator.
//!
//! Examples:
//!   titan circuit bell.json --shots 2000 --seed 7
//!   titan circuit rotate.toml --json

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::config::TitanConfig;
use crate::core::titan::{
    bloch::BlochAngles,
    circuit::Circuit,
    complex::Complex,
    quantum_state::QuantumState,
};

#[derive(Debug, Serialize)]
pub struct CircuitReport {
    pub num_qubits: usize,
    pub amplitudes: Vec<Complex>,
    pub probabilities: Vec<f64>,
    pub bloch: Option<BlochAngles>,
    pub shots: usize,
    /// Outcome bitstring (qubit n-1 leftmost) -> count.
    pub counts: BTreeMap<String, usize>,
}

pub fn load_circuit(path: &Path) -> Result<Circuit> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Read circuit {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let circuit = match ext.as_deref() {
        Some("json") => Circuit::from_json_str(&src),
        Some("toml") => Circuit::from_toml_str(&src),
        other => bail!(
            "unsupported circuit format: {} (expected .json or .toml)",
            other.unwrap_or("<none>")
        ),
    };
    circuit.with_context(|| format!("Parse circuit {}", path.display()))
}

pub fn bitstring(index: usize, width: usize) -> String {
    format!("{index:0width$b}")
}

pub fn build_report(circuit: &Circuit, shots: usize, seed: Option<u64>) -> Result<CircuitReport> {
    let state: QuantumState = circuit.run().context("circuit execution failed")?;
    let bloch = if state.num_qubits() == 1 { Some(state.bloch_angles()?) } else { None };

    let mut rng = super::make_rng(seed);
    let counts = state
        .sample_counts(&mut rng, shots)
        .into_iter()
        .map(|(k, v)| (bitstring(k, state.num_qubits()), v))
        .collect();

    Ok(CircuitReport {
        num_qubits: state.num_qubits(),
        amplitudes: state.amplitudes().to_vec(),
        probabilities: state.probabilities(),
        bloch,
        shots,
        counts,
    })
}

pub fn circuit_run(
    input: &Path,
    shots: Option<usize>,
    seed: Option<u64>,
    json: bool,
    cfg: &TitanConfig,
) -> Result<()> {
    let circuit = load_circuit(input)?;
    let report = build_report(&circuit, shots.unwrap_or(cfg.shots), seed.or(cfg.seed))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let prec = cfg.precision;
    println!(
        "{} {} ({} qubit(s), {} gate(s))",
        "Circuit".bold().cyan(),
        input.display(),
        report.num_qubits,
        circuit.gates.len()
    );
    println!("{}", "basis      amplitude                 probability".dimmed());
    for (i, (amp, p)) in report.amplitudes.iter().zip(&report.probabilities).enumerate() {
        println!(
            "|{}>  {:<24}  {:.*}",
            bitstring(i, report.num_qubits),
            format!("{amp:.prec$}"),
            prec,
            p
        );
    }
    if let Some(b) = report.bloch {
        let (x, y, z) = b.to_cartesian();
        println!(
            "{} theta={:.*} phi={:.*}  (x={:.*}, y={:.*}, z={:.*})",
            "Bloch".bold().magenta(),
            prec, b.theta, prec, b.phi, prec, x, prec, y, prec, z
        );
    }
    if report.shots > 0 {
        println!("{} ({} shots)", "Counts".bold().green(), report.shots);
        for (k, v) in &report.counts {
            println!("  {k}: {v}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::titan::circuit::{GateKind, GateOp};

    #[test]
    fn test_bitstring_pads() {
        assert_eq!(bitstring(1, 3), "001");
        assert_eq!(bitstring(6, 3), "110");
    }

    #[test]
    fn test_report_counts_cover_shots() {
        let mut c = Circuit::new(2);
        c.push(GateOp::new(GateKind::H, &[0])).push(GateOp::new(GateKind::Cnot, &[0, 1]));
        let r = build_report(&c, 500, Some(5)).unwrap();
        assert_eq!(r.counts.values().sum::<usize>(), 500);
        // a Bell pair never disagrees
        assert!(r.counts.keys().all(|k| k == "00" || k == "11"));
        assert!(r.bloch.is_none());
    }
}
