use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn bin() -> String {
    // Cargo sets this for bin targets in integration tests
    env!("CARGO_BIN_EXE_titan").to_string()
}

/// Run with an explicit (empty) config so a user's ~/.titan/config.toml
/// cannot change the output.
fn run(dir: &Path, args: &[&str]) -> Output {
    let cfg = dir.join("config.toml");
    if !cfg.exists() {
        fs::write(&cfg, "").unwrap();
    }
    Command::new(bin())
        .arg("--config")
        .arg(cfg.to_str().unwrap())
        .args(args)
        .output()
        .expect("run")
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).into_owned()
}

#[test]
fn cli_circuit_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flip.json");
    fs::write(&input, r#"{"num_qubits": 1, "gates": [{"type": "x", "qubits": [0]}]}"#).unwrap();

    let output = run(dir.path(), &["circuit", input.to_str().unwrap(), "--shots", "0", "--json"]);
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    insta::assert_snapshot!(stdout(&output).trim_end(), @r#"
    {
      "num_qubits": 1,
      "amplitudes": [
        {
          "re": 0.0,
          "im": 0.0
        },
        {
          "re": 1.0,
          "im": 0.0
        }
      ],
      "probabilities": [
        0.0,
        1.0
      ],
      "bloch": {
        "theta": 3.141592653589793,
        "phi": 0.0
      },
      "shots": 0,
      "counts": {}
    }
    "#);
}

#[test]
fn cli_circuit_toml_bell_counts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bell.toml");
    fs::write(
        &input,
        "num_qubits = 2\n\n[[gates]]\ntype = \"h\"\nqubits = [0]\n\n[[gates]]\ntype = \"cnot\"\nqubits = [0, 1]\n",
    )
    .unwrap();

    let output = run(dir.path(), &["circuit", input.to_str().unwrap(), "--shots", "400", "--seed", "3"]);
    assert!(output.status.success(), "stderr:\n{}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("Counts"));
    assert!(text.contains("00:"));
    assert!(!text.contains("01:") && !text.contains("10:"));
}

#[test]
fn cli_circuit_rejects_bad_qubit() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{"num_qubits": 1, "gates": [{"type": "h", "qubits": [4]}]}"#).unwrap();

    let output = run(dir.path(), &["circuit", input.to_str().unwrap()]);
    assert!(!output.status.success(), "unexpected success");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "stderr:\n{stderr}");
}

#[test]
fn cli_train_json_loss_decreases() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["train", "--optimizer", "sgd", "--steps", "50", "--lr", "0.05", "--seed", "1", "--json"],
    );
    assert!(output.status.success(), "stderr:\n{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["optimizer"], "sgd");
    assert_eq!(report["trace"].as_array().unwrap().len(), 50);
    let first = report["trace"][0]["loss"].as_f64().unwrap();
    let last = report["final_loss"].as_f64().unwrap();
    assert!(last < first, "{first} -> {last}");
}

#[test]
fn cli_stats_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("values.txt");
    fs::write(&data, "2, 4, 4\n4 5 5\n7 9\n").unwrap();

    let output = run(dir.path(), &["stats", "--file", data.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "stderr:\n{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["count"], 8);
    assert_eq!(report["mean"].as_f64(), Some(5.0));
    assert_eq!(report["std_dev"].as_f64(), Some(2.0));
}

#[test]
fn cli_stats_requires_values() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["stats"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no values"));
}
