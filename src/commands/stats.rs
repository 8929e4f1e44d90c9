//! `titan stats`: descriptive statistics for a list of numbers.
//!
//! Examples:
//!   titan stats 1 2 3 4 5
//!   titan stats --file samples.txt

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::config::TitanConfig;
use crate::core::titan::{information, statistics};

const PERCENTILES: [f64; 4] = [5.0, 25.0, 75.0, 95.0];

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Vec<(f64, f64)>,
    /// Shannon entropy (bits) of the values read as unnormalised weights;
    /// only when every value is non-negative and the sum is positive.
    pub entropy_bits: Option<f64>,
}

/// Accepts whitespace and/or comma separated numbers.
pub fn parse_values(src: &str) -> Result<Vec<f64>> {
    src.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>().with_context(|| format!("not a number: {t:?}")))
        .collect()
}

pub fn summarize(values: &[f64]) -> Result<StatsReport> {
    if values.is_empty() {
        bail!("no values given");
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let percentiles = PERCENTILES
        .iter()
        .map(|&p| Ok((p, statistics::percentile(values, p)?)))
        .collect::<Result<Vec<_>>>()?;

    let total: f64 = values.iter().sum();
    let entropy_bits = if min >= 0.0 && total > 0.0 {
        let probs: Vec<f64> = values.iter().map(|v| v / total).collect();
        Some(information::entropy(&probs))
    } else {
        None
    };

    Ok(StatsReport {
        count: values.len(),
        mean: statistics::mean(values)?,
        variance: statistics::variance(values)?,
        std_dev: statistics::std_dev(values)?,
        median: statistics::median(values)?,
        min,
        max,
        percentiles,
        entropy_bits,
    })
}

pub fn stats_run(values: &[f64], file: Option<&Path>, json: bool, cfg: &TitanConfig) -> Result<()> {
    let owned;
    let values = match file {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("Read values {}", path.display()))?;
            owned = parse_values(&src).with_context(|| format!("In {}", path.display()))?;
            &owned[..]
        }
        None => values,
    };
    let report = summarize(values)?;
    crate::debug_log!("stats: {} value(s)", report.count);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let prec = cfg.precision;
    println!("{} ({} value(s))", "Statistics".bold().cyan(), report.count);
    println!("  mean      {:.*}", prec, report.mean);
    println!("  variance  {:.*}", prec, report.variance);
    println!("  std_dev   {:.*}", prec, report.std_dev);
    println!("  median    {:.*}", prec, report.median);
    println!("  min       {:.*}", prec, report.min);
    println!("  max       {:.*}", prec, report.max);
    for (p, v) in &report.percentiles {
        println!("  p{:<8} {:.*}", p, prec, v);
    }
    if let Some(h) = report.entropy_bits {
        println!("  {} {:.*} bits", "entropy".magenta(), prec, h);
    }
    Ok(())
}
