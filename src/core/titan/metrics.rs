//! Classification and regression metrics.
//!
//! Zero denominators are clamped to `EPSILON` instead of raising, so a model
//! that never predicts the positive class reports precision 0, not NaN.

use crate::core::error::{check_parallel, Result, TitanError};
use serde::Serialize;

const EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Binary labels: anything >= 0.5 counts as the positive class.
    pub fn from_labels(predicted: &[f64], actual: &[f64]) -> Result<Self> {
        check_parallel("confusion_matrix", predicted, actual)?;
        let mut cm = ConfusionMatrix::default();
        for (&p, &a) in predicted.iter().zip(actual) {
            match (p >= 0.5, a >= 0.5) {
                (true, true) => cm.tp += 1,
                (true, false) => cm.fp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fn_ += 1,
            }
        }
        Ok(cm)
    }

    pub fn from_scores(scores: &[f64], actual: &[f64], threshold: f64) -> Result<Self> {
        let predicted: Vec<f64> = scores
            .iter()
            .map(|&s| if s >= threshold { 1.0 } else { 0.0 })
            .collect();
        Self::from_labels(&predicted, actual)
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    pub fn accuracy(&self) -> f64 {
        (self.tp + self.tn) as f64 / (self.total() as f64).max(EPSILON)
    }

    pub fn precision(&self) -> f64 {
        self.tp as f64 / ((self.tp + self.fp) as f64).max(EPSILON)
    }

    pub fn recall(&self) -> f64 {
        self.tp as f64 / ((self.tp + self.fn_) as f64).max(EPSILON)
    }

    pub fn specificity(&self) -> f64 {
        self.tn as f64 / ((self.tn + self.fp) as f64).max(EPSILON)
    }

    pub fn f1_score(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        2.0 * p * r / (p + r).max(EPSILON)
    }
}

pub fn accuracy(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    Ok(ConfusionMatrix::from_labels(predicted, actual)?.accuracy())
}

pub fn precision(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    Ok(ConfusionMatrix::from_labels(predicted, actual)?.precision())
}

pub fn recall(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    Ok(ConfusionMatrix::from_labels(predicted, actual)?.recall())
}

pub fn f1_score(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    Ok(ConfusionMatrix::from_labels(predicted, actual)?.f1_score())
}

/// Area under the ROC curve by the trapezoid rule over score-sorted samples.
/// Tied scores are swept together. A NaN score is rejected.
pub fn roc_auc(scores: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("roc_auc", scores, actual)?;
    if let Some(i) = scores.iter().position(|s| s.is_nan()) {
        return Err(TitanError::invalid(format!("roc_auc: score #{i} is NaN")));
    }
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let positives = actual.iter().filter(|&&a| a >= 0.5).count() as f64;
    let negatives = actual.len() as f64 - positives;

    let (mut tp, mut fp) = (0.0, 0.0);
    let (mut prev_tpr, mut prev_fpr) = (0.0, 0.0);
    let mut auc = 0.0;
    let mut i = 0;
    while i < order.len() {
        let s = scores[order[i]];
        while i < order.len() && scores[order[i]] == s {
            if actual[order[i]] >= 0.5 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        let tpr = tp / positives.max(EPSILON);
        let fpr = fp / negatives.max(EPSILON);
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_tpr = tpr;
        prev_fpr = fpr;
    }
    Ok(auc)
}

/// Coefficient of determination. A constant target yields 0.
pub fn r2_score(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("r2_score", predicted, actual)?;
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = predicted.iter().zip(actual).map(|(p, a)| (a - p).powi(2)).sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Ok(0.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn rmse(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    crate::core::titan::loss::mse(predicted, actual).map(f64::sqrt)
}

/// Mean absolute percentage error, in percent. Zero targets are rejected.
pub fn mape(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_parallel("mape", predicted, actual)?;
    if actual.iter().any(|&a| a == 0.0) {
        return Err(TitanError::invalid("mape is undefined for zero targets"));
    }
    let sum: f64 = predicted.iter().zip(actual).map(|(p, a)| ((a - p) / a).abs()).sum();
    Ok(100.0 * sum / actual.len() as f64)
}
