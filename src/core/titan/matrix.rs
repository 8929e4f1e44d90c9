//! Dense row-major matrices with value semantics.
//!
//! Arithmetic never mutates the receiver; every operation hands back a fresh
//! `Matrix`. Shape disagreements surface as `TitanError::DimensionMismatch`.
#![allow(clippy::needless_range_loop)]

use crate::core::error::{Result, TitanError};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight initialisation scheme for `Matrix::random`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Init {
    /// Uniform in [-1, 1).
    Uniform,
    /// Uniform in [-s, s], s = sqrt(2 / (rows + cols)).
    Xavier,
    /// Uniform in [-s, s], s = sqrt(2 / rows).
    He,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Wire form; goes through `Matrix::from_vec` so `data.len() == rows * cols`
/// holds for deserialized values too.
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = TitanError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Matrix::from_vec(raw.rows, raw.cols, raw.data)
    }
}

impl Matrix {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Matrix { rows, cols, data: vec![value; rows * cols] }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 1.0)
    }

    pub fn identity(size: usize) -> Self {
        let mut m = Self::zeros(size, size);
        for i in 0..size {
            m.data[i * size + i] = 1.0;
        }
        m
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(TitanError::invalid(format!(
                "{}x{} matrix needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                data.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(TitanError::invalid(format!(
                "ragged rows: row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }
        Ok(Matrix { rows: rows.len(), cols, data: rows.concat() })
    }

    /// A single row vector.
    pub fn row_vector(values: &[f64]) -> Self {
        Matrix { rows: 1, cols: values.len(), data: values.to_vec() }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize, init: Init) -> Self {
        let data = match init {
            Init::Uniform => {
                let dist = Uniform::new(-1.0, 1.0);
                (0..rows * cols).map(|_| dist.sample(rng)).collect()
            }
            Init::Xavier | Init::He => {
                let s = match init {
                    Init::Xavier => (2.0 / (rows + cols).max(1) as f64).sqrt(),
                    _ => (2.0 / rows.max(1) as f64).sqrt(),
                };
                let dist = Uniform::new_inclusive(-s, s);
                (0..rows * cols).map(|_| dist.sample(rng)).collect()
            }
        };
        Matrix { rows, cols, data }
    }

    pub fn xavier<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Self {
        Self::random(rng, rows, cols, Init::Xavier)
    }

    pub fn he<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Self {
        Self::random(rng, rows, cols, Init::He)
    }

    /// Gaussian entries N(mean, std²). Fails on a negative or non-finite `std`.
    pub fn random_normal<R: Rng + ?Sized>(
        rng: &mut R,
        rows: usize,
        cols: usize,
        mean: f64,
        std: f64,
    ) -> Result<Self> {
        let dist = Normal::new(mean, std)
            .map_err(|e| TitanError::invalid(format!("normal distribution: {e}")))?;
        Ok(Matrix { rows, cols, data: (0..rows * cols).map(|_| dist.sample(rng)).collect() })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, r: usize, c: usize) -> Option<f64> {
        (r < self.rows && c < self.cols).then(|| self.data[r * self.cols + c])
    }

    pub fn set(&mut self, r: usize, c: usize, value: f64) -> Result<()> {
        if r >= self.rows || c >= self.cols {
            return Err(TitanError::invalid(format!(
                "index ({r}, {c}) outside {}x{} matrix",
                self.rows, self.cols
            )));
        }
        self.data[r * self.cols + c] = value;
        Ok(())
    }

    pub fn row(&self, r: usize) -> Option<&[f64]> {
        (r < self.rows).then(|| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    pub fn column(&self, c: usize) -> Option<Vec<f64>> {
        (c < self.cols).then(|| (0..self.rows).map(|r| self.data[r * self.cols + c]).collect())
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.cols).map(move |c| (0..self.rows).map(|r| self.data[r * self.cols + c]).collect())
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }

    fn check_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(TitanError::DimensionMismatch { op, left: self.shape(), right: other.shape() });
        }
        Ok(())
    }

    pub fn map<F: FnMut(f64) -> f64>(&self, mut f: F) -> Matrix {
        Matrix { rows: self.rows, cols: self.cols, data: self.data.iter().map(|&x| f(x)).collect() }
    }

    /// Elementwise combination of two equally shaped matrices.
    pub fn zip_map<F: Fn(f64, f64) -> f64>(&self, other: &Matrix, op: &'static str, f: F) -> Result<Matrix> {
        self.check_same_shape(other, op)?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect(),
        })
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_map(other, "add", |a, b| a + b)
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_map(other, "subtract", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_map(other, "hadamard", |a, b| a * b)
    }

    pub fn scale(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    /// Matrix product `self × other`; requires `self.cols == other.rows`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(TitanError::DimensionMismatch {
                op: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut acc = 0.0;
                for k in 0..self.cols {
                    acc += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }
                out.data[i * other.cols + j] = acc;
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Sum of the diagonal up to `min(rows, cols)`.
    pub fn trace(&self) -> f64 {
        (0..self.rows.min(self.cols)).map(|i| self.data[i * self.cols + i]).sum()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Mean of all entries; 0 for an empty matrix.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            0.0
        } else {
            self.sum() / self.data.len() as f64
        }
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> Result<f64> {
        if self.rows != self.cols {
            return Err(TitanError::DimensionMismatch {
                op: "determinant",
                left: self.shape(),
                right: (self.cols, self.rows),
            });
        }
        Ok(det_rows(&self.to_rows()))
    }

    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(&other.data).all(|(a, b)| (a - b).abs() <= tol)
    }
}

fn det_rows(m: &[Vec<f64>]) -> f64 {
    match m.len() {
        0 => 1.0,
        1 => m[0][0],
        2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
        _ => m[0]
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let minor: Vec<Vec<f64>> = m
                    .iter()
                    .skip(1)
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|&(col, _)| col != j)
                            .map(|(_, &v)| v)
                            .collect()
                    })
                    .collect();
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * value * det_rows(&minor)
            })
            .sum(),
    }
}

/// Dot product of two equally long vectors.
pub fn dot_product(v1: &[f64], v2: &[f64]) -> Result<f64> {
    if v1.len() != v2.len() {
        return Err(TitanError::lengths("dot_product", v1.len(), v2.len()));
    }
    Ok(v1.iter().zip(v2).map(|(a, b)| a * b).sum())
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(4);
        for row in self.iter_rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>10.*}", prec, v)).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
