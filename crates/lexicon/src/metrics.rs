//! Asymmetry and ambiguity metrics

use crate::error::{LexiconError, Result};
use crate::lexicon::Lexicon;

impl Lexicon {
    /// Fraction of cell positions where `|a - b| > similarity`.
    ///
    /// Both lexicons must have the same shape. An empty lexicon has asymmetry 0.
    pub fn asymmetry_with(&self, other: &Lexicon, similarity: f64) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(LexiconError::DimensionMismatch(format!(
                "{:?} lexicon compared with {:?} lexicon",
                self.shape(),
                other.shape()
            )));
        }
        if self.data().is_empty() {
            return Ok(0.0);
        }

        let differing = self
            .data()
            .iter()
            .zip(other.data())
            .filter(|(a, b)| (*a - *b).abs() > similarity)
            .count();
        Ok(differing as f64 / self.data().len() as f64)
    }

    /// Per-signal count of referents with weight >= `threshold`
    pub fn ambiguity_per_signal(&self, threshold: f64) -> Vec<usize> {
        self.rows()
            .map(|row| row.iter().filter(|v| **v >= threshold).count())
            .collect()
    }

    /// Qualifying cells (weight >= `threshold`) over total cells.
    pub fn mean_ambiguity(&self, threshold: f64) -> f64 {
        if self.data().is_empty() {
            return 0.0;
        }
        let qualifying = self.data().iter().filter(|v| **v >= threshold).count();
        qualifying as f64 / self.data().len() as f64
    }

    /// Mean and population variance of the per-signal ambiguity counts.
    pub fn mean_and_variance_ambiguity(&self, threshold: f64) -> (f64, f64) {
        let counts = self.ambiguity_per_signal(threshold);
        if counts.is_empty() {
            return (0.0, 0.0);
        }

        let n = counts.len() as f64;
        let mean = counts.iter().sum::<usize>() as f64 / n;
        let variance = counts
            .iter()
            .map(|c| {
                let d = *c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        (mean, variance)
    }

    /// Mean cell value
    pub fn density(&self) -> f64 {
        if self.data().is_empty() {
            return 0.0;
        }
        self.data().iter().sum::<f64>() / self.data().len() as f64
    }
}
