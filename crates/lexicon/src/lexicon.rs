//! Lexicon - signal × referent association matrix
//!
//! Rows are signals (vocabulary), columns are referents (context). Values
//! are stored row-major in one flat vector. A lexicon is an immutable
//! value: every transformation returns a new instance.

use crate::error::{LexiconError, Result};
use crate::pragmatics::PragmaticModel;
use pragma_probability::Distribution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal × referent association matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLexicon")]
pub struct Lexicon {
    /// Number of signals (rows)
    vocabulary_size: usize,

    /// Number of referents (columns)
    context_size: usize,

    /// Row-major cells, length `vocabulary_size * context_size`
    data: Vec<f64>,

    /// Recursion family used by `set_order_as_speaker` / `set_order_as_listener`
    #[serde(default)]
    model: PragmaticModel,
}

/// Unchecked wire form; every deserialized lexicon goes through `Lexicon::new`.
#[derive(Deserialize)]
struct RawLexicon {
    vocabulary_size: usize,
    context_size: usize,
    data: Vec<f64>,
    #[serde(default)]
    model: PragmaticModel,
}

impl TryFrom<RawLexicon> for Lexicon {
    type Error = LexiconError;

    fn try_from(raw: RawLexicon) -> Result<Self> {
        Ok(Lexicon::new(raw.vocabulary_size, raw.context_size, raw.data)?.with_model(raw.model))
    }
}

/// `vocabulary_size * context_size`, or `MalformedInput` on overflow
pub(crate) fn cell_count(vocabulary_size: usize, context_size: usize) -> Result<usize> {
    vocabulary_size.checked_mul(context_size).ok_or_else(|| {
        LexiconError::MalformedInput(format!(
            "{vocabulary_size}x{context_size} lexicon is too large"
        ))
    })
}

impl Lexicon {
    /// Build a lexicon from row-major data.
    pub fn new(vocabulary_size: usize, context_size: usize, data: Vec<f64>) -> Result<Self> {
        let expected = cell_count(vocabulary_size, context_size)?;
        if data.len() != expected {
            return Err(LexiconError::MalformedInput(format!(
                "{vocabulary_size}x{context_size} lexicon needs {expected} cells, got {}",
                data.len()
            )));
        }

        Ok(Self {
            vocabulary_size,
            context_size,
            data,
            model: PragmaticModel::default(),
        })
    }

    /// All-zero lexicon
    pub fn zeros(vocabulary_size: usize, context_size: usize) -> Result<Self> {
        let cells = cell_count(vocabulary_size, context_size)?;
        Ok(Self {
            vocabulary_size,
            context_size,
            data: vec![0.0; cells],
            model: PragmaticModel::default(),
        })
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let vocabulary_size = rows.len();
        let context_size = rows.first().map_or(0, Vec::len);

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != context_size)
        {
            return Err(LexiconError::MalformedInput(format!(
                "row {i} has {} cells, expected {context_size}",
                row.len()
            )));
        }

        Self::new(vocabulary_size, context_size, rows.concat())
    }

    /// Same cells, different recursion family
    pub fn with_model(mut self, model: PragmaticModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> PragmaticModel {
        self.model
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn context_size(&self) -> usize {
        self.context_size
    }

    /// (vocabulary_size, context_size)
    pub fn shape(&self) -> (usize, usize) {
        (self.vocabulary_size, self.context_size)
    }

    /// Row-major cells
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn check_row(&self, i: usize) -> Result<()> {
        if i >= self.vocabulary_size {
            return Err(LexiconError::IndexOutOfRange {
                axis: "signal",
                index: i,
                bound: self.vocabulary_size,
            });
        }
        Ok(())
    }

    fn check_column(&self, j: usize) -> Result<()> {
        if j >= self.context_size {
            return Err(LexiconError::IndexOutOfRange {
                axis: "referent",
                index: j,
                bound: self.context_size,
            });
        }
        Ok(())
    }

    pub(crate) fn from_parts(vocabulary_size: usize, context_size: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), vocabulary_size * context_size);
        Self {
            vocabulary_size,
            context_size,
            data,
            model: PragmaticModel::default(),
        }
    }

    pub(crate) fn same_cells(&self, data: Vec<f64>) -> Self {
        Self {
            vocabulary_size: self.vocabulary_size,
            context_size: self.context_size,
            data,
            model: self.model,
        }
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check_row(i)?;
        self.check_column(j)?;
        Ok(self.data[i * self.context_size + j])
    }

    /// Copy-on-write update: returns a new lexicon with cell (i, j) set to `value`.
    pub fn set(&self, i: usize, j: usize, value: f64) -> Result<Self> {
        self.check_row(i)?;
        self.check_column(j)?;
        let mut data = self.data.clone();
        data[i * self.context_size + j] = value;
        Ok(self.same_cells(data))
    }

    /// Borrowed view of row `i`
    pub fn row_slice(&self, i: usize) -> Result<&[f64]> {
        self.check_row(i)?;
        let start = i * self.context_size;
        Ok(&self.data[start..start + self.context_size])
    }

    pub fn row(&self, i: usize) -> Result<Vec<f64>> {
        self.row_slice(i).map(<[f64]>::to_vec)
    }

    /// Column `j`. Strided walk over the row-major data; avoid in hot loops,
    /// take a [`transpose`](Self::transpose) once instead.
    pub fn column(&self, j: usize) -> Result<Vec<f64>> {
        self.check_column(j)?;
        Ok((0..self.vocabulary_size)
            .map(|i| self.data[i * self.context_size + j])
            .collect())
    }

    /// Iterator over rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.vocabulary_size).map(move |i| {
            let start = i * self.context_size;
            &self.data[start..start + self.context_size]
        })
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.context_size];
        for row in self.rows() {
            for (sum, v) in sums.iter_mut().zip(row) {
                *sum += v;
            }
        }
        sums
    }

    /// Every referent is expressible: each column sum is strictly positive.
    pub fn is_consistent(&self) -> bool {
        self.column_sums().iter().all(|s| *s > 0.0)
    }

    /// Every cell is exactly 0.0 or 1.0
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|v| *v == 0.0 || *v == 1.0)
    }

    /// Divide each cell by its row sum; all-zero rows stay all-zero.
    pub fn normalize_rows(&self) -> Self {
        let sums = self.row_sums();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, v)| {
                let sum = sums[k / self.context_size];
                if sum == 0.0 {
                    0.0
                } else {
                    v / sum
                }
            })
            .collect();
        self.same_cells(data)
    }

    /// Divide each cell by its column sum; all-zero columns stay all-zero.
    pub fn normalize_columns(&self) -> Self {
        let sums = self.column_sums();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, v)| {
                let sum = sums[k % self.context_size];
                if sum == 0.0 {
                    0.0
                } else {
                    v / sum
                }
            })
            .collect();
        self.same_cells(data)
    }

    /// Referents × signals
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.context_size {
            for i in 0..self.vocabulary_size {
                data.push(self.data[i * self.context_size + j]);
            }
        }
        Self {
            vocabulary_size: self.context_size,
            context_size: self.vocabulary_size,
            data,
            model: self.model,
        }
    }

    /// Matrix × vector over referents: one weighted sum per signal.
    pub fn dot(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if vector.len() != self.context_size {
            return Err(LexiconError::DimensionMismatch(format!(
                "vector of length {} against {} referents",
                vector.len(),
                self.context_size
            )));
        }
        Ok(self
            .rows()
            .map(|row| row.iter().zip(vector).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Transposed matrix × vector over signals: one weighted sum per referent.
    pub fn dot_t(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if vector.len() != self.vocabulary_size {
            return Err(LexiconError::DimensionMismatch(format!(
                "vector of length {} against {} signals",
                vector.len(),
                self.vocabulary_size
            )));
        }
        let mut out = vec![0.0; self.context_size];
        for (row, w) in self.rows().zip(vector) {
            for (acc, v) in out.iter_mut().zip(row) {
                *acc += v * w;
            }
        }
        Ok(out)
    }

    /// Row `i` as a distribution over referent indices
    pub fn row_distribution(&self, i: usize) -> Result<Distribution<usize>> {
        Ok(Distribution::over_indices(self.row(i)?)?)
    }

    /// Column `j` as a distribution over signal indices
    pub fn column_distribution(&self, j: usize) -> Result<Distribution<usize>> {
        Ok(Distribution::over_indices(self.column(j)?)?)
    }
}

impl fmt::Display for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
            writeln!(f, "s{i:<3} [{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
