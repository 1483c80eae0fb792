//! Structured lexicon
//!
//! Cell values are not assigned freely: each signal and each referent
//! carries a bit-vector feature representation, and
//! `data[i][j] = mapping(vocabulary[i], context[j])`, optionally binarized
//! with a threshold (value >= threshold -> 1.0, else 0.0).
//!
//! Mapping labels name what is computed. `Hamming` counts positional
//! mismatches; `EditDistance` is a Levenshtein alignment over the bits.
//! Both are normalized by the representation length.

use crate::error::{LexiconError, Result};
use crate::lexicon::Lexicon;
use crate::pragmatics::PragmaticModel;
use pragma_core::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use tracing::debug;

/// Binary feature vector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Representation(Vec<bool>);

impl Representation {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Each bit a fair coin
    pub fn random(length: usize, rng: &mut RandomSource) -> Self {
        Self((0..length).map(|_| rng.coin()).collect())
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flip each bit independently with probability `change_rate`
    pub fn mutated(&self, change_rate: f64, rng: &mut RandomSource) -> Self {
        Self(
            self.0
                .iter()
                .map(|b| if rng.chance(change_rate) { !b } else { *b })
                .collect(),
        )
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Parses strings of `0` and `1`.
impl FromStr for Representation {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(LexiconError::MalformedInput(format!(
                    "invalid bit '{other}' in representation \"{s}\""
                ))),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Self)
    }
}

/// Positional mismatch count
pub fn hamming_distance(a: &[bool], b: &[bool]) -> usize {
    let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count();
    mismatches + a.len().abs_diff(b.len())
}

/// Levenshtein distance (unit insert/delete/substitute costs)
pub fn edit_distance(a: &[bool], b: &[bool]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Named similarity/distance between two representations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingFunction {
    /// Levenshtein distance / length
    EditDistance,
    /// Mismatching positions / length
    #[default]
    Hamming,
    /// 1 - Hamming
    HammingSimilarity,
}

impl MappingFunction {
    pub fn name(&self) -> &'static str {
        match self {
            MappingFunction::EditDistance => "edit-distance",
            MappingFunction::Hamming => "hamming",
            MappingFunction::HammingSimilarity => "hamming-similarity",
        }
    }

    pub fn apply(&self, a: &Representation, b: &Representation) -> f64 {
        let length = a.len().max(b.len());
        if length == 0 {
            return match self {
                MappingFunction::HammingSimilarity => 1.0,
                _ => 0.0,
            };
        }

        let length = length as f64;
        match self {
            MappingFunction::EditDistance => edit_distance(a.bits(), b.bits()) as f64 / length,
            MappingFunction::Hamming => hamming_distance(a.bits(), b.bits()) as f64 / length,
            MappingFunction::HammingSimilarity => {
                1.0 - hamming_distance(a.bits(), b.bits()) as f64 / length
            }
        }
    }
}

impl fmt::Display for MappingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingFunction {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "edit-distance" | "edit" | "levenshtein" => Ok(MappingFunction::EditDistance),
            "hamming" => Ok(MappingFunction::Hamming),
            "hamming-similarity" => Ok(MappingFunction::HammingSimilarity),
            _ => Err(LexiconError::MalformedInput(format!(
                "unknown mapping function: {s}"
            ))),
        }
    }
}

/// Lexicon derived from feature representations
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredLexicon {
    /// Derived cells
    lexicon: Lexicon,

    /// One representation per signal
    vocabulary_representations: Vec<Representation>,

    /// One representation per referent
    context_representations: Vec<Representation>,

    /// Common length of every representation
    representation_length: usize,

    mapping: MappingFunction,

    /// Binarization threshold, if any
    threshold: Option<f64>,
}

impl StructuredLexicon {
    /// Build from caller-supplied representations.
    ///
    /// Every representation must have the same length.
    pub fn from_representations(
        vocabulary_representations: Vec<Representation>,
        context_representations: Vec<Representation>,
        mapping: MappingFunction,
        threshold: Option<f64>,
    ) -> Result<Self> {
        let representation_length = vocabulary_representations
            .first()
            .or(context_representations.first())
            .map_or(0, Representation::len);

        if let Some(bad) = vocabulary_representations
            .iter()
            .chain(&context_representations)
            .find(|r| r.len() != representation_length)
        {
            return Err(LexiconError::DimensionMismatch(format!(
                "representation {bad} has length {}, expected {representation_length}",
                bad.len()
            )));
        }

        Ok(Self::build(
            vocabulary_representations,
            context_representations,
            representation_length,
            mapping,
            threshold,
        ))
    }

    fn build(
        vocabulary_representations: Vec<Representation>,
        context_representations: Vec<Representation>,
        representation_length: usize,
        mapping: MappingFunction,
        threshold: Option<f64>,
    ) -> Self {
        let vocabulary_size = vocabulary_representations.len();
        let context_size = context_representations.len();

        let mut data = Vec::with_capacity(vocabulary_size * context_size);
        for signal in &vocabulary_representations {
            for referent in &context_representations {
                let value = mapping.apply(signal, referent);
                data.push(match threshold {
                    Some(t) if value >= t => 1.0,
                    Some(_) => 0.0,
                    None => value,
                });
            }
        }

        Self {
            lexicon: Lexicon::from_parts(vocabulary_size, context_size, data),
            vocabulary_representations,
            context_representations,
            representation_length,
            mapping,
            threshold,
        }
    }

    fn random_representations(
        count: usize,
        length: usize,
        rng: &mut RandomSource,
    ) -> Vec<Representation> {
        (0..count).map(|_| Representation::random(length, rng)).collect()
    }

    /// Random representations, graded cells
    pub fn generate_graded(
        representation_length: usize,
        vocabulary_size: usize,
        context_size: usize,
        mapping: MappingFunction,
        rng: &mut RandomSource,
    ) -> Self {
        Self::generate(
            representation_length,
            vocabulary_size,
            context_size,
            mapping,
            None,
            rng,
        )
    }

    /// Random representations, cells binarized at `threshold`
    pub fn generate_binary(
        representation_length: usize,
        vocabulary_size: usize,
        context_size: usize,
        mapping: MappingFunction,
        threshold: f64,
        rng: &mut RandomSource,
    ) -> Self {
        Self::generate(
            representation_length,
            vocabulary_size,
            context_size,
            mapping,
            Some(threshold),
            rng,
        )
    }

    fn generate(
        representation_length: usize,
        vocabulary_size: usize,
        context_size: usize,
        mapping: MappingFunction,
        threshold: Option<f64>,
        rng: &mut RandomSource,
    ) -> Self {
        let vocabulary = Self::random_representations(vocabulary_size, representation_length, rng);
        let context = Self::random_representations(context_size, representation_length, rng);
        debug!(
            "Generated structured {}x{} lexicon ({} bits, {}, threshold {:?})",
            vocabulary_size, context_size, representation_length, mapping, threshold
        );
        Self::build(vocabulary, context, representation_length, mapping, threshold)
    }

    /// Flip each bit of each representation with probability `change_rate`
    pub fn mutate_representations(
        representations: &[Representation],
        change_rate: f64,
        rng: &mut RandomSource,
    ) -> Vec<Representation> {
        representations
            .iter()
            .map(|r| r.mutated(change_rate, rng))
            .collect()
    }

    /// Mutate the vocabulary representations and recompute every cell.
    /// Context representations are kept.
    pub fn with_mutated_vocabulary(&self, change_rate: f64, rng: &mut RandomSource) -> Self {
        let vocabulary =
            Self::mutate_representations(&self.vocabulary_representations, change_rate, rng);
        let model = self.lexicon.model();
        let mut rebuilt = Self::build(
            vocabulary,
            self.context_representations.clone(),
            self.representation_length,
            self.mapping,
            self.threshold,
        );
        rebuilt.lexicon = rebuilt.lexicon.with_model(model);
        rebuilt
    }

    pub fn with_model(mut self, model: PragmaticModel) -> Self {
        self.lexicon = self.lexicon.with_model(model);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Drop the representations, keep the cells
    pub fn into_lexicon(self) -> Lexicon {
        self.lexicon
    }

    pub fn vocabulary_representations(&self) -> &[Representation] {
        &self.vocabulary_representations
    }

    pub fn context_representations(&self) -> &[Representation] {
        &self.context_representations
    }

    pub fn representation_length(&self) -> usize {
        self.representation_length
    }

    pub fn mapping(&self) -> MappingFunction {
        self.mapping
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }
}

impl AsRef<Lexicon> for StructuredLexicon {
    fn as_ref(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl Deref for StructuredLexicon {
    type Target = Lexicon;

    fn deref(&self) -> &Lexicon {
        &self.lexicon
    }
}
