//! Lexicon errors

use pragma_probability::ProbabilityError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexiconError {
    #[error("Index out of range: {axis} {index} not in 0..{bound}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Probability(#[from] ProbabilityError),
}

pub type Result<T> = std::result::Result<T, LexiconError>;
