//! Probability errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbabilityError {
    #[error("Dimension mismatch: {domain} domain elements but {weights} weights")]
    DimensionMismatch { domain: usize, weights: usize },

    #[error("Domain mismatch: distributions are defined over different domains")]
    DomainMismatch,

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, ProbabilityError>;
