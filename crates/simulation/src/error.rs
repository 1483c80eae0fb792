//! Simulation errors

use crate::config::ConfigError;
use pragma_lexicon::LexiconError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Incompatible agents: {0}")]
    IncompatibleAgents(String),

    #[error("No choice available: {0}")]
    NoChoice(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
