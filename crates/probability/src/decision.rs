//! Decision rules: how an agent turns a distribution into one choice.

use crate::distribution::Distribution;
use crate::error::ProbabilityError;
use pragma_core::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DecisionRule {
    /// Draw proportionally to the weights
    Sample,
    /// Deterministic maximum, random tie-break
    #[default]
    ArgMax,
    /// Softmax with inverse temperature `beta`
    SoftArgMax { beta: f64 },
}

impl DecisionRule {
    pub fn choose_index<A>(&self, dist: &Distribution<A>, rng: &mut RandomSource) -> Option<usize> {
        match self {
            DecisionRule::Sample => dist.sample_index(rng),
            DecisionRule::ArgMax => dist.arg_max_index(rng),
            DecisionRule::SoftArgMax { beta } => dist.soft_arg_max_index(*beta, rng),
        }
    }

    pub fn choose<'a, A>(&self, dist: &'a Distribution<A>, rng: &mut RandomSource) -> Option<&'a A> {
        self.choose_index(dist, rng).map(|i| &dist.domain()[i])
    }
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionRule::Sample => write!(f, "sample"),
            DecisionRule::ArgMax => write!(f, "argmax"),
            DecisionRule::SoftArgMax { beta } => write!(f, "soft:{beta}"),
        }
    }
}

/// Parses `sample`, `argmax`, or `soft:<beta>`.
impl FromStr for DecisionRule {
    type Err = ProbabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sample" => Ok(DecisionRule::Sample),
            "argmax" | "arg_max" => Ok(DecisionRule::ArgMax),
            other => {
                let beta = other
                    .strip_prefix("soft:")
                    .and_then(|b| b.parse::<f64>().ok())
                    .ok_or_else(|| {
                        ProbabilityError::MalformedInput(format!("unknown decision rule: {s}"))
                    })?;
                Ok(DecisionRule::SoftArgMax { beta })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("sample".parse::<DecisionRule>().unwrap(), DecisionRule::Sample);
        assert_eq!("ArgMax".parse::<DecisionRule>().unwrap(), DecisionRule::ArgMax);
        assert_eq!(
            "soft:2.5".parse::<DecisionRule>().unwrap(),
            DecisionRule::SoftArgMax { beta: 2.5 }
        );
        assert!("soft:".parse::<DecisionRule>().is_err());
        assert!("greedy".parse::<DecisionRule>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let rule = DecisionRule::SoftArgMax { beta: 4.0 };
        assert_eq!(rule.to_string().parse::<DecisionRule>().unwrap(), rule);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&DecisionRule::SoftArgMax { beta: 1.5 }).unwrap();
        assert_eq!(json, r#"{"rule":"soft_arg_max","beta":1.5}"#);
    }

    #[test]
    fn test_choose_argmax() {
        let dist = Distribution::new(vec!["x", "y"], vec![0.1, 0.9]).unwrap();
        let mut rng = RandomSource::new(0);
        assert_eq!(DecisionRule::ArgMax.choose(&dist, &mut rng), Some(&"y"));
        assert_eq!(DecisionRule::ArgMax.choose_index(&dist, &mut rng), Some(1));
    }
}
