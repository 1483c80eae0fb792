//! Stateless probability helpers over plain numeric vectors.
//!
//! Used where no domain labelling is needed; [`Distribution`](crate::Distribution)
//! delegates to these for its own decision rules.

use crate::error::{ProbabilityError, Result};
use pragma_core::RandomSource;

/// Divide every weight by the total. A total `<= 0` returns the weights unchanged.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / total).collect()
}

/// Index of the maximum value, ties broken uniformly at random.
///
/// NaN entries never win. Returns `None` for an empty slice.
pub fn arg_max(values: &[f64], rng: &mut RandomSource) -> Option<usize> {
    if values.is_empty() {
        return None;
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == max)
        .map(|(i, _)| i)
        .collect();

    match ties.len() {
        // all NaN
        0 => Some(rng.below(values.len())),
        1 => Some(ties[0]),
        n => Some(ties[rng.below(n)]),
    }
}

/// `exp(beta * v_i) / sum_j exp(beta * v_j)`.
///
/// Overflow is not guarded: an infinite term turns the result into NaN,
/// which callers treat as "fall back to the hard maximum".
pub fn softmax(values: &[f64], beta: f64) -> Vec<f64> {
    let exps: Vec<f64> = values.iter().map(|v| (beta * v).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

/// Temperature-scaled stochastic argmax.
///
/// Falls back to [`arg_max`] when any softened weight is NaN.
pub fn soft_arg_max(values: &[f64], beta: f64, rng: &mut RandomSource) -> Option<usize> {
    if values.is_empty() {
        return None;
    }

    let softened = softmax(values, beta);
    if softened.iter().any(|w| w.is_nan()) {
        tracing::debug!("Softmax produced NaN (beta = {}), using hard argmax", beta);
        return arg_max(values, rng);
    }

    let u = rng.uniform();
    Some(first_exceeding(&softened, u))
}

/// Walk `weights` accumulating a running total and return the first index
/// whose cumulative weight exceeds `u`; the last index if none does.
pub fn first_exceeding(weights: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if u < cumulative {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

/// Shannon entropy in bits. Zero entries contribute nothing.
pub fn entropy(probabilities: &[f64]) -> f64 {
    -probabilities
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| p * p.log2())
        .sum::<f64>()
}

/// Half-open arithmetic sequence `start, start + step, ...` below `end`
/// (above `end` for a negative step).
pub fn range(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    if step == 0.0 || !step.is_finite() {
        return Err(ProbabilityError::MalformedInput(format!(
            "range step must be finite and non-zero, got {step}"
        )));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(ProbabilityError::MalformedInput(format!(
            "range bounds must be finite, got {start}..{end}"
        )));
    }

    let span = (end - start) / step;
    if span < 0.0 {
        return Err(ProbabilityError::MalformedInput(format!(
            "step {step} never reaches {end} from {start}"
        )));
    }

    let count = span.ceil() as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
