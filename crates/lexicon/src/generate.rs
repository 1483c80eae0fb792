//! Lexicon generators

use crate::error::{LexiconError, Result};
use crate::lexicon::{cell_count, Lexicon};
use pragma_core::RandomSource;
use tracing::debug;

impl Lexicon {
    /// Each cell independently 1.0 with probability `p`, else 0.0.
    pub fn generate_random_binary(
        p: f64,
        vocabulary_size: usize,
        context_size: usize,
        rng: &mut RandomSource,
    ) -> Result<Lexicon> {
        let cells = cell_count(vocabulary_size, context_size)?;
        let data = (0..cells)
            .map(|_| if rng.chance(p) { 1.0 } else { 0.0 })
            .collect();
        debug!(
            "Generated random binary {}x{} lexicon (p = {})",
            vocabulary_size, context_size, p
        );
        Ok(Lexicon::from_parts(vocabulary_size, context_size, data))
    }

    /// Consistent binary lexicon in which every signal maps to exactly
    /// `clamp(ambiguity, 1, context_size)` referents.
    ///
    /// Phase one covers each referent, in order, with a distinct signal drawn
    /// uniformly from the signals not used yet. Phase two tops every row up
    /// to its quota with sequential proportional sampling over the row's
    /// still-empty cells. Requires `vocabulary_size >= context_size`.
    pub fn generate_consistent_ambiguity_mapping(
        ambiguity: usize,
        vocabulary_size: usize,
        context_size: usize,
        rng: &mut RandomSource,
    ) -> Result<Lexicon> {
        if vocabulary_size < context_size {
            return Err(LexiconError::DimensionMismatch(format!(
                "{vocabulary_size} signals cannot cover {context_size} referents"
            )));
        }
        if context_size == 0 {
            return Lexicon::zeros(vocabulary_size, 0);
        }

        let cells = cell_count(vocabulary_size, context_size)?;
        let quota = ambiguity.clamp(1, context_size);
        let mut remaining = vec![quota; vocabulary_size];
        let mut data = vec![0.0; cells];

        let mut unused: Vec<usize> = (0..vocabulary_size).collect();
        for referent in 0..context_size {
            let signal = unused.swap_remove(rng.below(unused.len()));
            data[signal * context_size + referent] = 1.0;
            remaining[signal] -= 1;
        }

        for (signal, wanted) in remaining.into_iter().enumerate() {
            let row = &mut data[signal * context_size..(signal + 1) * context_size];
            let empty: Vec<usize> = (0..context_size).filter(|&j| row[j] == 0.0).collect();
            for k in rng.select_sequential(empty.len(), wanted) {
                row[empty[k]] = 1.0;
            }
        }

        debug!(
            "Generated consistent {}x{} lexicon with ambiguity {}",
            vocabulary_size, context_size, quota
        );
        Ok(Lexicon::from_parts(vocabulary_size, context_size, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_binary_density() {
        let mut rng = RandomSource::new(10);
        let lex = Lexicon::generate_random_binary(0.3, 100, 100, &mut rng).unwrap();
        assert!(lex.is_binary());
        assert!((lex.density() - 0.3).abs() < 0.02, "density {}", lex.density());
    }

    #[test]
    fn test_random_binary_extremes() {
        let mut rng = RandomSource::new(11);
        assert_eq!(
            Lexicon::generate_random_binary(0.0, 3, 4, &mut rng).unwrap(),
            Lexicon::zeros(3, 4).unwrap()
        );
        let full = Lexicon::generate_random_binary(1.0, 3, 4, &mut rng).unwrap();
        assert_eq!(full.density(), 1.0);
    }

    #[test]
    fn test_random_binary_rejects_oversized_shape() {
        let mut rng = RandomSource::new(14);
        let err = Lexicon::generate_random_binary(0.5, usize::MAX, 3, &mut rng).unwrap_err();
        assert!(matches!(err, LexiconError::MalformedInput(_)));
    }

    #[test]
    fn test_consistent_mapping_is_consistent() {
        for seed in 0..200 {
            let mut rng = RandomSource::new(seed);
            let v = 3 + (seed as usize % 5);
            let c = 1 + (seed as usize % 3);
            let ambiguity = seed as usize % 4;

            let lex = Lexicon::generate_consistent_ambiguity_mapping(ambiguity, v, c, &mut rng)
                .unwrap();

            assert!(lex.is_consistent(), "seed {seed}");
            assert!(lex.is_binary());
            let quota = ambiguity.clamp(1, c);
            assert!(
                lex.ambiguity_per_signal(1.0).iter().all(|n| *n == quota),
                "seed {seed}: {:?}",
                lex.ambiguity_per_signal(1.0)
            );
        }
    }

    #[test]
    fn test_consistent_mapping_square_unambiguous_is_permutation() {
        let mut rng = RandomSource::new(12);
        let lex = Lexicon::generate_consistent_ambiguity_mapping(1, 4, 4, &mut rng).unwrap();
        assert_eq!(lex.row_sums(), vec![1.0; 4]);
        assert_eq!(lex.column_sums(), vec![1.0; 4]);
    }

    #[test]
    fn test_consistent_mapping_needs_enough_signals() {
        let mut rng = RandomSource::new(13);
        assert!(matches!(
            Lexicon::generate_consistent_ambiguity_mapping(1, 2, 3, &mut rng),
            Err(LexiconError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_consistent_mapping_is_reproducible() {
        let a = Lexicon::generate_consistent_ambiguity_mapping(2, 6, 4, &mut RandomSource::new(3));
        let b = Lexicon::generate_consistent_ambiguity_mapping(2, 6, 4, &mut RandomSource::new(3));
        assert_eq!(a, b);
    }
}
