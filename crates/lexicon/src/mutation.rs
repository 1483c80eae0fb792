//! Mutation operators
//!
//! All operators are pure: they return a new lexicon and draw every random
//! decision from the supplied [`RandomSource`]. Row-wise operators pick
//! cells with sequential proportional sampling
//! ([`RandomSource::select_sequential`]) so the number of changed cells per
//! row is exact and early positions are not favoured.

use crate::lexicon::Lexicon;
use pragma_core::RandomSource;
use tracing::debug;

fn target_count(rate: f64, available: usize) -> usize {
    (rate * available as f64).round().max(0.0) as usize
}

impl Lexicon {
    /// Each cell independently becomes `|v - 1|` with probability `rate`.
    ///
    /// Binary cells flip; graded cells mirror around 1.
    pub fn mutate(&self, rate: f64, rng: &mut RandomSource) -> Lexicon {
        let data = self
            .data()
            .iter()
            .map(|v| if rng.chance(rate) { (v - 1.0).abs() } else { *v })
            .collect();
        self.same_cells(data)
    }

    /// Per row, swap cell `j` with its mirror `len - 1 - j` for
    /// `round(mix_rate * floor(len / 2))` of the mirror pairs.
    ///
    /// The middle cell of an odd-length row never moves.
    pub fn mix_referents(&self, mix_rate: f64, rng: &mut RandomSource) -> Lexicon {
        let len = self.context_size();
        let pairs = len / 2;
        let swaps = target_count(mix_rate, pairs);

        let mut data = self.data().to_vec();
        for i in 0..self.vocabulary_size() {
            let row = &mut data[i * len..(i + 1) * len];
            for j in rng.select_sequential(pairs, swaps) {
                row.swap(j, len - 1 - j);
            }
        }
        self.same_cells(data)
    }

    /// Per row, turn `round(rate * zeros)` of the zero cells into 1.0.
    pub fn additive_binary_mutation(&self, rate: f64, rng: &mut RandomSource) -> Lexicon {
        let len = self.context_size();
        let mut data = self.data().to_vec();
        let mut added = 0;

        for i in 0..self.vocabulary_size() {
            let row = &mut data[i * len..(i + 1) * len];
            let zeros: Vec<usize> = (0..len).filter(|&j| row[j] == 0.0).collect();
            let wanted = target_count(rate, zeros.len());
            for k in rng.select_sequential(zeros.len(), wanted) {
                row[zeros[k]] = 1.0;
                added += 1;
            }
        }

        debug!("Additive mutation (rate {}) set {} cells", rate, added);
        self.same_cells(data)
    }

    /// Per row, clear `round(rate * qualifying)` of the cells whose value is
    /// `>= threshold`.
    ///
    /// Selected cells are set to 0.0. Writing 1.0 into them, as some earlier
    /// versions of this operator did, would leave binary lexicons unchanged
    /// and is treated as a bug.
    pub fn removal_binary_mutation(
        &self,
        rate: f64,
        threshold: f64,
        rng: &mut RandomSource,
    ) -> Lexicon {
        let len = self.context_size();
        let mut data = self.data().to_vec();
        let mut removed = 0;

        for i in 0..self.vocabulary_size() {
            let row = &mut data[i * len..(i + 1) * len];
            let qualifying: Vec<usize> = (0..len).filter(|&j| row[j] >= threshold).collect();
            let wanted = target_count(rate, qualifying.len());
            for k in rng.select_sequential(qualifying.len(), wanted) {
                row[qualifying[k]] = 0.0;
                removed += 1;
            }
        }

        debug!("Removal mutation (rate {}) cleared {} cells", rate, removed);
        self.same_cells(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> Lexicon {
        Lexicon::from_rows(vec![
            vec![1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_mutate_zero_is_identity() {
        let mut rng = RandomSource::new(1);
        let lex = binary().set(0, 1, 0.3).unwrap();
        assert_eq!(lex.mutate(0.0, &mut rng), lex);
    }

    #[test]
    fn test_mutate_one_flips_binary() {
        let mut rng = RandomSource::new(2);
        let lex = binary();
        let flipped = lex.mutate(1.0, &mut rng);
        for (a, b) in lex.data().iter().zip(flipped.data()) {
            assert_eq!(*a, 1.0 - *b);
        }
    }

    #[test]
    fn test_mutate_mirrors_graded() {
        let mut rng = RandomSource::new(3);
        let lex = Lexicon::from_rows(vec![vec![0.25, 0.8]]).unwrap();
        assert_eq!(
            lex.mutate(1.0, &mut rng).row(0).unwrap(),
            vec![0.75, (0.8f64 - 1.0).abs()]
        );
    }

    #[test]
    fn test_mutate_is_reproducible() {
        let lex = binary();
        let a = lex.mutate(0.5, &mut RandomSource::new(9));
        let b = lex.mutate(0.5, &mut RandomSource::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_mix_referents_full_rate_reverses_rows() {
        let mut rng = RandomSource::new(4);
        let lex = Lexicon::from_rows(vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]]).unwrap();
        let mixed = lex.mix_referents(1.0, &mut rng);
        assert_eq!(mixed.row(0).unwrap(), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_mix_referents_partial() {
        let lex = Lexicon::from_rows(vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]; 4]).unwrap();
        for seed in 0..50 {
            let mut rng = RandomSource::new(seed);
            let mixed = lex.mix_referents(0.5, &mut rng);
            for row in mixed.rows() {
                // middle never moves
                assert_eq!(row[3], 4.0);
                // round(0.5 * 3) = 2 swapped pairs
                let moved = row.iter().zip(1..=7).filter(|(v, k)| **v != *k as f64).count();
                assert_eq!(moved, 4);
                // values stay in their mirror pair
                for j in 0..3 {
                    let pair = [row[j], row[6 - j]];
                    assert!(pair.contains(&((j + 1) as f64)));
                    assert!(pair.contains(&((7 - j) as f64)));
                }
            }
        }
    }

    #[test]
    fn test_additive_mutation_counts() {
        let mut rng = RandomSource::new(5);
        let lex = binary();
        let mutated = lex.additive_binary_mutation(0.5, &mut rng);

        // zeros per row: 3, 5, 1 -> round(1.5)=2, round(2.5)=3, round(0.5)=1
        let before = lex.ambiguity_per_signal(1.0);
        let after = mutated.ambiguity_per_signal(1.0);
        assert_eq!(after[0] - before[0], 2);
        assert_eq!(after[1] - before[1], 3);
        assert_eq!(after[2] - before[2], 1);

        // existing ones untouched
        for (a, b) in lex.data().iter().zip(mutated.data()) {
            if *a == 1.0 {
                assert_eq!(*b, 1.0);
            }
        }
        assert!(mutated.is_binary());
    }

    #[test]
    fn test_additive_mutation_zero_rate() {
        let mut rng = RandomSource::new(6);
        assert_eq!(binary().additive_binary_mutation(0.0, &mut rng), binary());
    }

    #[test]
    fn test_removal_mutation_sets_selected_cells_to_zero() {
        let mut rng = RandomSource::new(7);
        let lex = binary();
        let mutated = lex.removal_binary_mutation(0.5, 1.0, &mut rng);

        // ones per row: 2, 0, 4 -> remove 1, 0, 2
        assert_eq!(mutated.ambiguity_per_signal(1.0), vec![1, 0, 2]);
        for (a, b) in lex.data().iter().zip(mutated.data()) {
            if *a == 0.0 {
                assert_eq!(*b, 0.0);
            }
        }
    }

    #[test]
    fn test_removal_mutation_full_rate_clears_qualifying() {
        let mut rng = RandomSource::new(8);
        let lex = Lexicon::from_rows(vec![vec![0.9, 0.4, 0.6]]).unwrap();
        let mutated = lex.removal_binary_mutation(1.0, 0.5, &mut rng);
        assert_eq!(mutated.row(0).unwrap(), vec![0.0, 0.4, 0.0]);
    }
}
