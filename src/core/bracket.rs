//! Knockout sizing and pairing.

use crate::domain::model::{BracketRound, EntrantId, Fixture, FixtureId, StageId};
use crate::utils::error::{EngineError, Result};

/// How a round of `2 * matches + byes` entrants is reduced.
/// `matches + byes` is always a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketSize {
    pub byes: usize,
    pub matches: usize,
}

impl BracketSize {
    pub fn next_pool(&self) -> usize {
        self.byes + self.matches
    }
}

/// `None` when fewer than two entrants remain.
pub fn bracket_size(entrants: usize) -> Option<BracketSize> {
    if entrants < 2 {
        return None;
    }
    if entrants.is_power_of_two() {
        return Some(BracketSize {
            byes: 0,
            matches: entrants / 2,
        });
    }

    let target = entrants.next_power_of_two() / 2;
    let matches = entrants - target;
    Some(BracketSize {
        byes: target - matches,
        matches,
    })
}

/// Optional trim of the weakest entrants before the first knockout round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecutPolicy {
    /// Fields of this size or smaller are never cut.
    pub threshold: usize,
    pub fraction: f64,
}

impl PrecutPolicy {
    /// Number of entrants to drop from the bottom of a field of `entrants`.
    /// At least two entrants always survive.
    pub fn cut_count(&self, entrants: usize) -> usize {
        if entrants <= self.threshold {
            return 0;
        }
        let cut = (entrants as f64 * self.fraction).floor() as usize;
        cut.min(entrants.saturating_sub(2))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub byes: Vec<EntrantId>,
    pub matches: Vec<(EntrantId, EntrantId)>,
}

/// `seeded` must be best first. The top `byes` seeds skip the round; the
/// rest meet best against worst, second best against second worst, and so on.
pub fn pair(seeded: &[EntrantId], size: BracketSize) -> Result<Pairing> {
    if size.byes + 2 * size.matches != seeded.len() {
        return Err(EngineError::invalid_input(format!(
            "{} entrants cannot fill {} byes and {} matches",
            seeded.len(),
            size.byes,
            size.matches
        )));
    }

    let (byes, rest) = seeded.split_at(size.byes);
    let matches = (0..size.matches)
        .map(|i| (rest[i], rest[rest.len() - 1 - i]))
        .collect();

    Ok(Pairing {
        byes: byes.to_vec(),
        matches,
    })
}

/// Sizes, pairs and materializes one knockout round from a seeded pool.
pub fn build_round(round: u32, seeded: Vec<EntrantId>, cut: Vec<EntrantId>) -> Result<BracketRound> {
    let size = bracket_size(seeded.len()).ok_or_else(|| {
        EngineError::invalid_input(format!(
            "a knockout round needs at least two entrants, got {}",
            seeded.len()
        ))
    })?;
    let pairing = pair(&seeded, size)?;

    let stage = StageId::Knockout(round);
    let fixtures = pairing
        .matches
        .iter()
        .zip(1u32..)
        .map(|(&(high, low), number)| Fixture::new(FixtureId::new(stage, number), high, low, 1))
        .collect();

    tracing::debug!(
        "Round {}: {} entrants, {} matches, {} byes",
        round,
        seeded.len(),
        size.matches,
        size.byes
    );

    Ok(BracketRound {
        round,
        entrants: seeded,
        byes: pairing.byes,
        fixtures,
        cut,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::RangeInclusive<u64>) -> Vec<EntrantId> {
        range.map(EntrantId).collect()
    }

    #[test]
    fn test_power_of_two_has_no_byes() {
        assert_eq!(bracket_size(32), Some(BracketSize { byes: 0, matches: 16 }));
        assert_eq!(bracket_size(8), Some(BracketSize { byes: 0, matches: 4 }));
        assert_eq!(bracket_size(2), Some(BracketSize { byes: 0, matches: 1 }));
    }

    #[test]
    fn test_irregular_fields() {
        assert_eq!(bracket_size(25), Some(BracketSize { byes: 7, matches: 9 }));
        assert_eq!(bracket_size(3), Some(BracketSize { byes: 1, matches: 1 }));
        assert_eq!(bracket_size(6), Some(BracketSize { byes: 2, matches: 2 }));
        assert_eq!(bracket_size(31), Some(BracketSize { byes: 1, matches: 15 }));
    }

    #[test]
    fn test_terminal_field() {
        assert_eq!(bracket_size(1), None);
        assert_eq!(bracket_size(0), None);
    }

    #[test]
    fn test_size_invariants() {
        for n in 2..=600usize {
            let size = bracket_size(n).unwrap();
            assert_eq!(size.matches * 2 + size.byes, n);
            assert!(size.next_pool().is_power_of_two());
            assert!(size.next_pool() < n);
            if n.is_power_of_two() {
                assert_eq!(size.byes, 0);
            }
        }
    }

    #[test]
    fn test_precut_only_above_threshold() {
        let policy = PrecutPolicy {
            threshold: 32,
            fraction: 0.2,
        };
        assert_eq!(policy.cut_count(32), 0);
        assert_eq!(policy.cut_count(33), 6);
        assert_eq!(policy.cut_count(50), 10);

        let brutal = PrecutPolicy {
            threshold: 2,
            fraction: 0.9,
        };
        assert_eq!(brutal.cut_count(3), 1);
    }

    #[test]
    fn test_pairing_gives_byes_to_top_seeds() {
        let seeded = ids(1..=6);
        let pairing = pair(&seeded, bracket_size(6).unwrap()).unwrap();

        assert_eq!(pairing.byes, vec![EntrantId(1), EntrantId(2)]);
        assert_eq!(
            pairing.matches,
            vec![(EntrantId(3), EntrantId(6)), (EntrantId(4), EntrantId(5))]
        );
    }

    #[test]
    fn test_pairing_rejects_mismatched_size() {
        let seeded = ids(1..=5);
        let err = pair(&seeded, BracketSize { byes: 0, matches: 2 }).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_build_round_of_25() {
        let round = build_round(1, ids(1..=25), Vec::new()).unwrap();
        assert_eq!(round.fixtures.len(), 9);
        assert_eq!(round.byes.len(), 7);
        assert_eq!(round.byes, ids(1..=7));
        assert_eq!(round.fixtures[0].home, Some(EntrantId(8)));
        assert_eq!(round.fixtures[0].away, Some(EntrantId(25)));
        assert_eq!(round.fixtures[8].id.to_string(), "R1-9");
    }

    #[test]
    fn test_build_round_needs_two() {
        assert!(build_round(1, ids(1..=1), Vec::new()).is_err());
    }
}
