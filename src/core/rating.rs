//! Provisional rating movement and the final commit.

use crate::config::{RatingConfig, StrategyKind};
use crate::core::completion::GateStatus;
use crate::domain::model::{Entrant, Milestone, MilestoneKind, RatingCommit};
use crate::domain::ports::RatingStrategy;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Expected score of a player rated `rating_a` against `rating_b`.
pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b as f64 - rating_a as f64) / 400.0))
}

/// Zero-sum Elo update for a decisive result.
#[derive(Debug, Clone, Copy)]
pub struct EloStrategy {
    pub k_factor: f64,
}

impl RatingStrategy for EloStrategy {
    fn deltas(&self, winner_rating: i32, loser_rating: i32) -> (i32, i32) {
        let expected = expected_score(winner_rating, loser_rating);
        let delta = (self.k_factor * (1.0 - expected)).round() as i32;
        (delta, -delta)
    }
}

/// Same number of points for every result.
#[derive(Debug, Clone, Copy)]
pub struct FlatStrategy {
    pub points: i32,
}

impl RatingStrategy for FlatStrategy {
    fn deltas(&self, _winner_rating: i32, _loser_rating: i32) -> (i32, i32) {
        (self.points, -self.points)
    }
}

pub fn strategy_for(config: &RatingConfig) -> Box<dyn RatingStrategy> {
    match config.strategy {
        StrategyKind::Elo => Box::new(EloStrategy {
            k_factor: config.k_factor,
        }),
        StrategyKind::Flat => Box::new(FlatStrategy {
            points: config.flat_points,
        }),
    }
}

/// Copies every provisional rating into the permanent one, all or nothing.
/// An entrant whose rating crosses `elite_threshold` from below is flagged
/// and reported as a milestone.
pub fn commit_ratings(
    gate: &GateStatus,
    entrants: &[Entrant],
    elite_threshold: i32,
    committed_at: DateTime<Utc>,
) -> Result<RatingCommit> {
    gate.require()?;

    let mut milestones = Vec::new();
    let entrants = entrants
        .iter()
        .cloned()
        .map(|mut entrant| {
            let crossed = entrant.rating < elite_threshold
                && entrant.provisional_rating >= elite_threshold;
            entrant.rating = entrant.provisional_rating;
            if crossed {
                entrant.elite = true;
                milestones.push(Milestone {
                    entrant: entrant.id,
                    kind: MilestoneKind::ReachedElite,
                    rating: entrant.rating,
                });
            }
            entrant
        })
        .collect();

    Ok(RatingCommit {
        entrants,
        milestones,
        committed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EngineError;

    fn open_gate() -> GateStatus {
        GateStatus {
            ready: true,
            unfinished: 0,
            reason: None,
        }
    }

    #[test]
    fn test_expected_score_symmetry() {
        assert!((expected_score(1500, 1500) - 0.5).abs() < 1e-9);
        let sum = expected_score(1700, 1500) + expected_score(1500, 1700);
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_rating_gap() {
        let favourite = expected_score(i32::MAX, i32::MIN);
        assert!((favourite - 1.0).abs() < 1e-9);
        assert_eq!(EloStrategy { k_factor: 32.0 }.deltas(i32::MIN, i32::MAX), (32, -32));
    }

    #[test]
    fn test_elo_rewards_upsets_more() {
        let elo = EloStrategy { k_factor: 32.0 };
        assert_eq!(elo.deltas(1500, 1500), (16, -16));

        let (favourite_gain, _) = elo.deltas(1800, 1400);
        let (upset_gain, upset_loss) = elo.deltas(1400, 1800);
        assert!(upset_gain > favourite_gain);
        assert_eq!(upset_gain, -upset_loss);
    }

    #[test]
    fn test_flat_strategy() {
        let flat = strategy_for(&RatingConfig {
            strategy: StrategyKind::Flat,
            flat_points: 10,
            ..RatingConfig::default()
        });
        assert_eq!(flat.deltas(2000, 1000), (10, -10));
    }

    #[test]
    fn test_commit_copies_provisional_and_flags_elite() {
        let mut rising = Entrant::new(1, "rising", 2390);
        rising.provisional_rating = 2412;
        let mut already = Entrant::new(2, "already", 2500);
        already.elite = true;
        already.provisional_rating = 2480;
        let mut falling = Entrant::new(3, "falling", 1500);
        falling.provisional_rating = 1484;

        let commit =
            commit_ratings(&open_gate(), &[rising, already, falling], 2400, Utc::now()).unwrap();

        let ratings: Vec<i32> = commit.entrants.iter().map(|e| e.rating).collect();
        assert_eq!(ratings, vec![2412, 2480, 1484]);
        assert_eq!(commit.milestones.len(), 1);
        assert_eq!(commit.milestones[0].entrant.0, 1);
        assert!(commit.entrants[0].elite);
    }

    #[test]
    fn test_closed_gate_mutates_nothing() {
        let mut entrant = Entrant::new(1, "a", 1500);
        entrant.provisional_rating = 1600;
        let roster = vec![entrant.clone()];
        let gate = GateStatus {
            ready: false,
            unfinished: 2,
            reason: None,
        };

        let err = commit_ratings(&gate, &roster, 2400, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::IncompleteTournament { unfinished: 2, .. }
        ));
        assert_eq!(roster[0], entrant);
    }
}
