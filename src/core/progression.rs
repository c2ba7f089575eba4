//! Knockout state machine.
//!
//! ```text
//! NotStarted -> AwaitingRound -> RoundComplete -> NextRoundReady -> AwaitingRound ...
//!                                             \-> ChampionDecided
//! ```

use crate::domain::model::{BracketRound, EntrantId, EventStages};
use crate::utils::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketState {
    /// No knockout round exists yet.
    NotStarted,
    AwaitingRound { round: u32, pending: usize },
    RoundComplete { round: u32 },
    /// Winners and carried byes of `round - 1`, not yet paired.
    NextRoundReady { round: u32, pool: Vec<EntrantId> },
    ChampionDecided { champion: EntrantId },
}

pub fn state(stages: &EventStages) -> BracketState {
    if let Some(champion) = stages.champion {
        return BracketState::ChampionDecided { champion };
    }

    match stages.current_round() {
        None => BracketState::NotStarted,
        Some(current) if current.is_complete() => BracketState::RoundComplete {
            round: current.round,
        },
        Some(current) => BracketState::AwaitingRound {
            round: current.round,
            pending: current.fixtures.iter().filter(|f| !f.is_finished()).count(),
        },
    }
}

/// Winners of every fixture followed by the entrants that had a bye.
pub fn next_pool(round: &BracketRound) -> Result<Vec<EntrantId>> {
    if !round.is_complete() {
        return Err(EngineError::invalid_state(format!(
            "round {} is not complete",
            round.round
        )));
    }

    let mut pool = Vec::with_capacity(round.fixtures.len() + round.byes.len());
    for fixture in &round.fixtures {
        let winner = fixture.winner().ok_or_else(|| {
            EngineError::invalid_state(format!("fixture {} finished without a winner", fixture.id))
        })?;
        pool.push(winner);
    }
    pool.extend(round.byes.iter().copied());
    Ok(pool)
}

/// Moves a completed round forward: either `NextRoundReady` or
/// `ChampionDecided`. Any other starting state is an error.
pub fn advance(stages: &EventStages) -> Result<BracketState> {
    match state(stages) {
        BracketState::RoundComplete { round } => {
            let current = stages
                .current_round()
                .ok_or_else(|| EngineError::invalid_state("no knockout round to advance"))?;
            let pool = next_pool(current)?;
            if let [champion] = pool.as_slice() {
                Ok(BracketState::ChampionDecided {
                    champion: *champion,
                })
            } else {
                Ok(BracketState::NextRoundReady {
                    round: round + 1,
                    pool,
                })
            }
        }
        BracketState::AwaitingRound { round, pending } => Err(EngineError::invalid_state(format!(
            "round {} still has {} unfinished matches",
            round, pending
        ))),
        BracketState::NotStarted => Err(EngineError::invalid_state(
            "the knockout stage has not started",
        )),
        BracketState::ChampionDecided { champion } => Err(EngineError::invalid_state(format!(
            "champion {} already decided",
            champion
        ))),
        BracketState::NextRoundReady { round, .. } => Err(EngineError::invalid_state(format!(
            "round {} is already waiting to be paired",
            round
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bracket::build_round;
    use crate::domain::model::EventId;

    fn ids(range: std::ops::RangeInclusive<u64>) -> Vec<EntrantId> {
        range.map(EntrantId).collect()
    }

    fn finish_round_for_home(round: &mut BracketRound) {
        for fixture in &mut round.fixtures {
            fixture.home_score = 2;
            fixture.away_score = 1;
        }
    }

    #[test]
    fn test_not_started() {
        let stages = EventStages::new(EventId(1));
        assert_eq!(state(&stages), BracketState::NotStarted);
        assert!(advance(&stages).is_err());
    }

    #[test]
    fn test_awaiting_round_refuses_to_advance() {
        let mut stages = EventStages::new(EventId(1));
        stages.rounds.push(build_round(1, ids(1..=8), Vec::new()).unwrap());
        stages.rounds[0].fixtures[0].home_score = 1;

        assert_eq!(
            state(&stages),
            BracketState::AwaitingRound {
                round: 1,
                pending: 3
            }
        );
        assert!(matches!(
            advance(&stages),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_complete_round_yields_winners_then_byes() {
        let mut stages = EventStages::new(EventId(1));
        let mut round = build_round(1, ids(1..=6), Vec::new()).unwrap();
        finish_round_for_home(&mut round);
        stages.rounds.push(round);

        assert_eq!(state(&stages), BracketState::RoundComplete { round: 1 });
        assert_eq!(
            advance(&stages).unwrap(),
            BracketState::NextRoundReady {
                round: 2,
                pool: vec![EntrantId(3), EntrantId(4), EntrantId(1), EntrantId(2)],
            }
        );
    }

    #[test]
    fn test_final_decides_champion() {
        let mut stages = EventStages::new(EventId(1));
        let mut round = build_round(1, ids(1..=2), Vec::new()).unwrap();
        round.fixtures[0].home_score = 0;
        round.fixtures[0].away_score = 3;
        stages.rounds.push(round);

        assert_eq!(
            advance(&stages).unwrap(),
            BracketState::ChampionDecided {
                champion: EntrantId(2)
            }
        );

        stages.champion = Some(EntrantId(2));
        assert!(advance(&stages).is_err());
    }

    #[test]
    fn test_tied_fixture_without_winner_is_rejected() {
        let mut round = build_round(1, ids(1..=2), Vec::new()).unwrap();
        round.fixtures[0].home_score = 1;
        round.fixtures[0].away_score = 1;
        assert!(next_pool(&round).is_err());
    }
}
