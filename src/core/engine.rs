use crate::config::{EngineConfig, SeedingPolicy, TieBreak};
use crate::core::bracket::{bracket_size, build_round};
use crate::core::completion::{self, GateStatus};
use crate::core::grouping::{group_size, partition};
use crate::core::progression::{self, BracketState};
use crate::core::rating::{commit_ratings, strategy_for};
use crate::core::round_robin::round_robin;
use crate::core::seeding::{group_records, rank_ascending, rank_descending, seed, seed_order};
use crate::domain::model::{
    Entrant, EntrantId, EventStages, Fixture, FixtureId, Group, RatingCommit, StageId,
};
use crate::domain::ports::RatingStrategy;
use crate::utils::error::{EngineError, Result};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

/// What `form_knockout_round` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnockoutStep {
    Round {
        round: u32,
        matches: usize,
        byes: usize,
        cut: usize,
    },
    Champion(EntrantId),
}

/// Pure match-making engine. Every operation takes the current snapshot and
/// returns a new one; inputs are never touched, so a failed call leaves the
/// caller's state as it was.
pub struct TournamentEngine {
    config: EngineConfig,
    strategy: Box<dyn RatingStrategy>,
}

impl TournamentEngine {
    pub fn new(config: EngineConfig) -> Self {
        let strategy = strategy_for(&config.rating);
        Self { config, strategy }
    }

    pub fn with_strategy(config: EngineConfig, strategy: Box<dyn RatingStrategy>) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Splits the roster into round-robin groups with their fixtures.
    pub fn form_groups(&self, roster: &[Entrant], stages: &EventStages) -> Result<EventStages> {
        if !stages.groups.is_empty() {
            return Err(EngineError::StageAlreadyExists {
                event: stages.event_id.to_string(),
                stage: "group".to_string(),
            });
        }
        validate_roster(roster)?;

        let size = group_size(roster.len(), self.config.groups.bounds())?;
        let members = partition(roster, size, rank_ascending)?;

        let mut updated = stages.clone();
        updated.groups = members
            .into_iter()
            .zip(0u32..)
            .map(|(members, index)| Group {
                index,
                fixtures: round_robin(StageId::Group(index), &members),
                members,
            })
            .collect();

        tracing::info!(
            "Event {}: formed {} groups of size {} ({} fixtures)",
            stages.event_id,
            updated.groups.len(),
            size,
            updated.groups.iter().map(|g| g.fixtures.len()).sum::<usize>()
        );
        Ok(updated)
    }

    /// Creates the first knockout round, the next one once the current round
    /// is complete, or crowns the champion when a single entrant is left.
    pub fn form_knockout_round(
        &self,
        roster: &[Entrant],
        stages: &EventStages,
    ) -> Result<(EventStages, KnockoutStep)> {
        if stages.ratings_finalized {
            return Err(EngineError::invalid_state("ratings are already finalized"));
        }
        let order = seed_order(self.config.knockout.seeding);
        let ranked: Cow<[Entrant]> = match self.config.knockout.seeding {
            SeedingPolicy::Rating => Cow::Borrowed(roster),
            SeedingPolicy::GroupRecord => Cow::Owned(group_records(roster, &stages.groups)),
        };
        let mut updated = stages.clone();

        let step = match progression::state(stages) {
            BracketState::NotStarted => {
                validate_roster(roster)?;
                let ids: Vec<EntrantId> = roster.iter().map(|e| e.id).collect();
                let mut seeded = seed(&ranked, &ids, order)?;

                let cut_count = self.config.knockout.precut().cut_count(seeded.len());
                let cut = seeded.split_off(seeded.len() - cut_count);
                if seeded.len() < 2 {
                    return Err(EngineError::invalid_input(
                        "the knockout stage needs at least two entrants",
                    ));
                }
                if cut_count > 0 {
                    tracing::info!(
                        "Event {}: pre-cut removed {} of {} entrants",
                        stages.event_id,
                        cut_count,
                        roster.len()
                    );
                }

                let round = build_round(1, seeded, cut)?;
                let step = round_step(&round.fixtures, round.byes.len(), cut_count, 1);
                updated.rounds.push(round);
                step
            }
            _ => match progression::advance(stages)? {
                BracketState::NextRoundReady { round, pool } => {
                    let seeded = seed(&ranked, &pool, order)?;
                    let next = build_round(round, seeded, Vec::new())?;
                    let step = round_step(&next.fixtures, next.byes.len(), 0, round);
                    updated.rounds.push(next);
                    step
                }
                BracketState::ChampionDecided { champion } => {
                    updated.champion = Some(champion);
                    KnockoutStep::Champion(champion)
                }
                other => {
                    return Err(EngineError::invalid_state(format!(
                        "unexpected bracket state {:?}",
                        other
                    )))
                }
            },
        };

        match &step {
            KnockoutStep::Round {
                round,
                matches,
                byes,
                ..
            } => tracing::info!(
                "Event {}: knockout round {} formed ({} matches, {} byes)",
                stages.event_id,
                round,
                matches,
                byes
            ),
            KnockoutStep::Champion(champion) => {
                tracing::info!("Event {}: champion decided: {}", stages.event_id, champion)
            }
        }
        Ok((updated, step))
    }

    /// Records a decisive result and moves both entrants' counters and
    /// provisional ratings.
    pub fn record_result(
        &self,
        roster: &[Entrant],
        stages: &EventStages,
        fixture_id: FixtureId,
        home_score: u32,
        away_score: u32,
    ) -> Result<(Vec<Entrant>, EventStages)> {
        if stages.ratings_finalized {
            return Err(EngineError::invalid_state("ratings are already finalized"));
        }

        let mut updated = stages.clone();
        let fixture = updated
            .fixture_mut(fixture_id)
            .ok_or_else(|| EngineError::not_found("fixture", fixture_id))?;
        let (home, away) = match (fixture.home, fixture.away) {
            (Some(home), Some(away)) => (home, away),
            _ => {
                return Err(EngineError::invalid_input(format!(
                    "fixture {} is missing an entrant",
                    fixture_id
                )))
            }
        };
        if fixture.is_finished() {
            return Err(EngineError::invalid_state(format!(
                "fixture {} already has a result",
                fixture_id
            )));
        }
        if home_score == 0 && away_score == 0 {
            return Err(EngineError::invalid_input(
                "a 0-0 result cannot be recorded as finished",
            ));
        }

        let mut entrants = roster.to_vec();
        let home_idx = position(&entrants, home)?;
        let away_idx = position(&entrants, away)?;

        let home_wins = match home_score.cmp(&away_score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.config.results.tie_break {
                TieBreak::Reject => {
                    return Err(EngineError::invalid_input(format!(
                        "tied result {}-{} for fixture {} is not allowed",
                        home_score, away_score, fixture_id
                    )))
                }
                TieBreak::HigherSeed => {
                    rank_descending(&entrants[home_idx], &entrants[away_idx]) == Ordering::Less
                }
                TieBreak::Home => true,
            },
        };

        let (winner_idx, loser_idx, winner_score, loser_score) = if home_wins {
            (home_idx, away_idx, home_score, away_score)
        } else {
            (away_idx, home_idx, away_score, home_score)
        };

        fixture.home_score = home_score;
        fixture.away_score = away_score;
        fixture.winner = Some(entrants[winner_idx].id);

        let (winner_delta, loser_delta) = self.strategy.deltas(
            entrants[winner_idx].provisional_rating,
            entrants[loser_idx].provisional_rating,
        );
        let winner = &mut entrants[winner_idx];
        winner.record_win(winner_score, loser_score);
        winner.provisional_rating += winner_delta;
        let loser = &mut entrants[loser_idx];
        loser.record_loss(loser_score, winner_score);
        loser.provisional_rating += loser_delta;

        tracing::debug!(
            "Fixture {} recorded {}-{}; winner {}",
            fixture_id,
            home_score,
            away_score,
            entrants[winner_idx].id
        );
        Ok((entrants, updated))
    }

    pub fn completion(&self, stages: &EventStages) -> GateStatus {
        completion::evaluate(stages, self.config.completion.require_champion)
    }

    /// Commits provisional ratings once every match is finished.
    pub fn finalize_ratings(
        &self,
        roster: &[Entrant],
        stages: &EventStages,
    ) -> Result<(RatingCommit, EventStages)> {
        if stages.ratings_finalized {
            return Err(EngineError::invalid_state("ratings are already finalized"));
        }

        let gate = self.completion(stages);
        let commit = commit_ratings(
            &gate,
            roster,
            self.config.rating.elite_threshold,
            chrono::Utc::now(),
        )?;

        let mut updated = stages.clone();
        updated.ratings_finalized = true;
        updated.finalized_at = Some(commit.committed_at);

        tracing::info!(
            "Event {}: ratings finalized for {} entrants ({} milestones)",
            stages.event_id,
            commit.entrants.len(),
            commit.milestones.len()
        );
        Ok((commit, updated))
    }

    /// Sizing of the first knockout round for a field of `entrants`, after
    /// the pre-cut: `(cut, byes, matches)`.
    pub fn preview_knockout(&self, entrants: usize) -> Option<(usize, usize, usize)> {
        let cut = self.config.knockout.precut().cut_count(entrants);
        bracket_size(entrants - cut).map(|size| (cut, size.byes, size.matches))
    }
}

fn round_step(fixtures: &[Fixture], byes: usize, cut: usize, round: u32) -> KnockoutStep {
    KnockoutStep::Round {
        round,
        matches: fixtures.len(),
        byes,
        cut,
    }
}

fn position(entrants: &[Entrant], id: EntrantId) -> Result<usize> {
    entrants
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| EngineError::not_found("entrant", id))
}

/// Non-empty roster, unique ids, named entrants.
pub fn validate_roster(roster: &[Entrant]) -> Result<()> {
    if roster.is_empty() {
        return Err(EngineError::invalid_input("no entrants"));
    }

    let mut seen = HashSet::with_capacity(roster.len());
    for entrant in roster {
        if !seen.insert(entrant.id) {
            return Err(EngineError::invalid_input(format!(
                "entrant {} appears more than once",
                entrant.id
            )));
        }
        if entrant.name.trim().is_empty() {
            return Err(EngineError::invalid_input(format!(
                "entrant {} has no name",
                entrant.id
            )));
        }
    }
    Ok(())
}
