use crate::app::service::TournamentService;
use crate::core::engine::KnockoutStep;
use crate::domain::model::{Entrant, EntrantId, EventId, Fixture, RatingCommit};
use crate::domain::ports::{FixtureSink, RosterProvider};
use crate::utils::error::{EngineError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub event: EventId,
    pub groups: usize,
    pub group_fixtures: usize,
    pub knockout_rounds: usize,
    pub knockout_fixtures: usize,
    pub champion: EntrantId,
    pub commit: RatingCommit,
}

/// Plays a whole event with scripted results: the entrant with the better
/// rank key wins 2-1 (lower id on equal ratings).
pub async fn simulate<R: RosterProvider, F: FixtureSink>(
    service: &TournamentService<R, F>,
    event: EventId,
    entrants: Vec<Entrant>,
) -> Result<SimulationReport> {
    service.register_roster(event, entrants).await?;

    let groups = service.form_groups(event).await?;
    let group_fixtures: Vec<Fixture> = groups.iter().flat_map(|g| g.fixtures.clone()).collect();
    for fixture in &group_fixtures {
        play(service, event, fixture).await?;
    }
    tracing::info!(
        "Event {}: group stage played ({} fixtures)",
        event,
        group_fixtures.len()
    );

    let mut knockout_rounds = 0;
    let mut knockout_fixtures = 0;
    let champion = loop {
        match service.form_knockout_round(event).await? {
            KnockoutStep::Round { round, .. } => {
                knockout_rounds += 1;
                let stages = service.stages(event).await?;
                let current = stages
                    .rounds
                    .iter()
                    .find(|r| r.round == round)
                    .ok_or_else(|| EngineError::not_found("knockout round", round))?;
                for fixture in &current.fixtures {
                    play(service, event, fixture).await?;
                    knockout_fixtures += 1;
                }
            }
            KnockoutStep::Champion(champion) => break champion,
        }
    };

    let commit = service.finalize_ratings(event).await?;

    Ok(SimulationReport {
        event,
        groups: groups.len(),
        group_fixtures: group_fixtures.len(),
        knockout_rounds,
        knockout_fixtures,
        champion,
        commit,
    })
}

async fn play<R: RosterProvider, F: FixtureSink>(
    service: &TournamentService<R, F>,
    event: EventId,
    fixture: &Fixture,
) -> Result<()> {
    let roster = service.roster(event).await?;
    let rating = |id: Option<EntrantId>| -> Result<(i32, EntrantId)> {
        let id = id.ok_or_else(|| {
            EngineError::invalid_input(format!("fixture {} is missing an entrant", fixture.id))
        })?;
        roster
            .iter()
            .find(|e| e.id == id)
            .map(|e| (e.rank_key(), e.id))
            .ok_or_else(|| EngineError::not_found("entrant", id))
    };

    let (home_rating, home) = rating(fixture.home)?;
    let (away_rating, away) = rating(fixture.away)?;
    let home_wins = home_rating > away_rating || (home_rating == away_rating && home < away);
    let (home_score, away_score) = if home_wins { (2, 1) } else { (1, 2) };

    service
        .record_result(event, fixture.id, home_score, away_score)
        .await?;
    Ok(())
}
