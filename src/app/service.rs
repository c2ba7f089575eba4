use crate::core::completion::GateStatus;
use crate::core::engine::{validate_roster, KnockoutStep, TournamentEngine};
use crate::domain::model::{Entrant, EventId, EventStages, Fixture, FixtureId, Group, RatingCommit};
use crate::domain::ports::{FixtureSink, RosterProvider};
use crate::utils::error::{EngineError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stage triggers over a roster provider and a fixture sink.
///
/// Operations on the same event run one at a time: each one takes the
/// event's lock, loads a snapshot, runs the engine, and writes back only if
/// the engine succeeded.
pub struct TournamentService<R: RosterProvider, F: FixtureSink> {
    roster: R,
    sink: F,
    engine: TournamentEngine,
    locks: Mutex<HashMap<EventId, Arc<Mutex<()>>>>,
}

impl<R: RosterProvider, F: FixtureSink> TournamentService<R, F> {
    pub fn new(roster: R, sink: F, engine: TournamentEngine) -> Self {
        Self {
            roster,
            sink,
            engine,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &TournamentEngine {
        &self.engine
    }

    async fn event_lock(&self, event: EventId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(event).or_default().clone()
    }

    /// Registers the entrants of a new event. Refused once any stage exists.
    pub async fn register_roster(&self, event: EventId, entrants: Vec<Entrant>) -> Result<()> {
        let lock = self.event_lock(event).await;
        let _guard = lock.lock().await;

        validate_roster(&entrants)?;
        match self.sink.stages(event).await {
            Ok(stages) if !stages.groups.is_empty() || !stages.rounds.is_empty() => {
                return Err(EngineError::invalid_state(format!(
                    "event {} already has stages; its roster is frozen",
                    event
                )));
            }
            Ok(_) | Err(EngineError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.roster.store_roster(event, &entrants).await?;
        tracing::info!("Event {}: registered {} entrants", event, entrants.len());
        Ok(())
    }

    pub async fn form_groups(&self, event: EventId) -> Result<Vec<Group>> {
        let lock = self.event_lock(event).await;
        let _guard = lock.lock().await;

        let roster = self.roster.roster(event).await?;
        let stages = self.sink.stages(event).await?;
        let updated = self
            .engine
            .form_groups(&roster, &stages)
            .inspect_err(|e| tracing::warn!("Event {}: group formation refused: {}", event, e))?;

        self.sink.store_stages(&updated).await?;
        Ok(updated.groups)
    }

    pub async fn form_knockout_round(&self, event: EventId) -> Result<KnockoutStep> {
        let lock = self.event_lock(event).await;
        let _guard = lock.lock().await;

        let roster = self.roster.roster(event).await?;
        let stages = self.sink.stages(event).await?;
        let (updated, step) = self
            .engine
            .form_knockout_round(&roster, &stages)
            .inspect_err(|e| tracing::warn!("Event {}: knockout round refused: {}", event, e))?;

        self.sink.store_stages(&updated).await?;
        Ok(step)
    }

    pub async fn record_result(
        &self,
        event: EventId,
        fixture: FixtureId,
        home_score: u32,
        away_score: u32,
    ) -> Result<Fixture> {
        let lock = self.event_lock(event).await;
        let _guard = lock.lock().await;

        let roster = self.roster.roster(event).await?;
        let stages = self.sink.stages(event).await?;
        let (entrants, updated) = self
            .engine
            .record_result(&roster, &stages, fixture, home_score, away_score)
            .inspect_err(|e| tracing::warn!("Event {}: result for {} refused: {}", event, fixture, e))?;

        let recorded = updated
            .fixture(fixture)
            .cloned()
            .ok_or_else(|| EngineError::not_found("fixture", fixture))?;
        self.sink.store_stages(&updated).await?;
        if let Err(e) = self.roster.store_roster(event, &entrants).await {
            self.restore_stages(&stages).await;
            return Err(e);
        }
        Ok(recorded)
    }

    pub async fn completion(&self, event: EventId) -> Result<GateStatus> {
        let stages = self.sink.stages(event).await?;
        Ok(self.engine.completion(&stages))
    }

    pub async fn finalize_ratings(&self, event: EventId) -> Result<RatingCommit> {
        let lock = self.event_lock(event).await;
        let _guard = lock.lock().await;

        let roster = self.roster.roster(event).await?;
        let stages = self.sink.stages(event).await?;
        let (commit, updated) = self
            .engine
            .finalize_ratings(&roster, &stages)
            .inspect_err(|e| tracing::warn!("Event {}: finalize refused: {}", event, e))?;

        self.roster.store_roster(event, &commit.entrants).await?;
        if let Err(e) = self.sink.store_stages(&updated).await {
            self.restore_roster(event, &roster).await;
            return Err(e);
        }
        Ok(commit)
    }

    // The second write of an operation failed: put the first one back.
    async fn restore_stages(&self, snapshot: &EventStages) {
        if let Err(e) = self.sink.store_stages(snapshot).await {
            tracing::error!("Event {}: could not restore stages: {}", snapshot.event_id, e);
        }
    }

    async fn restore_roster(&self, event: EventId, snapshot: &[Entrant]) {
        if let Err(e) = self.roster.store_roster(event, snapshot).await {
            tracing::error!("Event {}: could not restore roster: {}", event, e);
        }
    }

    pub async fn stages(&self, event: EventId) -> Result<EventStages> {
        self.sink.stages(event).await
    }

    pub async fn roster(&self, event: EventId) -> Result<Vec<Entrant>> {
        self.roster.roster(event).await
    }
}
