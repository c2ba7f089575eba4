use crate::domain::model::{Entrant, EventId, EventStages};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the registered entrants of an event, with their rank key and
/// provisional rating accumulators.
pub trait RosterProvider: Send + Sync {
    fn roster(
        &self,
        event: EventId,
    ) -> impl std::future::Future<Output = Result<Vec<Entrant>>> + Send;
    fn store_roster(
        &self,
        event: EventId,
        entrants: &[Entrant],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Persists the stages and fixtures the engine proposes and hands back the
/// recorded results.
#[async_trait]
pub trait FixtureSink: Send + Sync {
    async fn stages(&self, event: EventId) -> Result<EventStages>;
    async fn store_stages(&self, stages: &EventStages) -> Result<()>;
}

/// Per-match rating movement applied to provisional ratings.
pub trait RatingStrategy: Send + Sync {
    /// Returns `(winner_delta, loser_delta)`.
    fn deltas(&self, winner_rating: i32, loser_rating: i32) -> (i32, i32);
}
