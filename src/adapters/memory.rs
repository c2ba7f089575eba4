use crate::domain::model::{Entrant, EventId, EventStages};
use crate::domain::ports::{FixtureSink, RosterProvider};
use crate::utils::error::{EngineError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct EventRecord {
    roster: Vec<Entrant>,
    stages: EventStages,
}

/// In-process store for rosters and stages, keyed by event.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Arc<Mutex<HashMap<EventId, EventRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterProvider for MemoryStore {
    async fn roster(&self, event: EventId) -> Result<Vec<Entrant>> {
        let events = self.events.lock().await;
        events
            .get(&event)
            .map(|record| record.roster.clone())
            .ok_or_else(|| EngineError::not_found("event", event))
    }

    async fn store_roster(&self, event: EventId, entrants: &[Entrant]) -> Result<()> {
        let mut events = self.events.lock().await;
        events
            .entry(event)
            .and_modify(|record| record.roster = entrants.to_vec())
            .or_insert_with(|| EventRecord {
                roster: entrants.to_vec(),
                stages: EventStages::new(event),
            });
        Ok(())
    }
}

#[async_trait]
impl FixtureSink for MemoryStore {
    async fn stages(&self, event: EventId) -> Result<EventStages> {
        let events = self.events.lock().await;
        events
            .get(&event)
            .map(|record| record.stages.clone())
            .ok_or_else(|| EngineError::not_found("event", event))
    }

    async fn store_stages(&self, stages: &EventStages) -> Result<()> {
        let mut events = self.events.lock().await;
        let record = events
            .get_mut(&stages.event_id)
            .ok_or_else(|| EngineError::not_found("event", stages.event_id))?;
        record.stages = stages.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.roster(EventId(3)).await,
            Err(EngineError::NotFound { .. })
        ));
        assert!(matches!(
            store.stages(EventId(3)).await,
            Err(EngineError::NotFound { .. })
        ));
        assert!(store.store_stages(&EventStages::new(EventId(3))).await.is_err());
    }

    #[tokio::test]
    async fn test_roster_registration_creates_empty_stages() {
        let store = MemoryStore::new();
        let roster = vec![Entrant::new(1, "a", 1500), Entrant::new(2, "b", 1600)];
        store.store_roster(EventId(1), &roster).await.unwrap();

        assert_eq!(store.roster(EventId(1)).await.unwrap(), roster);
        let stages = store.stages(EventId(1)).await.unwrap();
        assert!(stages.groups.is_empty());
        assert!(stages.rounds.is_empty());
    }
}
