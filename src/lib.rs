pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::Cli;

pub use crate::adapters::memory::MemoryStore;
pub use crate::app::service::TournamentService;
pub use crate::config::EngineConfig;
pub use crate::core::engine::{KnockoutStep, TournamentEngine};
pub use crate::domain::model::{Entrant, EntrantId, EventId, EventStages, FixtureId, StageId};
pub use crate::utils::error::{EngineError, Result};
