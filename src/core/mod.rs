pub mod bracket;
pub mod completion;
pub mod engine;
pub mod grouping;
pub mod progression;
pub mod rating;
pub mod round_robin;
pub mod seeding;

pub use crate::domain::model::{BracketRound, Entrant, EventStages, Fixture, Group};
pub use crate::domain::ports::{FixtureSink, RatingStrategy, RosterProvider};
pub use crate::utils::error::Result;
