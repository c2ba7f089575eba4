#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{
    CompletionConfig, EngineConfig, GroupsConfig, KnockoutConfig, RatingConfig, ResultsConfig,
    SeedingPolicy, StrategyKind, TieBreak,
};
