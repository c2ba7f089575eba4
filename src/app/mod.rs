pub mod service;
pub mod simulation;
