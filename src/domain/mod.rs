// Domain layer: models and ports. Nothing here knows about storage or the CLI.

pub mod model;
pub mod ports;
