use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tourney")]
#[command(about = "Group stage and knockout bracket planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the groups, fixtures and first knockout round for a roster
    Plan {
        /// JSON roster: [{"id", "name", "rating"}, ...]
        #[arg(short, long)]
        roster: String,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Play a whole event with scripted results and finalize ratings
    Simulate {
        #[arg(short, long)]
        roster: String,

        #[arg(short, long)]
        config: Option<String>,

        /// Directory for fixtures.csv and ratings.json
        #[arg(short, long, default_value = "./output")]
        output: String,
    },
}
