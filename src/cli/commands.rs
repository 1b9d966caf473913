use crate::messages::Side;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "morph")]
#[command(version)]
#[command(about = "Play chess against the ChessMorph bot from your terminal")]
pub struct Cli {
    /// Bot service base URL (overrides MORPH_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive game against the bot
    ///
    /// Moves are entered in UCI notation (e2e4, e7e8q) or as O-O / O-O-O.
    /// Type 'help' during the game for the list of commands.
    ///
    /// Examples:
    ///   morph play
    ///   morph play --side black
    ///   morph play --side random
    Play {
        /// Side to play: 'white', 'black' or 'random' (default from config)
        #[arg(short, long)]
        side: Option<Side>,
    },

    /// Check that the bot service is reachable
    ///
    /// Example: morph health
    Health,

    /// Manage the anonymous guest id sent with every new game
    Guest {
        #[command(subcommand)]
        command: GuestCommand,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Adjust the bot's tuning parameters on the service
    ///
    /// Only the given values are sent; everything else keeps its current
    /// setting on the service.
    ///
    /// Examples:
    ///   morph tune --user-winning-margin 300
    ///   morph tune --fast-play-limit 2.5 --mistake-severe-min 300
    Tune(TuneArgs),
}

#[derive(Subcommand)]
pub enum GuestCommand {
    /// Show the current guest id
    Show,
    /// Replace the guest id with a new one
    Reset,
    /// Show where the guest id is stored
    Path,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Show the configuration file location
    Path,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TuneArgs {
    /// Centipawn lead above which the bot stops going easy on you
    #[arg(long)]
    pub user_winning_margin: Option<i64>,
    /// Centipawn deficit below which the bot starts helping you
    #[arg(long)]
    pub user_losing_margin: Option<i64>,
    /// Seconds under which a move counts as fast play
    #[arg(long)]
    pub fast_play_limit: Option<f64>,
    /// Minimum evaluation drop for a severe bot mistake
    #[arg(long)]
    pub mistake_severe_min: Option<i64>,
    /// Minimum evaluation drop for a natural-looking bot mistake
    #[arg(long)]
    pub mistake_natural_min: Option<i64>,
    /// Maximum evaluation drop for a natural-looking bot mistake
    #[arg(long)]
    pub mistake_natural_max: Option<i64>,
}

impl From<TuneArgs> for crate::messages::ConfigUpdate {
    fn from(args: TuneArgs) -> Self {
        Self {
            user_winning_margin: args.user_winning_margin,
            user_losing_margin: args.user_losing_margin,
            fast_play_limit: args.fast_play_limit,
            mistake_severe_min: args.mistake_severe_min,
            mistake_natural_min: args.mistake_natural_min,
            mistake_natural_max: args.mistake_natural_max,
        }
    }
}
