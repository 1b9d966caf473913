pub mod app;
pub mod commands;
pub mod display;
pub mod error_handler;
pub mod play;

pub use app::{App, Config};
pub use commands::{Cli, Commands, ConfigCommand, GuestCommand, TuneArgs};
pub use display::{
    display_board, display_game_over, display_move_history, render_board, render_game_over,
    render_move_history, render_stats, supports_unicode, BoardView,
};
pub use error_handler::{
    create_input_validation_error, create_network_timeout_error, display_error,
    display_error_and_exit, is_recoverable_error, CliError, CliResult,
};
pub use play::{parse_play_command, run_interactive, CommandOutcome, PlayCommand, PlaySession};
