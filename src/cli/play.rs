//! Interactive game loop for `morph play`.

use super::display::{
    render_board, render_board_status, render_game_over, render_move_history, render_stats,
    BoardView,
};
use super::error_handler::{
    create_input_validation_error, display_error, is_recoverable_error, CliResult,
};
use crate::chess::{Board, Color, Move, Square};
use crate::messages::Side;
use crate::network::BotService;
use crate::session::{GameDriver, SessionError, SessionStatus, TurnReport};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::future::Future;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  e2e4, e7e8q, O-O   play a move (UCI notation or castling)
  hint <square>      show where the piece on <square> can go
  board              show the board
  moves              show the move list
  pgn                print the game as PGN
  stats              show the bot's last engine statistics
  retry              ask the bot again after a failed request
  resign             give up the current game
  new [side]         start a new game (white, black or random)
  help               show this help
  quit               leave
";

/// One line of input in the play loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Move(Move),
    Hint(Square),
    Board,
    Moves,
    Pgn,
    Stats,
    Retry,
    Resign,
    New(Option<Side>),
    Help,
    Quit,
}

/// Parse a line typed at the play prompt. Blank lines yield `None`.
///
/// `to_move` decides which rank `O-O` / `O-O-O` refer to.
pub fn parse_play_command(input: &str, to_move: Color) -> CliResult<Option<PlayCommand>> {
    let mut parts = input.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();

    let command = match head.to_lowercase().as_str() {
        "help" | "?" => PlayCommand::Help,
        "quit" | "exit" => PlayCommand::Quit,
        "board" => PlayCommand::Board,
        "moves" | "history" => PlayCommand::Moves,
        "pgn" => PlayCommand::Pgn,
        "stats" => PlayCommand::Stats,
        "retry" => PlayCommand::Retry,
        "resign" => PlayCommand::Resign,
        "hint" => {
            let value = arg.ok_or_else(|| {
                create_input_validation_error("square", "", "hint needs a square, e.g. 'hint e2'")
            })?;
            let square = value.parse::<Square>().map_err(|e| {
                create_input_validation_error("square", value, &e.to_string())
            })?;
            PlayCommand::Hint(square)
        }
        "new" => match arg {
            Some(value) => {
                let side = value
                    .parse::<Side>()
                    .map_err(|e| create_input_validation_error("side", value, &e))?;
                PlayCommand::New(Some(side))
            }
            None => PlayCommand::New(None),
        },
        "move" => {
            let value = arg.ok_or_else(|| {
                create_input_validation_error("chess_move", "", "no move given")
            })?;
            PlayCommand::Move(Move::from_str_with_color(value, to_move)?)
        }
        _ => match Move::from_str_with_color(head, to_move) {
            Ok(mv) => PlayCommand::Move(mv),
            Err(e) if looks_like_move(head) => return Err(e.into()),
            Err(_) => {
                return Err(create_input_validation_error(
                    "command",
                    input.trim(),
                    "unknown command",
                ))
            }
        },
    };

    Ok(Some(command))
}

fn looks_like_move(token: &str) -> bool {
    let first = token.chars().next().map(|c| c.to_ascii_lowercase());
    matches!(first, Some('a'..='h') | Some('o') | Some('0')) && (4..=7).contains(&token.len())
}

/// Result of executing one command
#[derive(Debug, Default)]
pub struct CommandOutcome {
    pub output: String,
    pub quit: bool,
}

impl CommandOutcome {
    fn text(output: String) -> Self {
        Self {
            output,
            quit: false,
        }
    }
}

/// The play loop's state: a game driver plus display preferences
pub struct PlaySession<B: BotService> {
    driver: GameDriver<B>,
    unicode: bool,
    last_side: Side,
}

impl<B: BotService> PlaySession<B> {
    pub fn new(driver: GameDriver<B>, side: Side, unicode: bool) -> Self {
        Self {
            driver,
            unicode,
            last_side: side,
        }
    }

    pub fn driver(&self) -> &GameDriver<B> {
        &self.driver
    }

    /// Text shown before reading the next line
    pub fn prompt(&self) -> String {
        let session = self.driver.session();
        match session.status() {
            SessionStatus::AwaitingHumanMove => format!(
                "{} (you) to move, move #{} > ",
                session.human_color(),
                session.board().fullmove_number()
            ),
            SessionStatus::AwaitingBotMove => "waiting for the bot, type 'retry' > ".to_string(),
            SessionStatus::Terminal => "game over, 'new' to play again > ".to_string(),
            SessionStatus::Idle => "no game, 'new' to start > ".to_string(),
        }
    }

    /// Run `command` unless `interrupt` completes first. Returns `None` when
    /// interrupted; an unanswered bot request then stays pending.
    pub async fn execute_until<F>(
        &mut self,
        command: PlayCommand,
        interrupt: F,
    ) -> Option<CliResult<CommandOutcome>>
    where
        F: Future,
    {
        tokio::select! {
            outcome = self.execute(command) => Some(outcome),
            _ = interrupt => None,
        }
    }

    pub async fn execute(&mut self, command: PlayCommand) -> CliResult<CommandOutcome> {
        debug!("Executing {:?}", command);
        match command {
            PlayCommand::Move(mv) => {
                let report = self.driver.play(mv).await?;
                Ok(CommandOutcome::text(self.render_turn(&report)))
            }
            PlayCommand::Retry => {
                let report = self.driver.retry().await?;
                Ok(CommandOutcome::text(self.render_turn(&report)))
            }
            PlayCommand::New(side) => {
                let side = side.unwrap_or(self.last_side);
                self.last_side = side;
                let report = self.driver.start_game(side).await?;
                let session = self.driver.session();
                let mut out = format!(
                    "🎮 New game {} - you play {}\n",
                    session.game_id().unwrap_or("?"),
                    session.human_color()
                );
                out.push_str(&self.render_turn(&report));
                Ok(CommandOutcome::text(out))
            }
            PlayCommand::Resign => {
                let result = self.driver.resign()?;
                let human = self.driver.session().human_color();
                Ok(CommandOutcome::text(format!(
                    "🏳️  You resigned.\n{}\n",
                    render_game_over(&result, human)
                )))
            }
            PlayCommand::Hint(square) => self.hint(square).map(CommandOutcome::text),
            PlayCommand::Board => {
                self.require_game()?;
                Ok(CommandOutcome::text(self.render_position(BoardView::new(
                    self.unicode,
                ))))
            }
            PlayCommand::Moves => {
                self.require_game()?;
                let session = self.driver.session();
                let first_move_number = Board::from_fen(session.start_fen())
                    .map(|b| b.fullmove_number())
                    .unwrap_or(1);
                Ok(CommandOutcome::text(render_move_history(
                    session.history(),
                    first_move_number,
                )))
            }
            PlayCommand::Pgn => {
                self.require_game()?;
                Ok(CommandOutcome::text(self.driver.session().to_pgn()))
            }
            PlayCommand::Stats => {
                self.require_game()?;
                let text = match self.driver.session().last_stats() {
                    Some(stats) => render_stats(stats),
                    None => "No engine statistics yet".to_string(),
                };
                Ok(CommandOutcome::text(format!("{}\n", text)))
            }
            PlayCommand::Help => Ok(CommandOutcome::text(HELP.to_string())),
            PlayCommand::Quit => Ok(CommandOutcome {
                output: String::new(),
                quit: true,
            }),
        }
    }

    fn require_game(&self) -> CliResult<()> {
        if self.driver.session().status() == SessionStatus::Idle {
            return Err(SessionError::NoActiveGame.into());
        }
        Ok(())
    }

    fn hint(&self, square: Square) -> CliResult<String> {
        let session = self.driver.session();
        if session.status() != SessionStatus::AwaitingHumanMove {
            return Err(SessionError::NotAwaitingHumanMove {
                status: session.status(),
            }
            .into());
        }

        let targets = session.board().legal_targets(square);
        if targets.is_empty() {
            return Ok(format!("No legal moves from {}\n", square));
        }

        let names: Vec<String> = targets.iter().map(|s| s.to_string()).collect();
        let view = BoardView::new(self.unicode).with_hints(square, targets);
        let mut out = self.render_position(view);
        let _ = writeln!(out, "{} can go to: {}", square, names.join(", "));
        Ok(out)
    }

    fn render_position(&self, view: BoardView) -> String {
        let session = self.driver.session();
        let mut out = String::from("\n");
        out.push_str(&render_board(session.board(), session.human_color(), &view));
        out.push_str(&render_board_status(session.board()));
        out
    }

    fn render_turn(&self, report: &TurnReport) -> String {
        let session = self.driver.session();
        let mut out = String::new();

        if let Some(human) = &report.human_move {
            let _ = writeln!(out, "You: {}", human.san);
        }
        for bot in &report.bot_moves {
            let _ = writeln!(out, "Bot: {}", bot.san);
        }
        if report.resynced {
            out.push_str("⚠️  Board resynchronized with the bot service\n");
        }
        if !report.bot_moves.is_empty() {
            if let Some(stats) = session.last_stats() {
                let _ = writeln!(out, "   {}", render_stats(stats));
            }
        }

        out.push_str(&self.render_position(BoardView::new(self.unicode)));

        if let Some(result) = &report.result {
            let _ = writeln!(out, "\n{}", "=".repeat(40));
            let _ = writeln!(out, "{}", render_game_over(result, session.human_color()));
            let _ = writeln!(out, "{}", "=".repeat(40));
        }
        out
    }
}

/// Run the interactive loop on stdin/stdout until `quit`, end of input or Ctrl-C
pub async fn run_interactive<B: BotService>(
    driver: GameDriver<B>,
    side: Side,
    unicode: bool,
) -> Result<()> {
    let mut play = PlaySession::new(driver, side, unicode);
    println!("Type 'help' for commands.");
    match play
        .execute_until(PlayCommand::New(Some(side)), tokio::signal::ctrl_c())
        .await
    {
        Some(outcome) => {
            report(outcome);
        }
        None => {
            interrupted();
            return Ok(());
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", play.prompt());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = tokio::signal::ctrl_c() => {
                interrupted();
                break;
            }
        };

        let Some(line) = line else {
            println!();
            break;
        };

        let to_move = play.driver().session().board().active_color();
        let command = match parse_play_command(&line, to_move) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                display_error(&e);
                continue;
            }
        };

        match play.execute_until(command, tokio::signal::ctrl_c()).await {
            Some(outcome) => {
                if report(outcome) {
                    break;
                }
            }
            None => {
                interrupted();
                break;
            }
        }
    }

    Ok(())
}

fn interrupted() {
    println!();
    info!("Interrupted");
}

/// Print an outcome or an error; true when the loop should stop
fn report(outcome: CliResult<CommandOutcome>) -> bool {
    match outcome {
        Ok(outcome) => {
            print!("{}", outcome.output);
            outcome.quit
        }
        Err(e) => {
            if !is_recoverable_error(&e) {
                warn!("Game needs a restart: {}", e);
            }
            display_error(&e);
            false
        }
    }
}
