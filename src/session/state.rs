use crate::chess::{
    export_pgn, Board, ChessError, Color, PgnHeaders, PgnMove, TerminalResult,
};
use crate::messages::{EngineStats, GetMoveRequest};
use crate::network::ServiceError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Where a session stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    AwaitingHumanMove,
    AwaitingBotMove,
    Terminal,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::AwaitingHumanMove => "awaiting_human_move",
            SessionStatus::AwaitingBotMove => "awaiting_bot_move",
            SessionStatus::Terminal => "terminal",
        }
    }

    /// A game is running: somebody is expected to move
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            SessionStatus::AwaitingHumanMove | SessionStatus::AwaitingBotMove
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who made a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mover {
    User,
    Bot,
}

impl Mover {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mover::User => "user",
            Mover::Bot => "bot",
        }
    }
}

impl fmt::Display for Mover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One half-move of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub uci: String,
    pub san: String,
    pub color: Color,
    pub by: Mover,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No game in progress")]
    NoActiveGame,

    #[error("A game is already in progress ({status})")]
    GameInProgress { status: SessionStatus },

    #[error("It is not your turn (session is {status})")]
    NotAwaitingHumanMove { status: SessionStatus },

    #[error("It is {expected}'s turn, not {actual}'s")]
    WrongSide { expected: Color, actual: Color },

    #[error("Illegal move: {0}")]
    IllegalMove(ChessError),

    #[error("Game is already over: {0}")]
    GameOver(TerminalResult),

    #[error("Cannot resign while the session is {status}")]
    CannotResign { status: SessionStatus },

    #[error("No bot request is pending")]
    NothingPending,

    #[error("Bot service sent an unusable game: {0}")]
    InvalidStart(String),

    #[error("Bot service sent an unusable reply: {0}")]
    InvalidReply(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// A game against the bot, from start request to result.
///
/// The session is a plain value: every transition goes through a `&mut self`
/// method that either succeeds completely or leaves the session untouched.
/// The side to move is always read from the board.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) session_id: String,
    pub(crate) game_id: Option<String>,
    pub(crate) human_color: Color,
    pub(crate) status: SessionStatus,
    pub(crate) board: Board,
    pub(crate) start_fen: String,
    pub(crate) move_clock_start: Instant,
    pub(crate) history: Vec<MoveRecord>,
    pub(crate) last_stats: Option<EngineStats>,
    pub(crate) last_error: Option<ServiceError>,
    pub(crate) result: Option<TerminalResult>,
    pub(crate) pending: Option<GetMoveRequest>,
    pub(crate) desync_count: u32,
    pub(crate) started_at: DateTime<Local>,
}

impl Session {
    /// Fresh idle session
    pub fn new() -> Self {
        let board = Board::new();
        Self {
            session_id: crate::messages::chess::generate_session_id(),
            game_id: None,
            human_color: Color::White,
            status: SessionStatus::Idle,
            start_fen: board.to_fen(),
            board,
            move_clock_start: Instant::now(),
            history: Vec::new(),
            last_stats: None,
            last_error: None,
            result: None,
            pending: None,
            desync_count: 0,
            started_at: Local::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Identifier the bot service gave this game
    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn human_color(&self) -> Color {
        self.human_color
    }

    pub fn bot_color(&self) -> Color {
        self.human_color.opposite()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn last_stats(&self) -> Option<&EngineStats> {
        self.last_stats.as_ref()
    }

    /// Most recent bot service failure, cleared by the next successful reply
    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    pub fn result(&self) -> Option<&TerminalResult> {
        self.result.as_ref()
    }

    /// Request to send (again) while waiting for the bot
    pub fn pending_request(&self) -> Option<&GetMoveRequest> {
        self.pending.as_ref()
    }

    /// Times the local board was replaced by the service's position
    pub fn desync_count(&self) -> u32 {
        self.desync_count
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Time since the last transition
    pub fn elapsed(&self) -> Duration {
        self.move_clock_start.elapsed()
    }

    /// Color allowed to move right now, `None` when no game is running
    pub fn side_to_move(&self) -> Option<Color> {
        if self.status.is_in_progress() {
            Some(self.board.active_color())
        } else {
            None
        }
    }

    pub fn is_human_turn(&self) -> bool {
        self.status == SessionStatus::AwaitingHumanMove
    }

    pub fn is_terminal(&self) -> bool {
        self.status == SessionStatus::Terminal
    }

    /// Export the game so far as PGN
    pub fn to_pgn(&self) -> String {
        let date = self.started_at.format("%Y.%m.%d").to_string();
        let headers = PgnHeaders::for_session(self.human_color, &self.start_fen, &date);

        let start = Board::from_fen(&self.start_fen).unwrap_or_default();
        let first_mover = self
            .history
            .first()
            .map(|record| record.color)
            .unwrap_or_else(|| start.active_color());

        let moves: Vec<PgnMove> = self
            .history
            .iter()
            .map(|record| PgnMove {
                san: record.san.clone(),
                comment: Some(format!("By: {}", record.by)),
            })
            .collect();

        export_pgn(
            &headers,
            first_mover,
            start.fullmove_number(),
            &moves,
            self.result.as_ref(),
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
