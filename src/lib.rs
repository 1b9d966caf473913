pub mod chess;
pub mod cli;
pub mod identity;
pub mod messages;
pub mod network;
pub mod session;

// Re-export key types for easy testing
pub use chess::{Board, Color, Move, Square, TerminalReason, TerminalResult, Winner};
pub use identity::GuestId;
pub use messages::{GetMoveRequest, GetMoveResponse, Side, StartGameRequest, StartGameResponse};
pub use network::{BotClient, BotService, RetryPolicy, ServiceError};
pub use session::{GameDriver, Session, SessionError, SessionStatus};
