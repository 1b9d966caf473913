// Re-export all public items
pub use self::board::{Board, PlayedMove, STARTING_FEN};
pub use self::error::ChessError;
pub use self::moves::{Move, NULL_MOVE};
pub use self::outcome::{TerminalReason, TerminalResult, Winner};
pub use self::pgn::{export_pgn, PgnHeaders, PgnMove};
pub use self::piece::{Color, Piece, PieceType};
pub use self::square::Square;

// Define submodules
mod board;
mod error;
mod moves;
mod outcome;
pub mod pgn;
mod piece;
mod square;
