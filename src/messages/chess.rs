use super::types::{GetMoveRequest, GetMoveResponse, StartGameResponse};
use crate::chess::{Board, NULL_MOVE};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Longest game identifier accepted from the service
const MAX_GAME_ID_LEN: usize = 128;

/// Generate a new local session identifier using UUID v4
///
/// The service hands out its own game ids; this id only names the local
/// session in logs.
///
/// # Examples
///
/// ```
/// use morph::messages::chess::generate_session_id;
///
/// let id = generate_session_id();
/// assert_eq!(id.len(), 36);
/// ```
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validate that a string looks like a game id issued by the service
///
/// Service ids are opaque (database object ids, UUIDs): any non-empty run
/// of ASCII letters, digits, `-` and `_` up to 128 characters is accepted.
///
/// # Examples
///
/// ```
/// use morph::messages::chess::validate_game_id;
///
/// assert!(validate_game_id("65a1f0c2e4b0a1b2c3d4e5f6"));
/// assert!(!validate_game_id(""));
/// assert!(!validate_game_id("has spaces"));
/// ```
pub fn validate_game_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_GAME_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Generate a SHA-256 hash of the current position
///
/// The position part of the FEN (placement, side to move, castling rights,
/// en passant square) is hashed; the halfmove clock and fullmove number are
/// left out so that two sides disagreeing only on clock fields are not
/// reported as out of sync.
///
/// # Arguments
///
/// * `board` - The chess board to hash
///
/// # Returns
///
/// A lowercase hexadecimal string representation of the SHA-256 hash
///
/// # Examples
///
/// ```
/// use morph::chess::Board;
/// use morph::messages::chess::hash_board_state;
///
/// let board = Board::new();
/// let hash = hash_board_state(&board);
/// assert_eq!(hash.len(), 64);
/// ```
pub fn hash_board_state(board: &Board) -> String {
    let mut hasher = Sha256::new();
    hasher.update(board.position_key().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hash a FEN string the same way [`hash_board_state`] hashes a board
///
/// The FEN is parsed first so formatting differences (extra whitespace, an
/// en passant square that no pawn can use) do not change the hash.
pub fn hash_fen(fen: &str) -> Result<String, ValidationError> {
    let board = Board::from_fen(fen).map_err(|e| ValidationError::InvalidFen(e.to_string()))?;
    Ok(hash_board_state(&board))
}

/// Verify that a board state matches the expected hash
///
/// # Examples
///
/// ```
/// use morph::chess::Board;
/// use morph::messages::chess::{hash_board_state, verify_board_hash};
///
/// let board = Board::new();
/// let hash = hash_board_state(&board);
/// assert!(verify_board_hash(&board, &hash));
///
/// let wrong_hash = "0000000000000000000000000000000000000000000000000000000000000000";
/// assert!(!verify_board_hash(&board, wrong_hash));
/// ```
pub fn verify_board_hash(board: &Board, expected_hash: &str) -> bool {
    let computed_hash = hash_board_state(board);

    // Compare hashes in a case-insensitive manner
    computed_hash.eq_ignore_ascii_case(expected_hash)
}

/// Validation failures for Bot Service payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Game id missing or malformed
    InvalidGameId(String),
    /// Move string is not UCI
    InvalidMove(String),
    /// Board state hash is not a SHA-256 hex digest
    InvalidBoardHash(String),
    /// FEN the rules engine cannot load
    InvalidFen(String),
    /// Numeric or structural problem in a payload
    InvalidMessageFormat(String),
    /// Board state hash mismatch during verification
    BoardHashMismatch { expected: String, actual: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidGameId(msg) => write!(f, "Invalid game ID: {}", msg),
            ValidationError::InvalidMove(msg) => write!(f, "Invalid chess move: {}", msg),
            ValidationError::InvalidBoardHash(msg) => write!(f, "Invalid board hash: {}", msg),
            ValidationError::InvalidFen(msg) => write!(f, "Invalid FEN notation: {}", msg),
            ValidationError::InvalidMessageFormat(msg) => {
                write!(f, "Invalid message format: {}", msg)
            }
            ValidationError::BoardHashMismatch { expected, actual } => {
                write!(
                    f,
                    "Board hash mismatch: expected '{}', got '{}'",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a UCI move string as sent to or received from the service
///
/// Accepts `[file][rank][file][rank][promotion?]` and the null move `"0000"`.
///
/// # Examples
///
/// ```
/// use morph::messages::chess::validate_uci_move;
///
/// assert!(validate_uci_move("e2e4").is_ok());
/// assert!(validate_uci_move("d7d8q").is_ok());
/// assert!(validate_uci_move("0000").is_ok());
/// assert!(validate_uci_move("O-O").is_err());
/// assert!(validate_uci_move("").is_err());
/// ```
pub fn validate_uci_move(uci: &str) -> Result<(), ValidationError> {
    if uci.trim().is_empty() {
        return Err(ValidationError::InvalidMove(
            "Chess move cannot be empty".to_string(),
        ));
    }

    if uci == NULL_MOVE || is_uci_notation(uci) {
        return Ok(());
    }

    Err(ValidationError::InvalidMove(format!(
        "Invalid UCI move '{}'. Expected 'e2e4', 'd7d8q' (with promotion) or '0000'",
        uci
    )))
}

fn is_uci_notation(uci: &str) -> bool {
    let chars: Vec<char> = uci.chars().collect();
    if chars.len() != 4 && chars.len() != 5 {
        return false;
    }

    let square = |file: char, rank: char| matches!(file, 'a'..='h') && matches!(rank, '1'..='8');
    if !square(chars[0], chars[1]) || !square(chars[2], chars[3]) {
        return false;
    }

    match chars.get(4) {
        Some(promotion) => matches!(promotion, 'q' | 'r' | 'b' | 'n'),
        None => true,
    }
}

/// Validate board state hash format (64 hexadecimal characters)
pub fn validate_board_hash_format(hash: &str) -> Result<(), ValidationError> {
    let trimmed_hash = hash.trim();

    if trimmed_hash.is_empty() {
        return Err(ValidationError::InvalidBoardHash(
            "Board state hash cannot be empty".to_string(),
        ));
    }

    if trimmed_hash.len() != 64 {
        return Err(ValidationError::InvalidBoardHash(format!(
            "Board state hash must be exactly 64 characters (SHA-256), got {} characters",
            trimmed_hash.len()
        )));
    }

    if !trimmed_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidBoardHash(format!(
            "Board state hash '{}' contains invalid characters (must be hexadecimal)",
            trimmed_hash
        )));
    }

    Ok(())
}

/// Validate an outgoing move request before it is sent
pub fn validate_get_move_request(req: &GetMoveRequest) -> Result<(), ValidationError> {
    if !validate_game_id(&req.game_id) {
        return Err(ValidationError::InvalidGameId(format!(
            "Game ID '{}' is not a valid service identifier",
            req.game_id
        )));
    }

    validate_uci_move(&req.user_move)?;

    if !req.time_taken.is_finite() || req.time_taken < 0.0 {
        return Err(ValidationError::InvalidMessageFormat(format!(
            "time_taken must be a non-negative number of seconds, got {}",
            req.time_taken
        )));
    }

    Board::from_fen(&req.fen).map_err(|e| ValidationError::InvalidFen(e.to_string()))?;

    Ok(())
}

/// Validate a start-game reply and load its start position
pub fn validate_start_game_response(resp: &StartGameResponse) -> Result<Board, ValidationError> {
    if !validate_game_id(&resp.game_id) {
        return Err(ValidationError::InvalidGameId(format!(
            "Game ID '{}' is not a valid service identifier",
            resp.game_id
        )));
    }

    Board::from_fen(&resp.fen).map_err(|e| ValidationError::InvalidFen(e.to_string()))
}

/// Validate the shape of a move reply (the move itself is trusted)
pub fn validate_get_move_response(resp: &GetMoveResponse) -> Result<(), ValidationError> {
    if let Some(bot_move) = &resp.bot_move {
        validate_uci_move(bot_move)?;
    }
    hash_fen(&resp.fen).map(|_| ())
}
