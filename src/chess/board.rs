use super::error::ChessError;
use super::moves::Move;
use super::outcome::{TerminalReason, TerminalResult, Winner};
use super::piece::{Color, Piece, PieceType};
use super::square::Square;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::Zobrist64;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position as _, Role};

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule ends the game
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// A move as it was actually applied, with its SAN rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    pub san: String,
    pub color: Color,
}

/// The authoritative position of a game.
///
/// Rule knowledge (legality, check, mate, material) is delegated to
/// `shakmaty`; this type adds the repetition history the rules engine does
/// not keep by itself, so that threefold repetition can be detected.
#[derive(Debug, Clone)]
pub struct Board {
    position: Chess,
    /// Zobrist keys of every position reached, current one included
    history: Vec<u64>,
}

impl Board {
    /// Create a new board with the standard starting position
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    fn from_position(position: Chess) -> Self {
        let key = zobrist_key(&position);
        Self {
            position,
            history: vec![key],
        }
    }

    /// Create a board from a FEN string.
    /// Positions with missing pieces (handicap starts) are accepted as long
    /// as the rules engine considers them playable.
    pub fn from_fen(fen: &str) -> Result<Board, ChessError> {
        let fen = fen.trim();
        if fen.is_empty() {
            return Err(ChessError::InvalidFen("FEN string is empty".to_string()));
        }

        let parsed: Fen = fen
            .parse()
            .map_err(|e| ChessError::InvalidFen(format!("'{}': {}", fen, e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessError::InvalidFen(format!("'{}': {}", fen, e)))?;

        Ok(Self::from_position(position))
    }

    /// Full FEN including move counters
    pub fn to_fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// FEN without the halfmove clock and fullmove number.
    /// Two boards with the same key are the same position for play purposes.
    pub fn position_key(&self) -> String {
        let fen = self.to_fen();
        fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }

    /// Side to move, derived from the position
    pub fn active_color(&self) -> Color {
        self.position.turn().into()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmoves().get()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmoves()
    }

    /// Get the piece on the specified square, if any
    pub fn get_piece(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square.into()).map(Piece::from)
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    /// Square of the side-to-move's king when it is in check
    pub fn checked_king(&self) -> Option<Square> {
        if !self.position.is_check() {
            return None;
        }
        self.position
            .board()
            .king_of(self.position.turn())
            .map(Square::from)
    }

    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position
            .legal_moves()
            .into_iter()
            .filter_map(|m| Move::try_from(m).ok())
            .collect()
    }

    /// Destination squares reachable from `from` by a legal move
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .legal_moves()
            .into_iter()
            .filter(|m| m.from == from)
            .map(|m| m.to)
            .collect();
        targets.sort_by_key(|sq| (sq.rank, sq.file));
        targets.dedup();
        targets
    }

    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.resolve_legal(mv).is_ok()
    }

    /// SAN of a legal move in the current position, check suffix included
    pub fn san(&self, mv: Move) -> Result<String, ChessError> {
        let legal = self.resolve_legal(mv)?;
        Ok(SanPlus::from_move(self.position.clone(), legal).to_string())
    }

    /// Apply a move for the side to move if the rules engine accepts it.
    /// A rejected move leaves the board untouched.
    ///
    /// A pawn reaching the last rank without a promotion letter is promoted
    /// to a queen.
    pub fn make_move(&mut self, mv: Move) -> Result<PlayedMove, ChessError> {
        let legal = self.resolve_legal(mv)?;
        Ok(self.play(legal))
    }

    /// Apply a move received from the bot service.
    ///
    /// The service is trusted to pick the move; the move is only interpreted
    /// against the current position. It fails when it cannot be played here
    /// (no piece of the side to move on the origin square, or a move the
    /// rules engine cannot apply to this position); callers then fall back
    /// to the position reported by the service. The board is untouched on
    /// failure.
    pub fn apply_unchecked(&mut self, mv: Move) -> Result<PlayedMove, ChessError> {
        let from: shakmaty::Square = mv.from.into();
        let to: shakmaty::Square = mv.to.into();
        let board = self.position.board();

        let piece = board.piece_at(from).ok_or_else(|| {
            ChessError::BoardStateError(format!("No piece on {} to play {}", mv.from, mv))
        })?;
        if piece.color != self.position.turn() {
            return Err(ChessError::BoardStateError(format!(
                "Piece on {} does not belong to the side to move ({})",
                mv.from,
                self.active_color()
            )));
        }

        let candidate = if piece.role == Role::King
            && from.rank() == to.rank()
            && from.distance(to) == 2
        {
            let rook_file = if to.file() > from.file() {
                shakmaty::File::H
            } else {
                shakmaty::File::A
            };
            shakmaty::Move::Castle {
                king: from,
                rook: shakmaty::Square::from_coords(rook_file, from.rank()),
            }
        } else if piece.role == Role::Pawn
            && from.file() != to.file()
            && !board.occupied().contains(to)
        {
            shakmaty::Move::EnPassant { from, to }
        } else {
            shakmaty::Move::Normal {
                role: piece.role,
                from,
                capture: board.role_at(to),
                to,
                promotion: mv.promotion.map(Into::into),
            }
        };

        if !self.position.is_legal(candidate) {
            return Err(ChessError::BoardStateError(format!(
                "{} cannot be played in this position",
                mv
            )));
        }

        Ok(self.play(candidate))
    }

    /// Replace the position with the one from `other`, keeping the
    /// repetition history of this board
    pub fn resync(&mut self, other: &Board) {
        self.position = other.position.clone();
        self.history.push(zobrist_key(&self.position));
    }

    /// Replace the position reached by the last move with the one from
    /// `other`. The discarded position is dropped from the repetition
    /// history.
    pub fn resync_last_move(&mut self, other: &Board) {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.resync(other);
    }

    /// Terminal state of the position, if the game is over
    pub fn status(&self) -> Option<TerminalResult> {
        if self.position.is_checkmate() {
            let winner: Color = self.active_color().opposite();
            return Some(TerminalResult::new(
                Winner::from(winner),
                TerminalReason::Checkmate,
            ));
        }
        if self.position.is_stalemate() {
            return Some(TerminalResult::draw(TerminalReason::Stalemate));
        }
        if self.position.is_insufficient_material() {
            return Some(TerminalResult::draw(TerminalReason::InsufficientMaterial));
        }
        if self.is_threefold_repetition() {
            return Some(TerminalResult::draw(TerminalReason::Repetition));
        }
        if self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES {
            return Some(TerminalResult::draw(TerminalReason::Draw));
        }
        None
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_some()
    }

    /// The current position has occurred at least three times
    pub fn is_threefold_repetition(&self) -> bool {
        let current = zobrist_key(&self.position);
        self.history.iter().filter(|&&key| key == current).count() >= 3
    }

    /// Zobrist hash of the current position (move counters excluded)
    pub fn hash_state(&self) -> u64 {
        zobrist_key(&self.position)
    }

    /// Display the board as ASCII art from White's perspective
    pub fn to_ascii(&self) -> String {
        let mut result = String::new();

        result.push_str("  a b c d e f g h\n");

        for rank in (0..8u8).rev() {
            let rank_number = rank + 1;
            result.push_str(&format!("{rank_number} "));

            for file in 0..8u8 {
                let symbol = match self.get_piece(Square::new_unchecked(file, rank)) {
                    Some(piece) => piece.to_string(),
                    None => ".".to_string(),
                };
                result.push_str(&symbol);
                if file < 7 {
                    result.push(' ');
                }
            }

            result.push_str(&format!(" {rank_number}\n"));
        }

        result.push_str("  a b c d e f g h");
        result
    }

    fn resolve_legal(&self, mv: Move) -> Result<shakmaty::Move, ChessError> {
        let piece = self.get_piece(mv.from).ok_or_else(|| {
            ChessError::IllegalMove(format!("No piece on {}", mv.from))
        })?;

        if piece.color != self.active_color() {
            return Err(ChessError::IllegalMove(format!(
                "Cannot move {} piece when it's {}'s turn",
                piece.color,
                self.active_color()
            )));
        }

        let uci: UciMove = mv.into();
        if let Ok(legal) = uci.to_move(&self.position) {
            return Ok(legal);
        }

        // Auto-queen: "e7e8" is accepted for "e7e8q"
        if mv.promotion.is_none() && piece.piece_type == PieceType::Pawn {
            if let Ok(promoted) = mv.with_promotion(PieceType::Queen) {
                let uci: UciMove = promoted.into();
                if let Ok(legal) = uci.to_move(&self.position) {
                    return Ok(legal);
                }
            }
        }

        Err(ChessError::IllegalMove(format!(
            "{} is not legal in this position",
            mv
        )))
    }

    fn play(&mut self, legal: shakmaty::Move) -> PlayedMove {
        let color = self.active_color();
        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, legal).to_string();
        self.history.push(zobrist_key(&self.position));

        let mv = Move::try_from(legal).unwrap_or_else(|_| {
            // Drops never occur in standard chess; keep the origin/destination we can see
            Move::new_unchecked(
                legal.from().map(Square::from).unwrap_or_else(|| legal.to().into()),
                legal.to().into(),
                legal.promotion().map(Into::into),
            )
        });

        PlayedMove { mv, san, color }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn zobrist_key(position: &Chess) -> u64 {
    position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
}
