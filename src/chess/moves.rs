use super::error::ChessError;
use super::piece::{Color, PieceType};
use super::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UCI spelling of "no move", sent when the bot has to open the game
pub const NULL_MOVE: &str = "0000";

/// A coordinate move: origin square, destination square, optional promotion piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    /// Create a new move with validation
    pub fn new(from: Square, to: Square, promotion: Option<PieceType>) -> Result<Self, ChessError> {
        if from == to {
            return Err(ChessError::InvalidMove(
                "Source and destination squares cannot be the same".to_string(),
            ));
        }

        if let Some(piece_type) = promotion {
            if !piece_type.is_promotion_target() {
                return Err(ChessError::InvalidMove(
                    "Cannot promote to King or Pawn".to_string(),
                ));
            }
        }

        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Create a move without validation (for internal use when validity is guaranteed)
    pub const fn new_unchecked(from: Square, to: Square, promotion: Option<PieceType>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Create a simple move without promotion
    pub fn simple(from: Square, to: Square) -> Result<Self, ChessError> {
        Self::new(from, to, None)
    }

    /// Same move with the given promotion piece
    pub fn with_promotion(self, promotion: PieceType) -> Result<Self, ChessError> {
        Self::new(self.from, self.to, Some(promotion))
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Canonical UCI form: origin, destination, optional lowercase promotion letter
    pub fn to_uci(&self) -> String {
        self.to_string()
    }

    /// Parse user input with color context, so "O-O" / "O-O-O" land on the right rank
    pub fn from_str_with_color(s: &str, color: Color) -> Result<Self, ChessError> {
        let s = s.trim();

        match s.to_uppercase().as_str() {
            "O-O" | "0-0" => {
                let rank = match color {
                    Color::White => 0,
                    Color::Black => 7,
                };
                return Ok(Move::new_unchecked(
                    Square::new_unchecked(4, rank),
                    Square::new_unchecked(6, rank),
                    None,
                ));
            }
            "O-O-O" | "0-0-0" => {
                let rank = match color {
                    Color::White => 0,
                    Color::Black => 7,
                };
                return Ok(Move::new_unchecked(
                    Square::new_unchecked(4, rank),
                    Square::new_unchecked(2, rank),
                    None,
                ));
            }
            _ => {}
        }

        Self::from_uci(s)
    }

    /// Parse a 4-5 character UCI move ("e2e4", "e7e8q")
    pub fn from_uci(s: &str) -> Result<Self, ChessError> {
        if s == NULL_MOVE {
            return Err(ChessError::InvalidMove(
                "'0000' is the null move and cannot be played".to_string(),
            ));
        }

        if !s.is_ascii() || !(s.len() == 4 || s.len() == 5) {
            return Err(ChessError::InvalidMove(format!(
                "Invalid move format '{s}'. Expected 'e2e4', 'e7e8q' for promotion, or 'O-O'/'O-O-O' for castling."
            )));
        }

        let from = s[0..2].parse::<Square>()?;
        let to = s[2..4].parse::<Square>()?;
        let promotion = match s.get(4..5) {
            Some(letter) => Some(letter.parse::<PieceType>()?),
            None => None,
        };

        Self::new(from, to, promotion)
    }
}

impl From<Move> for shakmaty::uci::UciMove {
    fn from(mv: Move) -> Self {
        shakmaty::uci::UciMove::Normal {
            from: mv.from.into(),
            to: mv.to.into(),
            promotion: mv.promotion.map(Into::into),
        }
    }
}

impl TryFrom<shakmaty::Move> for Move {
    type Error = ChessError;

    /// Castling is expressed king-to-destination (e1g1), never king-takes-rook
    fn try_from(mv: shakmaty::Move) -> Result<Self, Self::Error> {
        match shakmaty::uci::UciMove::from_standard(mv) {
            shakmaty::uci::UciMove::Normal {
                from,
                to,
                promotion,
            } => Ok(Move::new_unchecked(
                from.into(),
                to.into(),
                promotion.map(Into::into),
            )),
            other => Err(ChessError::InvalidMove(format!(
                "'{}' is not a board move",
                other
            ))),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.uci_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s.trim())
    }
}
