use super::piece::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::White => "white",
            Winner::Black => "black",
            Winner::Draw => "draw",
        }
    }

    /// PGN result token
    pub fn pgn_result(&self) -> &'static str {
        match self {
            Winner::White => "1-0",
            Winner::Black => "0-1",
            Winner::Draw => "1/2-1/2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    Checkmate,
    Stalemate,
    /// Fifty-move rule
    Draw,
    Repetition,
    InsufficientMaterial,
    Resignation,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminalReason::Checkmate => "Checkmate",
            TerminalReason::Stalemate => "Stalemate",
            TerminalReason::Draw => "Draw",
            TerminalReason::Repetition => "Repetition",
            TerminalReason::InsufficientMaterial => "Insufficient Material",
            TerminalReason::Resignation => "Resignation",
        };
        write!(f, "{}", text)
    }
}

/// How a game ended. Computed once and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalResult {
    pub winner: Winner,
    pub reason: TerminalReason,
}

impl TerminalResult {
    pub fn new(winner: Winner, reason: TerminalReason) -> Self {
        Self { winner, reason }
    }

    pub fn draw(reason: TerminalReason) -> Self {
        Self::new(Winner::Draw, reason)
    }

    /// The opponent of the resigning side wins
    pub fn resignation(resigning: Color) -> Self {
        Self::new(resigning.opposite().into(), TerminalReason::Resignation)
    }
}

impl fmt::Display for TerminalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Winner::White => write!(f, "White won by {}", self.reason),
            Winner::Black => write!(f, "Black won by {}", self.reason),
            Winner::Draw => write!(f, "Draw by {}", self.reason),
        }
    }
}
