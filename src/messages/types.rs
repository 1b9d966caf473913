//! Bot Service request and response bodies.
//!
//! Field names are the ones the service speaks on the wire and must not be
//! renamed.

use crate::chess::Color;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side requested when starting a game. `Random` is resolved by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
    Random,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
            Side::Random => "random",
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" | "w" => Ok(Side::White),
            "black" | "b" => Ok(Side::Black),
            "random" | "r" => Ok(Side::Random),
            other => Err(format!(
                "Invalid side '{}'. Expected 'white', 'black' or 'random'",
                other
            )),
        }
    }
}

/// `POST /start-game` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameRequest {
    pub guest_id: String,
    pub side: Side,
}

impl StartGameRequest {
    pub fn new(guest_id: impl Into<String>, side: Side) -> Self {
        Self {
            guest_id: guest_id.into(),
            side,
        }
    }
}

/// `POST /start-game` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameResponse {
    pub game_id: String,
    /// Color the human plays
    pub orientation: Color,
    /// Start position; may differ from the standard one (handicap games)
    pub fen: String,
}

/// `POST /get-move` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMoveRequest {
    pub game_id: String,
    /// UCI move just played by the human, or `"0000"` when the bot opens
    pub user_move: String,
    /// Position before `user_move`
    pub fen: String,
    /// Seconds the human spent on the move
    pub time_taken: f64,
}

impl GetMoveRequest {
    pub fn new(
        game_id: impl Into<String>,
        user_move: impl Into<String>,
        fen: impl Into<String>,
        time_taken: f64,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            user_move: user_move.into(),
            fen: fen.into(),
            time_taken,
        }
    }

    pub fn is_null_move(&self) -> bool {
        self.user_move == crate::chess::NULL_MOVE
    }
}

/// `POST /get-move` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMoveResponse {
    #[serde(default)]
    pub bot_move: Option<String>,
    /// Position after the bot move (or after the user move when there is none)
    pub fen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_stats"
    )]
    pub stats: Option<EngineStats>,
}

impl GetMoveResponse {
    /// The service declared the game over
    pub fn is_game_over(&self) -> bool {
        self.game_over.unwrap_or(false)
    }
}

/// Engine statistics attached to a bot reply. Advisory only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blunder_prob: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_cp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_blunder: Option<bool>,
}

// Stats never decide whether a reply is usable: a malformed stats object
// is dropped instead of failing the whole response.
fn lenient_stats<'de, D>(deserializer: D) -> Result<Option<EngineStats>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// `GET /health` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// `POST /update-config` body. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_winning_margin: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_losing_margin: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_play_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake_severe_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake_natural_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake_natural_max: Option<i64>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ConfigUpdate::default()
    }
}

/// `POST /update-config` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdateResponse {
    pub status: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Error body produced by the service framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
