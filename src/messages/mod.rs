pub mod chess;
pub mod types;

pub use chess::{hash_board_state, hash_fen, verify_board_hash, ValidationError};
pub use types::{
    ConfigUpdate, ConfigUpdateResponse, EngineStats, ErrorDetail, GetMoveRequest,
    GetMoveResponse, HealthResponse, Side, StartGameRequest, StartGameResponse,
};
