//! Positions, replies and policies used across tests

use morph::chess::{Board, Color, Move};
use morph::messages::{GetMoveRequest, GetMoveResponse, StartGameResponse};
use morph::network::RetryPolicy;
use std::time::Duration;

pub const GAME_ID: &str = "65f0c2a1b3d4e5f60718293a";
pub const GUEST_ID: &str = "0b6f5c2e-5a34-4a8e-9a53-8f0a0e4d1c77";

/// Standard start with the bot's queen removed, as the service sets up games
pub fn handicap_fen(human: Color) -> &'static str {
    match human {
        Color::White => "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        Color::Black => "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1",
    }
}

pub fn start_response(human: Color, fen: &str) -> StartGameResponse {
    StartGameResponse {
        game_id: GAME_ID.to_string(),
        orientation: human,
        fen: fen.to_string(),
    }
}

/// Reply the service would give after `user_move` on `fen`, answered by `bot_move`
pub fn reply_after(fen: &str, user_move: &str, bot_move: &str) -> GetMoveResponse {
    let mut board = Board::from_fen(fen).expect("fixture FEN must be valid");
    if user_move != morph::chess::NULL_MOVE {
        board
            .make_move(Move::from_uci(user_move).expect("fixture user move"))
            .expect("fixture user move must be legal");
    }
    board
        .make_move(Move::from_uci(bot_move).expect("fixture bot move"))
        .expect("fixture bot move must be legal");

    GetMoveResponse {
        bot_move: Some(bot_move.to_string()),
        fen: board.to_fen(),
        game_over: Some(board.is_game_over()),
        stats: None,
    }
}

/// What a cooperative service answers: the first legal move, or game over
pub fn auto_reply(req: &GetMoveRequest) -> GetMoveResponse {
    let mut board = Board::from_fen(&req.fen).expect("request FEN must be valid");
    if !req.is_null_move() {
        board
            .make_move(Move::from_uci(&req.user_move).expect("request move must be UCI"))
            .expect("request move must be legal");
    }

    if board.is_game_over() {
        return GetMoveResponse {
            bot_move: None,
            fen: board.to_fen(),
            game_over: Some(true),
            stats: None,
        };
    }

    let mv = board.legal_moves()[0];
    board.make_move(mv).expect("legal move");
    GetMoveResponse {
        bot_move: Some(mv.to_uci()),
        fen: board.to_fen(),
        game_over: Some(board.is_game_over()),
        stats: None,
    }
}

/// Short timeouts so stalled requests fail quickly
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(Duration::from_millis(100), 3, Duration::from_millis(5))
}

pub fn mv(uci: &str) -> Move {
    Move::from_uci(uci).expect("test move must be valid UCI")
}
