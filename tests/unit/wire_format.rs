//! JSON bodies exactly as the bot service sends and expects them

use morph::chess::Color;
use morph::messages::{
    ConfigUpdate, GetMoveRequest, GetMoveResponse, HealthResponse, Side, StartGameRequest,
    StartGameResponse,
};
use serde_json::json;

#[test]
fn test_request_bodies() {
    let start = serde_json::to_value(StartGameRequest::new("guest", Side::Black)).unwrap();
    assert_eq!(start, json!({"guest_id": "guest", "side": "black"}));

    let get_move = serde_json::to_value(GetMoveRequest::new(
        "65f0c2a1b3d4e5f60718293a",
        "0000",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1",
        0.0,
    ))
    .unwrap();
    assert_eq!(
        get_move,
        json!({
            "game_id": "65f0c2a1b3d4e5f60718293a",
            "user_move": "0000",
            "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1",
            "time_taken": 0.0
        })
    );
}

#[test]
fn test_start_reply() {
    let resp: StartGameResponse = serde_json::from_value(json!({
        "game_id": "65f0c2a1b3d4e5f60718293a",
        "orientation": "black",
        "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1"
    }))
    .unwrap();
    assert_eq!(resp.orientation, Color::Black);
}

#[test]
fn test_move_reply_with_stats() {
    let resp: GetMoveResponse = serde_json::from_value(json!({
        "bot_move": "e7e5",
        "fen": "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
        "game_over": false,
        "stats": {
            "difficulty": "Blunder Mode",
            "depth": 10,
            "blunder_prob": 0.3,
            "user_cp": -120,
            "cp_loss": 45,
            "is_blunder": true,
            "time_taken": 1.7
        }
    }))
    .unwrap();

    let stats = resp.stats.unwrap();
    assert_eq!(stats.depth, Some(10.0));
    assert_eq!(stats.user_cp, Some(-120.0));
    assert_eq!(stats.is_blunder, Some(true));
    assert!(!resp.game_over.unwrap());
}

#[test]
fn test_malformed_stats_do_not_break_reply() {
    let resp: GetMoveResponse = serde_json::from_value(json!({
        "bot_move": "e7e5",
        "fen": "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
        "stats": "n/a"
    }))
    .unwrap();
    assert_eq!(resp.bot_move.as_deref(), Some("e7e5"));
    assert_eq!(resp.stats, None);
    assert!(!resp.is_game_over());
}

#[test]
fn test_health_and_config_update() {
    let health: HealthResponse =
        serde_json::from_value(json!({"status": "ok", "version": "1.0.1 (Debug Fix)"}))
            .unwrap();
    assert_eq!(health.version.as_deref(), Some("1.0.1 (Debug Fix)"));

    let update = ConfigUpdate {
        mistake_natural_max: Some(150),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({"MISTAKE_NATURAL_MAX": 150})
    );
}
