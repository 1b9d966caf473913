//! Full turns through `GameDriver` against the scripted service

use crate::common::fake_service::ScriptedBot;
use crate::common::fixtures::{
    fast_policy, handicap_fen, mv, reply_after, start_response, GUEST_ID,
};
use morph::chess::{Color, TerminalReason, TerminalResult, Winner, STARTING_FEN};
use morph::messages::{GetMoveResponse, Side};
use morph::session::{GameDriver, Mover, SessionError, SessionStatus};

fn driver(bot: &ScriptedBot) -> GameDriver<ScriptedBot> {
    GameDriver::new(bot.clone(), GUEST_ID, fast_policy())
}

#[tokio::test]
async fn test_white_opening_move_round_trip() {
    let bot = ScriptedBot::new();
    bot.queue_reply(reply_after(STARTING_FEN, "e2e4", "e7e5"));
    let mut driver = driver(&bot);

    driver.start_game(Side::White).await.unwrap();
    assert_eq!(driver.session().status(), SessionStatus::AwaitingHumanMove);
    assert!(bot.move_requests().is_empty());

    let report = driver.play(mv("e2e4")).await.unwrap();
    assert_eq!(report.human_move.as_ref().unwrap().san, "e4");
    assert_eq!(report.bot_move().unwrap().san, "e5");
    assert!(!report.resynced);
    assert_eq!(report.result, None);

    let requests = bot.move_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_move, "e2e4");
    assert_eq!(requests[0].fen, STARTING_FEN);
    assert!(requests[0].time_taken >= 0.0);

    let session = driver.session();
    assert_eq!(session.status(), SessionStatus::AwaitingHumanMove);
    assert_eq!(session.side_to_move(), Some(Color::White));
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[1].by, Mover::Bot);
}

#[tokio::test]
async fn test_start_sends_guest_id_and_side() {
    let bot = ScriptedBot::new();
    let mut driver = driver(&bot);

    driver.start_game(Side::Random).await.unwrap();

    let starts = bot.start_requests();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].guest_id, GUEST_ID);
    assert_eq!(starts[0].side, Side::Random);
}

#[tokio::test]
async fn test_black_start_requests_bot_opening() {
    let bot = ScriptedBot::new();
    let fen = handicap_fen(Color::Black);
    bot.queue_start(start_response(Color::Black, fen));
    let mut driver = driver(&bot);

    let report = driver.start_game(Side::Black).await.unwrap();

    let requests = bot.move_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_move, "0000");
    assert_eq!(requests[0].fen, fen);
    assert_eq!(requests[0].time_taken, 0.0);

    assert_eq!(report.bot_moves.len(), 1);
    assert_eq!(report.human_move, None);
    let session = driver.session();
    assert_eq!(session.human_color(), Color::Black);
    assert_eq!(session.status(), SessionStatus::AwaitingHumanMove);
    assert_eq!(session.side_to_move(), Some(Color::Black));
}

#[tokio::test]
async fn test_rejected_moves_send_nothing() {
    let bot = ScriptedBot::new();
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();
    let fen_before = driver.session().board().to_fen();

    for bad in ["e2e5", "e3e4", "e7e5"] {
        let err = driver.play(mv(bad)).await.unwrap_err();
        assert!(
            matches!(err, SessionError::IllegalMove(_)),
            "{} gave {:?}",
            bad,
            err
        );
    }

    assert!(bot.move_requests().is_empty());
    let session = driver.session();
    assert_eq!(session.status(), SessionStatus::AwaitingHumanMove);
    assert_eq!(session.board().to_fen(), fen_before);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_human_checkmate_ends_without_request() {
    let bot = ScriptedBot::new();
    bot.queue_start(start_response(
        Color::White,
        "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
    ));
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let report = driver.play(mv("h5f7")).await.unwrap();

    assert_eq!(
        report.result,
        Some(TerminalResult::new(Winner::White, TerminalReason::Checkmate))
    );
    assert_eq!(report.human_move.unwrap().san, "Qxf7#");
    assert!(report.bot_moves.is_empty());
    assert!(bot.move_requests().is_empty());
    assert_eq!(driver.session().status(), SessionStatus::Terminal);
    assert_eq!(driver.session().side_to_move(), None);
}

#[tokio::test]
async fn test_bot_checkmate_ends_game() {
    let bot = ScriptedBot::new();
    bot.queue_reply(reply_after(STARTING_FEN, "f2f3", "e7e5"));
    bot.queue_reply(reply_after(
        "rnbqkbnr/pppp1ppp/8/4p3/8/5P2/PPPPP1PP/RNBQKBNR w KQkq - 0 2",
        "g2g4",
        "d8h4",
    ));
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    driver.play(mv("f2f3")).await.unwrap();
    let report = driver.play(mv("g2g4")).await.unwrap();

    assert_eq!(report.bot_move().unwrap().san, "Qh4#");
    assert_eq!(
        report.result,
        Some(TerminalResult::new(Winner::Black, TerminalReason::Checkmate))
    );

    let err = driver.play(mv("a2a3")).await.unwrap_err();
    assert!(matches!(err, SessionError::GameOver(_)));
    assert_eq!(bot.move_requests().len(), 2);
}

#[tokio::test]
async fn test_resignation_from_either_waiting_state() {
    let bot = ScriptedBot::new();
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let result = driver.resign().unwrap();
    assert_eq!(result, TerminalResult::resignation(Color::White));
    assert_eq!(result.winner, Winner::Black);
    assert_eq!(driver.session().status(), SessionStatus::Terminal);
    assert!(matches!(
        driver.resign(),
        Err(SessionError::CannotResign { .. })
    ));

    // Resigning while the bot is thinking is allowed too
    bot.queue_stall();
    bot.queue_stall();
    bot.queue_stall();
    driver.start_game(Side::White).await.unwrap();
    assert!(driver.play(mv("d2d4")).await.is_err());
    assert_eq!(driver.session().status(), SessionStatus::AwaitingBotMove);
    let result = driver.resign().unwrap();
    assert_eq!(result.reason, TerminalReason::Resignation);
    assert!(driver.session().pending_request().is_none());
}

#[tokio::test]
async fn test_service_game_over_in_live_position_is_a_draw() {
    let bot = ScriptedBot::new();
    bot.queue_reply(GetMoveResponse {
        bot_move: None,
        fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string(),
        game_over: Some(true),
        stats: None,
    });
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let report = driver.play(mv("e2e4")).await.unwrap();
    assert_eq!(report.result, Some(TerminalResult::draw(TerminalReason::Draw)));
    assert_eq!(driver.session().status(), SessionStatus::Terminal);
}

#[tokio::test]
async fn test_new_game_after_finish() {
    let bot = ScriptedBot::new();
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();
    driver.resign().unwrap();

    driver.new_game();
    assert_eq!(driver.session().status(), SessionStatus::Idle);

    driver.start_game(Side::White).await.unwrap();
    assert_eq!(driver.session().status(), SessionStatus::AwaitingHumanMove);
    assert_eq!(driver.session().result(), None);
    assert_eq!(bot.start_requests().len(), 2);
}

#[tokio::test]
async fn test_pgn_export_after_a_few_moves() {
    let bot = ScriptedBot::new();
    bot.queue_reply(reply_after(STARTING_FEN, "e2e4", "e7e5"));
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();
    driver.play(mv("e2e4")).await.unwrap();
    driver.resign().unwrap();

    let pgn = driver.session().to_pgn();
    assert!(pgn.contains("[Event \"ChessMorph Game\"]"));
    assert!(pgn.contains("[White \"Player\"]"));
    assert!(pgn.contains("[Black \"ChessMorph Bot\"]"));
    assert!(pgn.contains("[Result \"0-1\"]"));
    assert!(pgn.contains("1. e4 {By: user} 1... e5 {By: bot} 0-1"));
    assert!(!pgn.contains("[SetUp"));
}
