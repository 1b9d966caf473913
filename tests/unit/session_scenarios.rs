//! Session transitions driven by hand, without a service

use crate::common::fixtures::{mv, reply_after, start_response};
use morph::chess::{Color, STARTING_FEN};
use morph::messages::GetMoveResponse;
use morph::session::{Session, SessionError, SessionStatus};

/// At every step of a game in progress exactly one color may move, the
/// board's side to move.
fn assert_turn_invariant(session: &Session) {
    match session.status() {
        SessionStatus::AwaitingHumanMove => {
            assert_eq!(session.side_to_move(), Some(session.human_color()));
            assert_eq!(session.board().active_color(), session.human_color());
        }
        SessionStatus::AwaitingBotMove => {
            assert_eq!(session.side_to_move(), Some(session.bot_color()));
            assert!(session.pending_request().is_some());
        }
        SessionStatus::Idle | SessionStatus::Terminal => {
            assert_eq!(session.side_to_move(), None);
        }
    }
}

#[test]
fn test_turn_invariant_through_a_short_game() {
    let mut session = Session::new();
    assert_turn_invariant(&session);

    session
        .start(start_response(Color::White, STARTING_FEN))
        .unwrap();
    assert_turn_invariant(&session);

    let mut fen = STARTING_FEN.to_string();
    for (human, bot) in [("e2e4", "e7e5"), ("g1f3", "b8c6"), ("f1c4", "g8f6")] {
        let request = session.submit_move(mv(human)).unwrap().unwrap();
        assert_eq!(request.user_move, human);
        assert_eq!(request.fen, fen);
        assert_turn_invariant(&session);

        let reply = reply_after(&fen, human, bot);
        fen = reply.fen.clone();
        let applied = session.apply_bot_reply(reply).unwrap();
        assert!(!applied.resynced);
        assert_eq!(applied.next_request, None);
        assert_turn_invariant(&session);
    }

    assert_eq!(session.history().len(), 6);
    session.resign().unwrap();
    assert_turn_invariant(&session);
}

#[test]
fn test_white_e2e4_waits_for_bot() {
    let mut session = Session::new();
    session
        .start(start_response(Color::White, STARTING_FEN))
        .unwrap();

    let request = session.submit_move(mv("e2e4")).unwrap().unwrap();
    assert_eq!(session.status(), SessionStatus::AwaitingBotMove);
    assert_eq!(request.user_move, "e2e4");
    assert_eq!(request.fen, STARTING_FEN);

    // A second move is refused until the reply arrives
    let err = session.submit_move(mv("d2d4")).unwrap_err();
    assert!(matches!(err, SessionError::NotAwaitingHumanMove { .. }));
}

#[test]
fn test_reply_without_pending_request_is_refused() {
    let mut session = Session::new();
    session
        .start(start_response(Color::White, STARTING_FEN))
        .unwrap();

    let reply = GetMoveResponse {
        bot_move: Some("e7e5".into()),
        fen: STARTING_FEN.into(),
        game_over: None,
        stats: None,
    };
    assert!(matches!(
        session.apply_bot_reply(reply),
        Err(SessionError::NothingPending)
    ));
    assert_eq!(session.status(), SessionStatus::AwaitingHumanMove);
}

#[test]
fn test_start_twice_is_refused() {
    let mut session = Session::new();
    session
        .start(start_response(Color::White, STARTING_FEN))
        .unwrap();
    let err = session
        .start(start_response(Color::Black, STARTING_FEN))
        .unwrap_err();
    assert!(matches!(err, SessionError::GameInProgress { .. }));
    assert_eq!(session.human_color(), Color::White);
}

#[test]
fn test_invalid_start_position_is_refused() {
    let mut session = Session::new();
    let err = session
        .start(start_response(Color::White, "8/8/8/8/8/8/8/8 w - - 0 1"))
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidStart(_)));
    assert_eq!(session.status(), SessionStatus::Idle);
}
