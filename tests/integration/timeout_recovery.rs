//! Failing and stalled bot requests leave the game recoverable

use crate::common::fake_service::ScriptedBot;
use crate::common::fixtures::{fast_policy, mv, reply_after, GUEST_ID};
use morph::chess::STARTING_FEN;
use morph::cli::{is_recoverable_error, CliError};
use morph::messages::Side;
use morph::network::{RetryPolicy, ServiceError};
use morph::session::{GameDriver, SessionError, SessionStatus};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn driver(bot: &ScriptedBot) -> GameDriver<ScriptedBot> {
    GameDriver::new(bot.clone(), GUEST_ID, fast_policy())
}

#[tokio::test]
async fn test_stalled_service_then_retry() {
    let bot = ScriptedBot::new();
    bot.queue_stall();
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let err = driver.play(mv("e2e4")).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Service(ServiceError::Timeout { .. })
    ));
    assert!(is_recoverable_error(&CliError::from(err)));

    // A request that may have reached the service is sent only once
    let requests = bot.move_requests();
    assert_eq!(requests.len(), 1);

    let session = driver.session();
    assert_eq!(session.status(), SessionStatus::AwaitingBotMove);
    assert!(matches!(
        session.last_error(),
        Some(ServiceError::Timeout { .. })
    ));
    assert_eq!(session.pending_request(), Some(&requests[0]));
    assert_eq!(session.history().len(), 1);

    // No second human move while the bot owes an answer
    let err = driver.play(mv("d2d4")).await.unwrap_err();
    assert!(matches!(err, SessionError::NotAwaitingHumanMove { .. }));

    bot.queue_reply(reply_after(STARTING_FEN, "e2e4", "c7c5"));
    let report = assert_ok!(driver.retry().await);
    assert_eq!(report.bot_move().unwrap().san, "c5");

    let session = driver.session();
    assert_eq!(session.status(), SessionStatus::AwaitingHumanMove);
    assert!(session.last_error().is_none());
    assert!(session.pending_request().is_none());

    // The retry re-sent the identical request
    let requests = bot.move_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1], requests[0]);
}

#[tokio::test]
async fn test_unsent_request_is_resent_within_one_call() {
    let bot = ScriptedBot::new();
    bot.queue_failure(ServiceError::Unreachable("connection refused".into()));
    bot.queue_failure(ServiceError::Unreachable("connection refused".into()));
    bot.queue_reply(reply_after(STARTING_FEN, "g1f3", "g8f6"));
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let report = assert_ok!(driver.play(mv("g1f3")).await);
    assert_eq!(report.bot_move().unwrap().san, "Nf6");
    assert_eq!(bot.move_requests().len(), 3);
    assert_eq!(driver.session().status(), SessionStatus::AwaitingHumanMove);
}

#[tokio::test]
async fn test_server_error_is_surfaced_once() {
    let bot = ScriptedBot::new();
    bot.queue_failure(ServiceError::Status {
        code: 503,
        detail: "busy".into(),
    });
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let err = assert_err!(driver.play(mv("g1f3")).await);
    assert!(matches!(
        err,
        SessionError::Service(ServiceError::Status { code: 503, .. })
    ));
    assert!(is_recoverable_error(&CliError::from(err)));
    assert_eq!(bot.move_requests().len(), 1);
    assert_eq!(driver.session().status(), SessionStatus::AwaitingBotMove);

    bot.queue_reply(reply_after(STARTING_FEN, "g1f3", "g8f6"));
    let report = assert_ok!(driver.retry().await);
    assert_eq!(report.bot_move().unwrap().san, "Nf6");
    assert_eq!(bot.move_requests().len(), 2);
}

#[tokio::test]
async fn test_rejection_is_not_retried() {
    let bot = ScriptedBot::new();
    bot.queue_failure(ServiceError::Status {
        code: 400,
        detail: "Illegal move".into(),
    });
    let mut driver = driver(&bot);
    driver.start_game(Side::White).await.unwrap();

    let err = driver.play(mv("e2e4")).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Service(ServiceError::Status { code: 400, .. })
    ));
    assert_eq!(bot.move_requests().len(), 1);
    assert!(!is_recoverable_error(&CliError::from(err)));

    // The move stays pending; the user can still retry or start over
    assert_eq!(driver.session().status(), SessionStatus::AwaitingBotMove);
    let report = driver.retry().await.unwrap();
    assert!(report.bot_move().is_some());
}

#[tokio::test]
async fn test_retry_without_pending_request() {
    let bot = ScriptedBot::new();
    let mut driver = driver(&bot);
    assert!(matches!(
        driver.retry().await,
        Err(SessionError::NothingPending)
    ));

    driver.start_game(Side::White).await.unwrap();
    assert!(matches!(
        driver.retry().await,
        Err(SessionError::NothingPending)
    ));
}

#[tokio::test]
async fn test_start_game_resends_when_unreachable() {
    let bot = ScriptedBot::new();
    bot.queue_start_error(ServiceError::Unreachable("connection refused".into()));
    let mut driver = driver(&bot);

    driver.start_game(Side::White).await.unwrap();
    assert_eq!(bot.start_requests().len(), 2);
    assert_eq!(driver.session().status(), SessionStatus::AwaitingHumanMove);
}

#[tokio::test]
async fn test_failed_start_leaves_session_idle() {
    let bot = ScriptedBot::new();
    let mut driver = GameDriver::new(
        bot.clone(),
        GUEST_ID,
        RetryPolicy::no_retry(Duration::from_millis(100)),
    );
    bot.queue_start_error(ServiceError::Unreachable("connection refused".into()));

    assert_err!(driver.start_game(Side::Black).await);
    assert_eq!(driver.session().status(), SessionStatus::Idle);
    assert!(bot.move_requests().is_empty());
}

#[tokio::test]
async fn test_start_game_timeout_is_not_resent() {
    let bot = ScriptedBot::new();
    bot.queue_start_stall();
    let mut driver = driver(&bot);

    let err = assert_err!(driver.start_game(Side::White).await);
    match &err {
        SessionError::Service(ServiceError::Timeout { operation, .. }) => {
            assert_eq!(operation, "start-game")
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(bot.start_requests().len(), 1);
    assert_eq!(driver.session().status(), SessionStatus::Idle);

    let text = CliError::from(err).to_string();
    assert!(text.contains("Network timeout during start-game"));
    assert!(!text.contains("'retry'"));
}
