//! Interactive commands executed against the scripted service

use crate::common::fake_service::ScriptedBot;
use crate::common::fixtures::{fast_policy, mv, GUEST_ID};
use morph::cli::{parse_play_command, CliError, PlayCommand, PlaySession};
use morph::chess::Color;
use morph::messages::Side;
use morph::session::{GameDriver, SessionError, SessionStatus};
use std::time::Duration;

fn play_session(bot: &ScriptedBot) -> PlaySession<ScriptedBot> {
    let driver = GameDriver::new(bot.clone(), GUEST_ID, fast_policy());
    PlaySession::new(driver, Side::White, false)
}

#[tokio::test]
async fn test_new_game_then_move() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);

    let out = play.execute(PlayCommand::New(None)).await.unwrap();
    assert!(out.output.contains("New game"));
    assert!(out.output.contains("you play White"));
    assert!(!out.quit);
    assert!(play.prompt().starts_with("White (you) to move"));

    let out = play.execute(PlayCommand::Move(mv("e2e4"))).await.unwrap();
    assert!(out.output.contains("You: e4"));
    assert!(out.output.contains("Bot: "));
    assert!(out.output.contains("To move: White"));
}

#[tokio::test]
async fn test_hint_lists_targets() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);
    play.execute(PlayCommand::New(None)).await.unwrap();

    let out = play
        .execute(PlayCommand::Hint("g1".parse().unwrap()))
        .await
        .unwrap();
    assert!(out.output.contains("g1 can go to: f3, h3"));
    assert!(out.output.contains("<N>"));

    let out = play
        .execute(PlayCommand::Hint("e4".parse().unwrap()))
        .await
        .unwrap();
    assert_eq!(out.output, "No legal moves from e4\n");
}

#[tokio::test]
async fn test_board_requires_a_game() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);

    let err = play.execute(PlayCommand::Board).await.unwrap_err();
    assert!(matches!(err, CliError::Session(SessionError::NoActiveGame)));
    assert!(play.prompt().starts_with("no game"));
}

#[tokio::test]
async fn test_moves_pgn_and_resign() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);
    play.execute(PlayCommand::New(None)).await.unwrap();
    play.execute(PlayCommand::Move(mv("d2d4"))).await.unwrap();

    let moves = play.execute(PlayCommand::Moves).await.unwrap().output;
    assert!(moves.contains("d4"));
    assert!(moves.contains("│    1 │"));

    let out = play.execute(PlayCommand::Resign).await.unwrap();
    assert!(out.output.contains("You resigned"));
    assert!(out.output.contains("😞 You lost"));
    assert_eq!(play.driver().session().status(), SessionStatus::Terminal);

    let pgn = play.execute(PlayCommand::Pgn).await.unwrap().output;
    assert!(pgn.contains("[Termination \"Black won by Resignation\"]"));
    assert!(pgn.trim_end().ends_with("0-1"));
}

#[tokio::test]
async fn test_new_side_is_remembered() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);

    play.execute(PlayCommand::New(Some(Side::Black)))
        .await
        .unwrap();
    assert_eq!(play.driver().session().human_color(), Color::Black);

    play.execute(PlayCommand::New(None)).await.unwrap();
    let starts = bot.start_requests();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[1].side, Side::Black);
}

#[tokio::test]
async fn test_typed_lines_drive_the_game() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);
    play.execute(PlayCommand::New(None)).await.unwrap();

    for line in ["e2e4", "stats", "board", "help"] {
        let to_move = play.driver().session().board().active_color();
        let command = parse_play_command(line, to_move).unwrap().unwrap();
        play.execute(command).await.unwrap();
    }

    let quit = parse_play_command("quit", Color::White).unwrap().unwrap();
    assert!(play.execute(quit).await.unwrap().quit);
    assert_eq!(bot.move_requests().len(), 1);
}

#[tokio::test]
async fn test_interrupt_while_waiting_for_bot() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);
    play.execute(PlayCommand::New(None)).await.unwrap();
    bot.queue_stall();

    let outcome = play
        .execute_until(
            PlayCommand::Move(mv("e2e4")),
            tokio::time::sleep(Duration::from_millis(10)),
        )
        .await;

    assert!(outcome.is_none());
    let session = play.driver().session();
    assert_eq!(session.status(), SessionStatus::AwaitingBotMove);
    assert!(session.pending_request().is_some());
    assert_eq!(bot.move_requests().len(), 1);

    // The pending request can still be answered
    let out = play.execute(PlayCommand::Retry).await.unwrap();
    assert!(out.output.contains("Bot: "));
    assert_eq!(play.driver().session().status(), SessionStatus::AwaitingHumanMove);
}

#[tokio::test]
async fn test_uninterrupted_command_completes() {
    let bot = ScriptedBot::new();
    let mut play = play_session(&bot);

    let outcome = play
        .execute_until(
            PlayCommand::New(None),
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await;

    assert!(outcome.unwrap().unwrap().output.contains("New game"));
}
