//! Session transitions. No I/O happens here: methods that need the bot
//! return the request to send, and replies are fed back in.

use super::state::{MoveRecord, Mover, Session, SessionError, SessionStatus};
use crate::chess::{Board, Move, TerminalReason, TerminalResult, NULL_MOVE};
use crate::messages::chess::{hash_board_state, validate_start_game_response};
use crate::messages::{GetMoveRequest, GetMoveResponse, StartGameResponse};
use crate::network::ServiceError;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What applying a bot reply did to the session
#[derive(Debug, Clone, PartialEq)]
pub struct BotReply {
    /// Move recorded for the bot, if the reply carried one
    pub bot_move: Option<MoveRecord>,
    /// The local board was replaced by the service's position
    pub resynced: bool,
    /// Follow-up request when the bot still has the move
    pub next_request: Option<GetMoveRequest>,
}

impl Session {
    /// `idle → awaiting_human_move | awaiting_bot_move | terminal`
    ///
    /// Loads the start position returned by the service. When the bot has
    /// the first move, the opening request (null move, start FEN, no time)
    /// is returned and also kept as the pending request.
    pub fn start(
        &mut self,
        resp: StartGameResponse,
    ) -> Result<Option<GetMoveRequest>, SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::GameInProgress {
                status: self.status,
            });
        }

        let board = validate_start_game_response(&resp)
            .map_err(|e| SessionError::InvalidStart(e.to_string()))?;

        self.game_id = Some(resp.game_id.clone());
        self.human_color = resp.orientation;
        self.start_fen = board.to_fen();
        self.board = board;
        self.history.clear();
        self.last_stats = None;
        self.last_error = None;
        self.result = None;
        self.pending = None;
        self.move_clock_start = Instant::now();

        info!(
            "Session {} started game {} as {}",
            self.session_id, resp.game_id, self.human_color
        );

        if let Some(result) = self.board.status() {
            self.finish(result);
            return Ok(None);
        }

        if self.board.active_color() == self.human_color {
            self.status = SessionStatus::AwaitingHumanMove;
            return Ok(None);
        }

        let request = GetMoveRequest::new(resp.game_id, NULL_MOVE, self.board.to_fen(), 0.0);
        self.status = SessionStatus::AwaitingBotMove;
        self.pending = Some(request.clone());
        debug!("Bot opens game {}", request.game_id);
        Ok(Some(request))
    }

    /// `awaiting_human_move → awaiting_bot_move | terminal`
    ///
    /// A rejected move leaves the session exactly as it was. When the move
    /// ends the game no request is produced.
    pub fn submit_move(&mut self, mv: Move) -> Result<Option<GetMoveRequest>, SessionError> {
        match self.status {
            SessionStatus::AwaitingHumanMove => {}
            SessionStatus::Terminal => {
                if let Some(result) = self.result {
                    return Err(SessionError::GameOver(result));
                }
                return Err(SessionError::NotAwaitingHumanMove {
                    status: self.status,
                });
            }
            SessionStatus::Idle => return Err(SessionError::NoActiveGame),
            SessionStatus::AwaitingBotMove => {
                return Err(SessionError::NotAwaitingHumanMove {
                    status: self.status,
                })
            }
        }

        let to_move = self.board.active_color();
        if to_move != self.human_color {
            return Err(SessionError::WrongSide {
                expected: to_move,
                actual: self.human_color,
            });
        }

        let game_id = self.game_id.clone().ok_or(SessionError::NoActiveGame)?;
        let fen_before = self.board.to_fen();
        let played = self
            .board
            .make_move(mv)
            .map_err(SessionError::IllegalMove)?;

        let time_taken = self.move_clock_start.elapsed().as_secs_f64();
        self.move_clock_start = Instant::now();

        let uci = played.mv.to_uci();
        debug!("Human played {} ({}) after {:.1}s", uci, played.san, time_taken);
        self.history.push(MoveRecord {
            uci: uci.clone(),
            san: played.san,
            color: played.color,
            by: Mover::User,
        });

        if let Some(result) = self.board.status() {
            self.finish(result);
            return Ok(None);
        }

        let request = GetMoveRequest::new(game_id, uci, fen_before, time_taken);
        self.status = SessionStatus::AwaitingBotMove;
        self.pending = Some(request.clone());
        Ok(Some(request))
    }

    /// `awaiting_bot_move → awaiting_human_move | terminal`
    ///
    /// The bot move is applied as returned, without a local legality check.
    /// The result is compared with the position the service reports; if they
    /// differ, or the move cannot be interpreted, the service position wins.
    pub fn apply_bot_reply(&mut self, resp: GetMoveResponse) -> Result<BotReply, SessionError> {
        if self.status != SessionStatus::AwaitingBotMove {
            return Err(SessionError::NothingPending);
        }

        let server_board = Board::from_fen(&resp.fen).ok();

        let mut candidate = self.board.clone();
        let mut record = None;
        let mut resynced = false;

        if let Some(bot_move) = resp.bot_move.as_deref() {
            let applied = Move::from_uci(bot_move).and_then(|mv| candidate.apply_unchecked(mv));
            match (applied, &server_board) {
                (Ok(played), Some(server)) => {
                    if hash_board_state(&candidate) != hash_board_state(server) {
                        warn!(
                            "Position mismatch after bot move {}: local '{}', service '{}'",
                            bot_move,
                            candidate.to_fen(),
                            server.to_fen()
                        );
                        candidate.resync_last_move(server);
                        resynced = true;
                    }
                    record = Some(MoveRecord {
                        uci: played.mv.to_uci(),
                        san: played.san,
                        color: played.color,
                        by: Mover::Bot,
                    });
                }
                (Ok(played), None) => {
                    warn!(
                        "Service position '{}' is unreadable; keeping local result of {}",
                        resp.fen, bot_move
                    );
                    record = Some(MoveRecord {
                        uci: played.mv.to_uci(),
                        san: played.san,
                        color: played.color,
                        by: Mover::Bot,
                    });
                }
                (Err(e), Some(server)) => {
                    warn!(
                        "Could not interpret bot move '{}' ({}); adopting service position",
                        bot_move, e
                    );
                    candidate.resync(server);
                    resynced = true;
                    record = Some(MoveRecord {
                        uci: bot_move.to_string(),
                        san: bot_move.to_string(),
                        color: self.bot_color(),
                        by: Mover::Bot,
                    });
                }
                (Err(e), None) => {
                    let reason = format!(
                        "bot move '{}' is unusable ({}) and position '{}' is not valid FEN",
                        bot_move, e, resp.fen
                    );
                    self.last_error = Some(ServiceError::Decode(reason.clone()));
                    return Err(SessionError::InvalidReply(reason));
                }
            }
        } else {
            match &server_board {
                Some(server) => {
                    if hash_board_state(&candidate) != hash_board_state(server) {
                        debug!("Adopting service position '{}'", resp.fen);
                        candidate.resync(server);
                        resynced = true;
                    }
                }
                None if resp.is_game_over() => {}
                None => {
                    let reason = format!("no bot move and position '{}' is not valid FEN", resp.fen);
                    self.last_error = Some(ServiceError::Decode(reason.clone()));
                    return Err(SessionError::InvalidReply(reason));
                }
            }
        }

        // Commit
        self.board = candidate;
        if let Some(record) = &record {
            self.history.push(record.clone());
        }
        if resynced {
            self.desync_count += 1;
        }
        if resp.stats.is_some() {
            self.last_stats = resp.stats;
        }
        self.last_error = None;
        self.pending = None;
        self.move_clock_start = Instant::now();

        if let Some(result) = self.board.status() {
            self.finish(result);
            return Ok(BotReply {
                bot_move: record,
                resynced,
                next_request: None,
            });
        }

        if record.is_none() {
            // The service stopped the game in a position the rules engine
            // still considers playable.
            warn!(
                "Service ended game {:?} without a move in a live position",
                self.game_id
            );
            self.finish(TerminalResult::draw(TerminalReason::Draw));
            return Ok(BotReply {
                bot_move: None,
                resynced,
                next_request: None,
            });
        }

        if self.board.active_color() == self.human_color {
            self.status = SessionStatus::AwaitingHumanMove;
            return Ok(BotReply {
                bot_move: record,
                resynced,
                next_request: None,
            });
        }

        // The service position still has the bot to move: ask again
        let game_id = self.game_id.clone().ok_or(SessionError::NoActiveGame)?;
        let request = GetMoveRequest::new(game_id, NULL_MOVE, self.board.to_fen(), 0.0);
        self.pending = Some(request.clone());
        Ok(BotReply {
            bot_move: record,
            resynced,
            next_request: Some(request),
        })
    }

    /// Record a failed bot request. The session stays in
    /// `awaiting_bot_move` and keeps the request for a retry.
    pub fn record_bot_failure(&mut self, error: ServiceError) -> Result<(), SessionError> {
        if self.status != SessionStatus::AwaitingBotMove {
            return Err(SessionError::NothingPending);
        }
        warn!("Bot request failed for session {}: {}", self.session_id, error);
        self.last_error = Some(error);
        Ok(())
    }

    /// `awaiting_* → terminal`, the human's opponent wins
    pub fn resign(&mut self) -> Result<TerminalResult, SessionError> {
        if !self.status.is_in_progress() {
            return Err(SessionError::CannotResign {
                status: self.status,
            });
        }

        let result = TerminalResult::resignation(self.human_color);
        info!("{} resigned in session {}", self.human_color, self.session_id);
        self.finish(result);
        Ok(result)
    }

    /// Any state `→ idle`. The current game is discarded.
    pub fn reset(&mut self) {
        if self.status.is_in_progress() {
            info!("Abandoning game {:?}", self.game_id);
        }
        *self = Session::new();
    }

    fn finish(&mut self, result: TerminalResult) {
        info!("Game over in session {}: {}", self.session_id, result);
        self.status = SessionStatus::Terminal;
        self.result = Some(result);
        self.pending = None;
    }
}
