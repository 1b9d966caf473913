use super::machine::BotReply;
use super::state::{MoveRecord, Session, SessionError, SessionStatus};
use crate::chess::{Move, TerminalResult};
use crate::messages::{GetMoveRequest, Side, StartGameRequest};
use crate::network::{BotService, RetryPolicy};
use tracing::{info, instrument, warn};

/// Consecutive replies that may leave the bot still to move before giving up
const MAX_FOLLOW_UP_REQUESTS: usize = 4;

/// What happened during one driver call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnReport {
    pub human_move: Option<MoveRecord>,
    pub bot_moves: Vec<MoveRecord>,
    /// The local board was replaced by the service's position at least once
    pub resynced: bool,
    pub result: Option<TerminalResult>,
}

impl TurnReport {
    pub fn bot_move(&self) -> Option<&MoveRecord> {
        self.bot_moves.last()
    }
}

/// Runs a [`Session`] against a [`BotService`].
///
/// Every operation takes `&mut self`, so one session never has two requests
/// in flight.
pub struct GameDriver<B: BotService> {
    service: B,
    session: Session,
    guest_id: String,
    policy: RetryPolicy,
}

impl<B: BotService> GameDriver<B> {
    pub fn new(service: B, guest_id: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            service,
            session: Session::new(),
            guest_id: guest_id.into(),
            policy,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn service(&self) -> &B {
        &self.service
    }

    pub fn guest_id(&self) -> &str {
        &self.guest_id
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Discard any current game and start a new one.
    /// When the bot has the first move, it is requested right away.
    #[instrument(skip(self), fields(guest_id = %self.guest_id))]
    pub async fn start_game(&mut self, side: Side) -> Result<TurnReport, SessionError> {
        self.session.reset();

        let request = StartGameRequest::new(self.guest_id.clone(), side);
        let policy = self.policy;
        let service = &self.service;
        let resp = policy
            .run("start-game", || service.start_game(&request))
            .await?;

        info!(
            "Started game {} playing {} (requested {})",
            resp.game_id, resp.orientation, side
        );

        let mut report = TurnReport::default();
        if let Some(opening) = self.session.start(resp)? {
            self.request_bot_move(opening, &mut report).await?;
        }
        report.result = self.session.result().copied();
        Ok(report)
    }

    /// Play a human move and wait for the bot's answer.
    ///
    /// Illegal moves are rejected before anything is sent. If the bot cannot
    /// be reached the move stays on the board, the session keeps waiting for
    /// the bot and [`GameDriver::retry`] re-sends the request.
    pub async fn play(&mut self, mv: Move) -> Result<TurnReport, SessionError> {
        let request = self.session.submit_move(mv)?;

        let mut report = TurnReport {
            human_move: self.session.last_move().cloned(),
            ..Default::default()
        };

        if let Some(request) = request {
            self.request_bot_move(request, &mut report).await?;
        }
        report.result = self.session.result().copied();
        Ok(report)
    }

    /// Re-send the pending bot request after a failure
    pub async fn retry(&mut self) -> Result<TurnReport, SessionError> {
        if self.session.status() != SessionStatus::AwaitingBotMove {
            return Err(SessionError::NothingPending);
        }
        let request = self
            .session
            .pending_request()
            .cloned()
            .ok_or(SessionError::NothingPending)?;

        let mut report = TurnReport::default();
        self.request_bot_move(request, &mut report).await?;
        report.result = self.session.result().copied();
        Ok(report)
    }

    pub fn resign(&mut self) -> Result<TerminalResult, SessionError> {
        self.session.resign()
    }

    /// Back to idle; the next `start_game` begins a fresh session
    pub fn new_game(&mut self) {
        self.session.reset();
    }

    async fn request_bot_move(
        &mut self,
        mut request: GetMoveRequest,
        report: &mut TurnReport,
    ) -> Result<(), SessionError> {
        for _ in 0..=MAX_FOLLOW_UP_REQUESTS {
            let policy = self.policy;
            let service = &self.service;
            let outcome = policy
                .run("get-move", || service.get_move(&request))
                .await;

            let resp = match outcome {
                Ok(resp) => resp,
                Err(e) => {
                    self.session.record_bot_failure(e.clone())?;
                    return Err(SessionError::Service(e));
                }
            };

            let BotReply {
                bot_move,
                resynced,
                next_request,
            } = self.session.apply_bot_reply(resp)?;

            report.resynced |= resynced;
            if resynced {
                warn!(
                    "Local board replaced by service position ({} times this game)",
                    self.session.desync_count()
                );
            }
            if let Some(record) = bot_move {
                report.bot_moves.push(record);
            }

            match next_request {
                Some(next) => request = next,
                None => return Ok(()),
            }
        }

        let error = crate::network::ServiceError::Decode(format!(
            "bot service kept the move for {} replies in a row",
            MAX_FOLLOW_UP_REQUESTS + 1
        ));
        self.session.record_bot_failure(error.clone())?;
        Err(SessionError::Service(error))
    }
}
