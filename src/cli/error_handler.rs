use crate::chess::ChessError;
use crate::identity::IdentityError;
use crate::network::ServiceError;
use crate::session::SessionError;
use std::fmt;

/// Unified error type for CLI operations with user-friendly messages
#[derive(Debug)]
pub enum CliError {
    /// Game session error
    Session(SessionError),
    /// Bot service error
    Service(ServiceError),
    /// Chess rules error
    Chess(ChessError),
    /// Guest id storage error
    Identity(IdentityError),
    /// Input validation error
    InvalidInput {
        field: String,
        value: String,
        reason: String,
        suggestion: String,
    },
    /// Configuration error
    Configuration {
        setting: String,
        issue: String,
        suggestion: String,
    },
    /// Network timeout error
    NetworkTimeout {
        operation: String,
        timeout_seconds: u64,
        suggestion: String,
    },
    /// User-friendly error with custom message
    UserError {
        message: String,
        suggestion: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Session(e) => write!(f, "{}", format_session_error(e)),
            CliError::Service(e) => write!(f, "{}", format_service_error(e)),
            CliError::Chess(e) => write!(f, "{}", format_chess_error(e)),
            CliError::Identity(e) => write!(f, "{}", format_identity_error(e)),
            CliError::InvalidInput {
                field,
                value,
                reason,
                suggestion,
            } => {
                write!(
                    f,
                    "❌ Invalid {}: '{}'\n   Reason: {}\n   💡 Suggestion: {}",
                    field, value, reason, suggestion
                )
            }
            CliError::Configuration {
                setting,
                issue,
                suggestion,
            } => {
                write!(
                    f,
                    "⚙️  Configuration Error: {}\n   Issue: {}\n   💡 Suggestion: {}",
                    setting, issue, suggestion
                )
            }
            CliError::NetworkTimeout {
                operation,
                timeout_seconds,
                suggestion,
            } => {
                write!(
                    f,
                    "⏱️  Network timeout during {}\n   Timeout: {} seconds\n   💡 Suggestion: {}",
                    operation, timeout_seconds, suggestion
                )
            }
            CliError::UserError {
                message,
                suggestion,
            } => {
                if let Some(suggestion) = suggestion {
                    write!(f, "❌ {}\n   💡 Suggestion: {}", message, suggestion)
                } else {
                    write!(f, "❌ {}", message)
                }
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Service(e) => CliError::from(e),
            SessionError::IllegalMove(e) => CliError::Chess(e),
            other => CliError::Session(other),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Timeout { operation, timeout } => {
                create_network_timeout_error(&operation, timeout.as_secs().max(1))
            }
            other => CliError::Service(other),
        }
    }
}

impl From<ChessError> for CliError {
    fn from(err: ChessError) -> Self {
        CliError::Chess(err)
    }
}

impl From<IdentityError> for CliError {
    fn from(err: IdentityError) -> Self {
        CliError::Identity(err)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<CliError>() {
            Ok(cli) => return cli,
            Err(err) => err,
        };
        if let Some(service) = err.downcast_ref::<ServiceError>() {
            return CliError::from(service.clone());
        }
        if let Some(session) = err.downcast_ref::<SessionError>() {
            return CliError::from(session.clone());
        }

        CliError::UserError {
            message: format!("{:#}", err),
            suggestion: Some("Check the error details above and try again.".to_string()),
        }
    }
}

/// Format session errors with user-friendly messages
fn format_session_error(error: &SessionError) -> String {
    match error {
        SessionError::NoActiveGame => {
            "🎮 No game in progress.\n   💡 Suggestion: Type 'new' to start a game.".to_string()
        }
        SessionError::GameInProgress { .. } => {
            "🎮 A game is already running.\n   💡 Suggestion: Finish or 'resign' the current game before starting another.".to_string()
        }
        SessionError::NotAwaitingHumanMove { status } => {
            format!("⏳ It is not your turn (game is {}).\n   💡 Suggestion: If the bot did not answer, type 'retry'.", status)
        }
        SessionError::WrongSide { expected, actual } => {
            format!("♟️  That is a {} piece, but {} is to move.\n   💡 Suggestion: Type 'board' to see the position.", actual, expected)
        }
        SessionError::IllegalMove(e) => format_chess_error(e),
        SessionError::GameOver(result) => {
            format!("🏁 The game is over: {}.\n   💡 Suggestion: Type 'new' to play again or 'pgn' to export the game.", result)
        }
        SessionError::CannotResign { status } => {
            format!("🏳️  Nothing to resign (game is {}).\n   💡 Suggestion: Type 'new' to start a game.", status)
        }
        SessionError::NothingPending => {
            "🔁 There is no bot move to retry.\n   💡 Suggestion: Enter your move instead.".to_string()
        }
        SessionError::InvalidStart(msg) | SessionError::InvalidReply(msg) => {
            format!("🤖 The bot service sent something unusable: {}\n   💡 Suggestion: Check that --api-url points at a ChessMorph bot service.", msg)
        }
        SessionError::Service(e) => format_service_error(e),
    }
}

/// Format bot service errors with user-friendly messages
fn format_service_error(error: &ServiceError) -> String {
    match error {
        ServiceError::Unreachable(msg) => {
            format!("🌐 Could not connect to the bot service: {}\n   💡 Suggestion: Make sure the service is running and --api-url is correct. 'morph health' checks the connection.", msg)
        }
        ServiceError::Transport(msg) => {
            format!("🌐 Could not reach the bot service: {}\n   💡 Suggestion: Make sure the service is running, then type 'retry'. 'morph health' checks the connection.", msg)
        }
        ServiceError::Timeout { operation, timeout } => {
            format!("⏱️  The bot service did not answer {} within {:?}.\n   💡 Suggestion: {}", operation, timeout, timeout_suggestion(operation))
        }
        ServiceError::Status { code, detail } if *code >= 500 => {
            format!("🤖 The bot service failed (HTTP {}): {}\n   💡 Suggestion: Type 'retry' to ask again.", code, detail)
        }
        ServiceError::Status { code, detail } => {
            format!("🤖 The bot service rejected the request (HTTP {}): {}\n   💡 Suggestion: Type 'board' to compare positions, or 'new' to start over.", code, detail)
        }
        ServiceError::Decode(msg) => {
            format!("🤖 Unexpected answer from the bot service: {}\n   💡 Suggestion: Check that --api-url points at a ChessMorph bot service.", msg)
        }
        ServiceError::InvalidRequest(msg) => {
            format!("🔧 Invalid request: {}\n   💡 Suggestion: Check the --api-url value and configuration.", msg)
        }
    }
}

/// Format chess errors with user-friendly messages
fn format_chess_error(error: &ChessError) -> String {
    match error {
        ChessError::InvalidMove(msg) | ChessError::InvalidSquare(msg) => {
            format!("♟️  Invalid move: {}\n   💡 Suggestion: Use UCI notation (e.g., 'e2e4', 'g1f3', 'e7e8q') or 'O-O'. Type 'hint e2' to see where a piece can go.", msg)
        }
        ChessError::IllegalMove(msg) => {
            format!("♟️  Illegal move: {}\n   💡 Suggestion: Type 'hint <square>' to list the legal targets of a piece.", msg)
        }
        ChessError::InvalidFen(msg) => {
            format!(
                "♟️  Invalid board notation: {}\n   💡 Suggestion: Check the FEN string format.",
                msg
            )
        }
        ChessError::InvalidColor(msg) => {
            format!("♟️  Invalid color: {}\n   💡 Suggestion: Use 'white', 'black' or 'random'.", msg)
        }
        ChessError::InvalidPieceType(msg) => {
            format!("♟️  Invalid piece: {}\n   💡 Suggestion: Promote with q, r, b or n (e.g., 'e7e8q').", msg)
        }
        ChessError::BoardStateError(msg) => {
            format!("♟️  Board state error: {}\n   💡 Suggestion: Type 'board' to see the current position.", msg)
        }
    }
}

fn format_identity_error(error: &IdentityError) -> String {
    format!(
        "🗃️  Guest id error: {}\n   💡 Suggestion: Run 'morph guest reset' to create a new guest id.",
        error
    )
}

/// Create a network timeout error with helpful suggestions
pub fn create_network_timeout_error(operation: &str, timeout_seconds: u64) -> CliError {
    CliError::NetworkTimeout {
        operation: operation.to_string(),
        timeout_seconds,
        suggestion: timeout_suggestion(operation).to_string(),
    }
}

fn timeout_suggestion(operation: &str) -> &'static str {
    match operation {
        "start-game" => "The bot service may be starting up. Type 'new' to try again in a moment.",
        "get-move" => "The bot is taking too long. Type 'retry' to ask again.",
        "health" => "Make sure the bot service is running and --api-url is correct.",
        "update-config" => "Run 'morph health', then repeat the 'morph tune' command.",
        _ => "Network operation timed out. Check connection and try again.",
    }
}

/// Create an input validation error with helpful suggestions
pub fn create_input_validation_error(field: &str, value: &str, reason: &str) -> CliError {
    let suggestion = match field {
        "chess_move" => "Use UCI notation (e.g., 'e2e4', 'e7e8q') or 'O-O' / 'O-O-O'.".to_string(),
        "square" => "Use a square name such as 'e2' or 'g8'.".to_string(),
        "side" => "Use 'white', 'black' or 'random'.".to_string(),
        "api_url" => "Use a full URL such as 'http://localhost:8000'.".to_string(),
        "command" => "Type 'help' to list the available commands.".to_string(),
        _ => "Check the input format and try again.".to_string(),
    };

    CliError::InvalidInput {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
        suggestion,
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Display an error with proper formatting and exit codes
pub fn display_error_and_exit(error: CliError, exit_code: i32) -> ! {
    eprintln!("\n{}", error);
    std::process::exit(exit_code);
}

/// Display an error without exiting (for recoverable errors)
pub fn display_error(error: &CliError) {
    eprintln!("\n{}", error);
}

/// Check if an error leaves the game playable (the user can retry or re-enter)
pub fn is_recoverable_error(error: &CliError) -> bool {
    match error {
        CliError::NetworkTimeout { .. } | CliError::InvalidInput { .. } | CliError::Chess(_) => {
            true
        }
        CliError::Service(e) => e.is_retryable(),
        CliError::Session(
            SessionError::NotAwaitingHumanMove { .. }
            | SessionError::WrongSide { .. }
            | SessionError::IllegalMove(_)
            | SessionError::NothingPending
            | SessionError::NoActiveGame
            | SessionError::GameOver(_)
            | SessionError::CannotResign { .. },
        ) => true,
        _ => false,
    }
}
