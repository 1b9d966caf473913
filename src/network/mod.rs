pub mod client;
pub mod error;
pub mod retry;
pub mod service;

pub use client::BotClient;
pub use error::{FailureClass, ServiceError};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_BASE_DELAY};
pub use service::BotService;
