pub mod driver;
pub mod machine;
pub mod state;

pub use driver::{GameDriver, TurnReport};
pub use machine::BotReply;
pub use state::{MoveRecord, Mover, Session, SessionError, SessionStatus};
