use super::error::ServiceError;
use crate::messages::{
    ConfigUpdate, ConfigUpdateResponse, GetMoveRequest, GetMoveResponse, HealthResponse,
    StartGameRequest, StartGameResponse,
};
use async_trait::async_trait;

/// The remote bot: starts games and answers human moves.
///
/// `BotClient` speaks HTTP; tests substitute scripted implementations.
#[async_trait]
pub trait BotService: Send + Sync {
    async fn start_game(&self, req: &StartGameRequest) -> Result<StartGameResponse, ServiceError>;

    async fn get_move(&self, req: &GetMoveRequest) -> Result<GetMoveResponse, ServiceError>;

    async fn health(&self) -> Result<HealthResponse, ServiceError>;

    async fn update_config(
        &self,
        update: &ConfigUpdate,
    ) -> Result<ConfigUpdateResponse, ServiceError>;
}
