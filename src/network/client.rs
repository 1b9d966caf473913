use super::error::ServiceError;
use super::retry::DEFAULT_REQUEST_TIMEOUT;
use super::service::BotService;
use crate::messages::chess::{validate_get_move_request, validate_get_move_response};
use crate::messages::{
    ConfigUpdate, ConfigUpdateResponse, ErrorDetail, GetMoveRequest, GetMoveResponse,
    HealthResponse, StartGameRequest, StartGameResponse,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("morph/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Bot Service
#[derive(Debug, Clone)]
pub struct BotClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BotClient {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ServiceError::InvalidRequest(format!(
                "Bot service URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(path, e))?;
        self.decode(path, resp).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.classify(path, e))?;
        self.decode(path, resp).await
    }

    async fn decode<T>(&self, path: &str, resp: Response) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.classify(path, e))?;
        debug!("{} -> HTTP {} ({} bytes)", path, status.as_u16(), text.len());

        if !status.is_success() {
            // FastAPI reports failures as {"detail": "..."}
            let detail = serde_json::from_str::<ErrorDetail>(&text)
                .map(|body| body.detail)
                .unwrap_or_else(|_| {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        status.canonical_reason().unwrap_or("no details").to_string()
                    } else {
                        trimmed.to_string()
                    }
                });
            return Err(ServiceError::Status {
                code: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(format!("{}: {}", path, e)))
    }

    fn classify(&self, path: &str, err: reqwest::Error) -> ServiceError {
        if err.is_connect() {
            ServiceError::Unreachable(err.to_string())
        } else if err.is_timeout() {
            ServiceError::timeout(path.trim_start_matches('/'), self.timeout)
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl BotService for BotClient {
    #[instrument(skip(self, req), fields(side = %req.side))]
    async fn start_game(&self, req: &StartGameRequest) -> Result<StartGameResponse, ServiceError> {
        self.post_json("/start-game", req).await
    }

    #[instrument(skip(self, req), fields(game_id = %req.game_id, user_move = %req.user_move))]
    async fn get_move(&self, req: &GetMoveRequest) -> Result<GetMoveResponse, ServiceError> {
        validate_get_move_request(req).map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

        let resp: GetMoveResponse = self.post_json("/get-move", req).await?;
        validate_get_move_response(&resp).map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(resp)
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        self.get_json("/health").await
    }

    async fn update_config(
        &self,
        update: &ConfigUpdate,
    ) -> Result<ConfigUpdateResponse, ServiceError> {
        self.post_json("/update-config", update).await
    }
}
