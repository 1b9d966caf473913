use super::commands::{ConfigCommand, GuestCommand, TuneArgs};
use super::error_handler::create_input_validation_error;
use super::play;
use crate::identity::{guest_id_path, GuestId};
use crate::messages::{ConfigUpdate, Side};
use crate::network::{
    BotClient, BotService, RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_RETRY_BASE_DELAY,
};
use crate::session::GameDriver;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default Bot Service location
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "MORPH_API_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot service base URL
    pub api_url: String,
    /// Data directory for the guest id
    pub data_dir: PathBuf,
    /// Per-attempt request timeout
    pub request_timeout_secs: u64,
    /// Attempts per bot request, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every further attempt
    pub retry_base_delay_ms: u64,
    /// Side used by `morph play` when `--side` is not given
    pub default_side: Side,
    /// Draw pieces as chess figurines instead of letters
    pub unicode_board: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = Self::default_data_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY.as_millis() as u64,
            default_side: Side::White,
            unicode_board: super::display::supports_unicode(),
        }
    }
}

impl Config {
    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        crate::identity::default_data_dir().context("Could not determine data directory")
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("dev", "morph", "morph")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Get the default config file path
    pub fn default_config_file() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        Self::load_or_create(&Self::default_config_file()?)
    }

    /// Load configuration from `path`, writing the defaults there first if
    /// the file is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            info!("Created default configuration at {}", path.display());
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).context("Failed to parse configuration file")?;
        Ok(config)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Apply the environment value and the command-line flag, flag last
    pub fn apply_overrides(&mut self, env_url: Option<String>, flag_url: Option<String>) {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            debug!("api_url overridden by {}", API_URL_ENV);
            self.api_url = url;
        }
        if let Some(url) = flag_url {
            debug!("api_url overridden by --api-url");
            self.api_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.request_timeout(),
            self.max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

/// Main application state
pub struct App {
    /// Application configuration
    pub config: Config,
    /// Anonymous identity sent with new games
    pub guest_id: GuestId,
    client: BotClient,
}

impl App {
    /// Load configuration (with overrides) and the guest id
    pub fn new(api_url_flag: Option<String>) -> Result<Self> {
        let mut config =
            Config::load_or_create_default().context("Failed to initialize configuration")?;
        config.apply_overrides(std::env::var(API_URL_ENV).ok(), api_url_flag);
        Self::with_config(config)
    }

    /// Build the app from an already resolved configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::ensure_data_dir(&config.data_dir).context("Failed to create data directory")?;

        let guest_id =
            GuestId::load_or_generate(&config.data_dir).context("Failed to initialize guest id")?;

        let client = BotClient::with_timeout(&config.api_url, config.request_timeout())
            .map_err(|e| {
                create_input_validation_error("api_url", &config.api_url, &e.to_string())
            })?;

        Ok(App {
            config,
            guest_id,
            client,
        })
    }

    /// Ensure data directory exists and is writable
    pub fn ensure_data_dir(data_dir: &Path) -> Result<()> {
        if !data_dir.exists() {
            std::fs::create_dir_all(data_dir).with_context(|| {
                format!("Failed to create data directory: {}", data_dir.display())
            })?;
        }

        let test_file = data_dir.join(".write_test");
        std::fs::write(&test_file, "test")
            .with_context(|| format!("Data directory is not writable: {}", data_dir.display()))?;
        std::fs::remove_file(&test_file).context("Failed to clean up write test file")?;
        Ok(())
    }

    pub fn client(&self) -> &BotClient {
        &self.client
    }

    /// Run an interactive game
    pub async fn handle_play(&self, side: Option<Side>) -> Result<()> {
        let side = side.unwrap_or(self.config.default_side);
        let driver = GameDriver::new(
            self.client.clone(),
            self.guest_id.as_str(),
            self.config.retry_policy(),
        );
        play::run_interactive(driver, side, self.config.unicode_board).await
    }

    pub async fn handle_health(&self) -> Result<()> {
        let client = &self.client;
        let health = self
            .config
            .retry_policy()
            .run("health", || client.health())
            .await
            .with_context(|| format!("Health check against {} failed", client.base_url()))?;

        println!("✅ Bot service at {} is up", client.base_url());
        println!("   Status:  {}", health.status);
        if let Some(version) = health.version {
            println!("   Version: {}", version);
        }
        Ok(())
    }

    pub fn handle_guest(&mut self, command: GuestCommand) -> Result<()> {
        match command {
            GuestCommand::Show => println!("{}", self.guest_id),
            GuestCommand::Reset => {
                let old = std::mem::replace(
                    &mut self.guest_id,
                    GuestId::reset(&self.config.data_dir).context("Failed to reset guest id")?,
                );
                println!("Guest id reset: {} -> {}", old, self.guest_id);
            }
            GuestCommand::Path => {
                println!("{}", guest_id_path(&self.config.data_dir).display())
            }
        }
        Ok(())
    }

    pub fn handle_config(&self, command: ConfigCommand) -> Result<()> {
        match command {
            ConfigCommand::Show => {
                println!("Configuration");
                println!("{}", "=".repeat(80));
                print!(
                    "{}",
                    toml::to_string_pretty(&self.config)
                        .context("Failed to serialize configuration")?
                );
                println!("{}", "=".repeat(80));
            }
            ConfigCommand::Path => println!("{}", Config::default_config_file()?.display()),
        }
        Ok(())
    }

    pub async fn handle_tune(&self, args: TuneArgs) -> Result<()> {
        let update: ConfigUpdate = args.into();
        if update.is_empty() {
            return Err(create_input_validation_error(
                "tuning",
                "",
                "no tuning values were given",
            )
            .into());
        }

        let client = &self.client;
        let resp = self
            .config
            .retry_policy()
            .run("update-config", || client.update_config(&update))
            .await
            .context("Failed to update bot configuration")?;

        println!("✅ Bot configuration {}", resp.status);
        println!("{}", "=".repeat(80));
        println!(
            "{}",
            serde_json::to_string_pretty(&resp.config).unwrap_or_else(|_| resp.config.to_string())
        );
        println!("{}", "=".repeat(80));
        Ok(())
    }
}
