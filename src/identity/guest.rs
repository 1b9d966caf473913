use super::storage::{ensure_parent_exists, guest_id_path};
use super::IdentityError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Anonymous identifier sent with every new game.
///
/// Generated once, stored as a single line in the data directory and reused
/// until the user resets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(String);

impl GuestId {
    /// Generate a new random guest id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier, rejecting blank or multi-line values
    pub fn from_string(s: String) -> Result<Self, IdentityError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(IdentityError::Corrupt(format!(
                "guest id must be a single non-empty token, got {:?}",
                s
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the guest id stored under `data_dir`, if there is one
    pub fn load(data_dir: &Path) -> Result<Option<Self>, IdentityError> {
        let path = guest_id_path(data_dir);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| IdentityError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_string(content).map(Some)
    }

    /// Write the guest id under `data_dir`, replacing any previous one
    pub fn save(&self, data_dir: &Path) -> Result<(), IdentityError> {
        let path = guest_id_path(data_dir);
        ensure_parent_exists(&path)?;
        std::fs::write(&path, format!("{}\n", self.0))
            .map_err(|source| IdentityError::Io { path, source })
    }

    /// Load the stored guest id or create and store a new one.
    /// An unreadable file is replaced.
    pub fn load_or_generate(data_dir: &Path) -> Result<Self, IdentityError> {
        match Self::load(data_dir) {
            Ok(Some(guest_id)) => {
                debug!("Using stored guest id {}", guest_id);
                Ok(guest_id)
            }
            Ok(None) => {
                let guest_id = Self::generate();
                guest_id.save(data_dir)?;
                info!("Created guest id {}", guest_id);
                Ok(guest_id)
            }
            Err(IdentityError::Corrupt(reason)) => {
                warn!("Replacing unreadable guest id file: {}", reason);
                let guest_id = Self::generate();
                guest_id.save(data_dir)?;
                Ok(guest_id)
            }
            Err(e) => Err(e),
        }
    }

    /// Throw away the stored guest id and store a new one
    pub fn reset(data_dir: &Path) -> Result<Self, IdentityError> {
        let guest_id = Self::generate();
        guest_id.save(data_dir)?;
        info!("Reset guest id to {}", guest_id);
        Ok(guest_id)
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
