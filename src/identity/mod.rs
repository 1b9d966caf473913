pub mod guest;
pub mod storage;

pub use guest::GuestId;
pub use storage::{default_data_dir, guest_id_path};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Could not determine the data directory for this platform")]
    NoDataDir,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Guest id file is corrupt: {0}")]
    Corrupt(String),
}
