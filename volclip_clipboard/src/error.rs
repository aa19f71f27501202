use thiserror::Error;

use volclip_snapshot::SnapshotError;
use volclip_world::WorldError;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("clipboard transport: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ClipboardError>;
