use thiserror::Error;

use volclip_ids::{ActorID, LevelID};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    #[error("no actor with id {0}")]
    UnknownActor(ActorID),

    #[error("no level with id {0}")]
    UnknownLevel(LevelID),

    #[error("no class `{0}`")]
    UnknownClass(String),

    #[error("class `{0}` is not a volume")]
    NotAVolume(String),

    #[error("an actor named `{name}` already exists in {level}")]
    NameCollision { name: String, level: String },

    #[error("no streaming level at index {0}")]
    UnknownStreamingLevel(usize),

    #[error("package `{0}` is not in the asset library")]
    PackageNotFound(String),

    #[error("a transaction (`{0}`) is already open")]
    TransactionOpen(String),

    #[error("no transaction is open")]
    NoTransaction,

    #[error("world file: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, WorldError>;
