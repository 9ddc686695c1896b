use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way processing a single game log can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot load settings from {}: {reason}", path.display())]
    ConfigUnavailable { path: PathBuf, reason: String },

    #[error("no setting matches file name {filename}")]
    SettingNotFound { filename: String },

    #[error("unknown setting name: {name}")]
    UnknownFamily { name: String },

    #[error("mode not found")]
    ModeNotFound,

    #[error("player {player} not found in game")]
    PlayerNotFound { player: String },

    /// Wars log without 先手/後手 name lines
    #[error("player names not found")]
    PlayerNamesNotFound,

    /// 24 log without 先手：NAME(RATING) / 後手：NAME(RATING)
    #[error("player information not found")]
    PlayerInfoNotFound,

    #[error("sql file not found: {}", path.display())]
    SqlFileNotFound { path: PathBuf },

    #[error("cannot decode {} as UTF-8 or Shift_JIS", path.display())]
    DecodeFailure { path: PathBuf },

    #[error("input path is neither a file nor a directory: {}", path.display())]
    InvalidInput { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
