use std::path::PathBuf;

/// Crate-wide result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize config: {message}")]
    Serialize { message: String },

    #[error("unsupported config format: .{0}")]
    UnsupportedFormat(String),

    /// Required values are absent after loading; the process cannot start.
    #[error("config missing required fields ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl Error {
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn serialize(message: impl std::fmt::Display) -> Self {
        Self::Serialize {
            message: message.to_string(),
        }
    }
}
