/// Crate-wide result type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The content key already exists. Keys are random, so this is surfaced
    /// rather than retried.
    #[error("content key already exists: {key}")]
    DuplicateKey { key: String },

    /// A stored row carries a kind this build does not know.
    #[error("unknown content kind: {0}")]
    UnknownKind(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
