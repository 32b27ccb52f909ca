//! Durable storage for uploaded content and issued links.
//!
//! The bot core only talks to the [`ContentRepository`] and
//! [`LinkRepository`] traits; [`PgStore`] implements both on PostgreSQL.

pub mod content;
pub mod error;
pub mod link;
pub mod postgres;

pub use {
    content::{ContentKind, ContentRecord, ContentRepository},
    error::{Error, Result},
    link::{LinkRecord, LinkRepository},
    postgres::PgStore,
};

/// Run database migrations for the storage crate.
///
/// Creates the `files` and `links` tables. Must be called at startup before
/// the dispatcher handles any event.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
