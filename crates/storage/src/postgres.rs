use std::time::Duration;

use {
    async_trait::async_trait,
    sqlx::postgres::{PgPool, PgPoolOptions},
    tracing::{info, warn},
};

use crate::{
    content::{ContentRecord, ContentRepository},
    error::{Error, Result},
    link::{LinkRecord, LinkRepository},
};

/// Startup connection attempts before giving up.
const CONNECT_ATTEMPTS: u32 = 15;

/// Pause between connection attempts.
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

#[derive(sqlx::FromRow)]
struct FileRow {
    file_id: String,
    caption: Option<String>,
    file_type: String,
}

/// PostgreSQL-backed content and link store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url`, retrying while the database comes up, then migrate.
    pub async fn connect(url: &str) -> Result<Self> {
        let mut attempt = 1;
        let pool = loop {
            match PgPoolOptions::new().max_connections(5).connect(url).await {
                Ok(pool) => break pool,
                Err(e) if attempt < CONNECT_ATTEMPTS => {
                    warn!(attempt, error = %e, "database not reachable, retrying");
                    attempt += 1;
                    tokio::time::sleep(CONNECT_BACKOFF).await;
                },
                Err(e) => return Err(e.into()),
            }
        };
        crate::run_migrations(&pool).await?;
        info!(attempt, "database connected");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentRepository for PgStore {
    async fn create(&self, record: &ContentRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO files (file_id, file_key, caption, file_type) VALUES ($1, $2, $3, $4)",
        )
        .bind(&record.file_id)
        .bind(&record.key)
        .bind(&record.caption)
        .bind(record.kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::DuplicateKey {
                key: record.key.clone(),
            },
            other => other.into(),
        })?;
        Ok(())
    }

    async fn update_caption(&self, key: &str, caption: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET caption = $1 WHERE file_key = $2")
            .bind(caption)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, key: &str) -> Result<Option<ContentRecord>> {
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT file_id, caption, file_type FROM files WHERE file_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(ContentRecord {
            key: key.to_string(),
            file_id: row.file_id,
            kind: row.file_type.parse()?,
            caption: row.caption.unwrap_or_default(),
        }))
    }
}

#[async_trait]
impl LinkRepository for PgStore {
    async fn create(&self, link: &LinkRecord) -> Result<()> {
        sqlx::query("INSERT INTO links (file_key, url, created_at) VALUES ($1, $2, $3)")
            .bind(&link.key)
            .bind(&link.url)
            .bind(link.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
