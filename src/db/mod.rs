pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub use memory::MemoryStore;
pub use models::{Category, NewQuestion, Question};
pub use postgres::PgStore;

/// Errors raised by a [`TriviaStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations behind the HTTP handlers.
///
/// Every method is a single attempt; failures propagate to the caller.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    /// All categories ordered by id.
    async fn categories(&self) -> StoreResult<Vec<Category>>;

    async fn category(&self, id: i32) -> StoreResult<Option<Category>>;

    /// Questions ordered by id, windowed by `offset`/`limit`.
    async fn questions_page(&self, offset: i64, limit: i64) -> StoreResult<Vec<Question>>;

    async fn questions_count(&self) -> StoreResult<i64>;

    async fn question(&self, id: i32) -> StoreResult<Option<Question>>;

    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question>;

    /// Hard delete. Returns `false` when no row had that id.
    async fn delete_question(&self, id: i32) -> StoreResult<bool>;

    /// Case-insensitive literal substring match on the question text.
    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>>;

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>>;

    /// Uniform random pick among questions not in `exclude`, optionally
    /// restricted to one category.
    async fn random_question(
        &self,
        category: Option<i32>,
        exclude: &[i32],
    ) -> StoreResult<Option<Question>>;

    /// Round-trip latency to the backend.
    async fn ping(&self) -> StoreResult<Duration>;
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432/trivia".to_string()),
            max_connections: env_or("DB_POOL_MAX", 10),
            min_connections: env_or("DB_POOL_MIN", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT", 300),
        }
    }
}

/// Replace the password in a connection string's userinfo with `***`.
pub(crate) fn redact_url(url: &str) -> String {
    let authority_start = url.find("://").map_or(0, |i| i + 3);
    let rest = &url[authority_start..];
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let Some(at) = authority.rfind('@') else {
        return url.to_string();
    };
    let userinfo = &authority[..at];
    let Some(colon) = userinfo.find(':') else {
        return url.to_string();
    };

    let password_start = authority_start + colon + 1;
    let password_end = authority_start + at;
    format!("{}***{}", &url[..password_start], &url[password_end..])
}

pub async fn init_pool(config: Option<DbConfig>) -> Result<PgPool, sqlx::Error> {
    let config = config.unwrap_or_default();

    tracing::info!("Initializing database connection pool...");
    tracing::debug!("Database URL: {}", redact_url(&config.url));

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id SERIAL PRIMARY KEY,
            type TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    // category is deliberately not a foreign key
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id SERIAL PRIMARY KEY,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            category INTEGER NOT NULL,
            difficulty INTEGER NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}
