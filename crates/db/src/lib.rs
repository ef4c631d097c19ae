//! Persistence layer: connection pool, migrations, health reporting, and
//! the project/file/conversation repositories.

use std::time::{Duration, Instant};

use coder_core::types::Timestamp;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;
pub mod update;

pub use error::RepoError;

pub type DbPool = sqlx::PgPool;

/// Longest query prefix written to the debug log.
const LOGGED_QUERY_CHARS: usize = 120;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres connection string.
    pub url: String,
    /// Upper bound on pooled connections (default: `20`).
    pub max_connections: u32,
    /// How long a checkout may wait for a free connection (default: `5`s).
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Load pool settings from environment variables.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `DATABASE_URL`            | required |
    /// | `DB_MAX_CONNECTIONS`      | `20`     |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`      |
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        }
    }
}

/// Create a connection pool. Checkouts beyond `max_connections` queue for at
/// most `acquire_timeout` and then fail with [`sqlx::Error::PoolTimedOut`].
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Trivial round trip to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Connection pool occupancy.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoolStats {
    /// Connections currently open (checked out + idle).
    pub size: u32,
    /// Connections checked out by in-flight requests.
    pub active: u32,
    /// Open connections waiting in the pool.
    pub idle: u32,
    /// Configured ceiling; `active == max_connections` means new requests queue.
    pub max_connections: u32,
}

impl PoolStats {
    pub fn of(pool: &DbPool) -> Self {
        let size = pool.size();
        let idle = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX).min(size);
        Self {
            size,
            active: size - idle,
            idle,
            max_connections: pool.options().get_max_connections(),
        }
    }
}

/// Detailed database health, safe to expose to operators.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// `"healthy"` or `"unhealthy"`.
    pub status: &'static str,
    pub timestamp: Timestamp,
    pub version: &'static str,
    /// Round-trip time of the probe query, absent when it failed.
    pub latency_ms: Option<u64>,
    pub pool: PoolStats,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Probe the database and report pool occupancy. Never fails: a probe
/// error is logged and reported as `unhealthy`.
pub async fn health_report(pool: &DbPool) -> HealthReport {
    let started = Instant::now();
    let (status, latency_ms) = match health_check(pool).await {
        Ok(()) => ("healthy", Some(elapsed_ms(started))),
        Err(err) => {
            tracing::error!(error = %err, "Database health probe failed");
            ("unhealthy", None)
        }
    };

    HealthReport {
        status,
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        latency_ms,
        pool: PoolStats::of(pool),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Log a finished statement with its (truncated) text, duration, and row count.
pub(crate) fn log_query(sql: &str, started: Instant, rows: u64) {
    tracing::debug!(
        query = %truncate_query(sql),
        duration_ms = elapsed_ms(started),
        rows,
        "Executed query"
    );
}

fn truncate_query(sql: &str) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(LOGGED_QUERY_CHARS) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_log_text_is_flattened_and_truncated() {
        let sql = "SELECT  *\n   FROM projects\n WHERE id = $1";
        assert_eq!(truncate_query(sql), "SELECT * FROM projects WHERE id = $1");

        let long = format!("SELECT {} FROM t", "col, ".repeat(100));
        let out = truncate_query(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), LOGGED_QUERY_CHARS + 3);
    }
}
