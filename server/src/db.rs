use crate::errors::{Error, Result};
use crate::metrics::STORAGE_FAILURES_TOTAL;
use crate::model::{NewReading, Reading};
use crate::store::{ReadingStore, Retention};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, error, info};

/// Key for the transaction-scoped advisory lock that serializes appenders.
const APPEND_LOCK_KEY: i64 = 0x5745_4154;

pub async fn make_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;

    info!("Database connection established");
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed");

    Ok(pool)
}

/// PostgreSQL-backed reading store. The durable default.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    retention: Retention,
}

impl PgStore {
    /// Connects and ensures the schema exists. Run once before serving traffic.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
        retention: Retention,
    ) -> Result<Self> {
        let pool = make_pool(database_url, max_connections, acquire_timeout).await?;
        Ok(Self::new(pool, retention))
    }

    pub fn new(pool: PgPool, retention: Retention) -> Self {
        Self { pool, retention }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn append_inner(&self, reading: NewReading) -> Result<Reading> {
        let mut tx = self.pool.begin().await?;

        // Commit order must match id order, otherwise a reader could see id n+1 before n.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(APPEND_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let stored = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO readings (temperature, humidity)
            VALUES ($1, $2)
            RETURNING id, temperature, humidity, timestamp
            "#,
        )
        .bind(reading.temperature)
        .bind(reading.humidity)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(limit) = self.retention.limit() {
            let limit = i64::try_from(limit).map_err(|_| {
                Error::Config(format!("retention {} exceeds the maximum of {}", limit, i64::MAX))
            })?;
            let evicted = sqlx::query(
                r#"
                DELETE FROM readings
                WHERE id < (
                    SELECT MIN(id) FROM (
                        SELECT id FROM readings ORDER BY id DESC LIMIT $1
                    ) AS newest
                )
                "#,
            )
            .bind(limit)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if evicted > 0 {
                debug!("Retention evicted {} readings", evicted);
            }
        }

        tx.commit().await?;
        Ok(stored)
    }
}

#[async_trait]
impl ReadingStore for PgStore {
    async fn append(&self, reading: NewReading) -> Result<Reading> {
        self.append_inner(reading).await.map_err(|e| {
            STORAGE_FAILURES_TOTAL.inc();
            error!("Failed to append reading: {}", e);
            e
        })
    }

    async fn latest(&self) -> Result<Option<Reading>> {
        let reading = sqlx::query_as::<_, Reading>(
            "SELECT id, temperature, humidity, timestamp FROM readings ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            STORAGE_FAILURES_TOTAL.inc();
            error!("Failed to load latest reading: {}", e);
            e
        })?;

        Ok(reading)
    }

    async fn all_ordered(&self) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            "SELECT id, temperature, humidity, timestamp FROM readings ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            STORAGE_FAILURES_TOTAL.inc();
            error!("Failed to load reading history: {}", e);
            e
        })?;

        Ok(readings)
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM readings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                STORAGE_FAILURES_TOTAL.inc();
                error!("Failed to count readings: {}", e);
                e
            })?;

        Ok(count as u64)
    }
}
