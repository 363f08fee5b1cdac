use async_trait::async_trait;
use flatboat_application::ports::ZoneSerial;
use flatboat_domain::DomainError;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{error, info, warn};

/// Zone serial kept in `dns_serials`, with a cached copy for the query path.
///
/// Increments happen inside the caller's transaction. The cache only moves
/// once that transaction has committed and the caller publishes the value,
/// or when `latest` finds a higher value written by another process.
pub struct SqliteSerialCounter {
    pool: SqlitePool,
    read_pool: SqlitePool,
    cached: AtomicU32,
}

impl SqliteSerialCounter {
    pub async fn load(pool: SqlitePool) -> Result<Self, DomainError> {
        let serial = Self::read(&pool).await?;
        info!(serial, "Zone serial loaded");
        Ok(Self {
            read_pool: pool.clone(),
            pool,
            cached: AtomicU32::new(serial),
        })
    }

    /// Serves `latest` from `read_pool` instead of the write pool.
    pub fn with_read_pool(mut self, read_pool: SqlitePool) -> Self {
        self.read_pool = read_pool;
        self
    }

    async fn read(pool: &SqlitePool) -> Result<u32, DomainError> {
        let (serial,): (i64,) = sqlx::query_as("SELECT serial FROM dns_serials WHERE id = 1")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to read zone serial");
                DomainError::DatabaseError(e.to_string())
            })?;
        to_serial(serial)
    }

    /// Bumps the stored serial by one and returns the new value. Nothing is
    /// visible until `tx` commits.
    pub async fn increment(&self, tx: &mut Transaction<'_, Sqlite>) -> Result<u32, DomainError> {
        let (serial,): (i64,) =
            sqlx::query_as("UPDATE dns_serials SET serial = serial + 1 WHERE id = 1 RETURNING serial")
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to increment zone serial");
                    DomainError::DatabaseError(e.to_string())
                })?;
        to_serial(serial)
    }

    /// Makes a committed serial visible to readers. Stale values are ignored.
    pub fn publish(&self, serial: u32) {
        self.cached.fetch_max(serial, Ordering::AcqRel);
    }

    /// Re-reads the stored serial, e.g. after another process wrote to the
    /// database.
    pub async fn reload(&self) -> Result<u32, DomainError> {
        let serial = Self::read(&self.pool).await?;
        self.publish(serial);
        Ok(self.current())
    }
}

#[async_trait]
impl ZoneSerial for SqliteSerialCounter {
    fn current(&self) -> u32 {
        self.cached.load(Ordering::Acquire)
    }

    async fn latest(&self) -> u32 {
        match Self::read(&self.read_pool).await {
            Ok(serial) => self.publish(serial),
            Err(e) => warn!(error = %e, "Serving cached zone serial"),
        }
        self.current()
    }
}

fn to_serial(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        error!(serial = value, "Zone serial out of range");
        DomainError::DatabaseError(format!("zone serial {value} does not fit in 32 bits"))
    })
}
