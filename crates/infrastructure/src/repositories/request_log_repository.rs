use async_trait::async_trait;
use chrono::Utc;
use flatboat_application::ports::{AuditSink, RequestLogRepository};
use flatboat_domain::config::DatabaseConfig;
use flatboat_domain::{AuditEntry, DomainError};
use sqlx::SqlitePool;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

const COLS_PER_ROW: usize = 7;
const ROWS_PER_CHUNK: usize = 999 / COLS_PER_ROW;

fn build_multi_insert_sql(n: usize) -> String {
    debug_assert!(n > 0 && n <= ROWS_PER_CHUNK);
    const HEADER: &str = "INSERT INTO dns_requests \
        (name, subdomain, request, response, src_ip, src_host, created_at) VALUES ";
    const PLACEHOLDER: &str = "(?,?,?,?,?,?,?)";
    let mut sql = String::with_capacity(HEADER.len() + n * (PLACEHOLDER.len() + 1));
    sql.push_str(HEADER);
    for i in 0..n {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str(PLACEHOLDER);
    }
    sql
}

struct RequestLogEntry {
    entry: AuditEntry,
    created_at: String,
}

/// Request log backed by `dns_requests`.
///
/// Entries go through a bounded channel to a single writer task that inserts
/// them in batches, so the query path never touches the write pool.
pub struct SqliteRequestLogRepository {
    pool: SqlitePool,
    sender: mpsc::Sender<RequestLogEntry>,
}

impl SqliteRequestLogRepository {
    /// Spawns the writer task; must be called inside a tokio runtime.
    pub fn new(pool: SqlitePool, cfg: &DatabaseConfig) -> Self {
        let channel_capacity = cfg.request_log_channel_capacity.max(1);
        let max_batch_size = cfg.request_log_max_batch_size.max(1);
        let flush_interval_ms = cfg.request_log_flush_interval_ms.max(1);

        let (sender, receiver) = mpsc::channel(channel_capacity);

        let flush_pool = pool.clone();
        tokio::spawn(async move {
            Self::flush_loop(flush_pool, receiver, max_batch_size, flush_interval_ms).await;
        });

        debug!(
            channel_capacity,
            batch_size = max_batch_size,
            flush_interval_ms,
            "Request log batching enabled"
        );

        Self { pool, sender }
    }

    async fn flush_loop(
        pool: SqlitePool,
        mut receiver: mpsc::Receiver<RequestLogEntry>,
        max_batch_size: usize,
        flush_interval_ms: u64,
    ) {
        let mut batch: Vec<RequestLogEntry> = Vec::with_capacity(max_batch_size);
        let mut flush_interval = tokio::time::interval(Duration::from_millis(flush_interval_ms));

        loop {
            tokio::select! {
                maybe_entry = receiver.recv() => {
                    match maybe_entry {
                        Some(entry) => {
                            batch.push(entry);
                            while batch.len() < max_batch_size {
                                match receiver.try_recv() {
                                    Ok(e) => batch.push(e),
                                    Err(_) => break,
                                }
                            }
                            if batch.len() >= max_batch_size {
                                Self::flush_batch(&pool, &mut batch).await;
                            }
                        }
                        None => {
                            if !batch.is_empty() { Self::flush_batch(&pool, &mut batch).await; }
                            info!("Request log flush task shutting down");
                            return;
                        }
                    }
                }
                _ = flush_interval.tick() => {
                    if !batch.is_empty() { Self::flush_batch(&pool, &mut batch).await; }
                }
            }
        }
    }

    async fn flush_batch(pool: &SqlitePool, batch: &mut Vec<RequestLogEntry>) {
        let count = batch.len();
        if count == 0 {
            return;
        }

        let start = Instant::now();

        let mut tx = match pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                error!(error = %e, count, "Failed to begin request log batch");
                batch.clear();
                return;
            }
        };

        let mut inserted = 0usize;
        let mut errors = 0usize;

        for chunk in batch.chunks(ROWS_PER_CHUNK) {
            let sql = build_multi_insert_sql(chunk.len());
            let mut q = sqlx::query(&sql);
            for row in chunk {
                q = q
                    .bind(row.entry.name.as_str())
                    .bind(row.entry.subdomain.as_str())
                    .bind(row.entry.request.as_slice())
                    .bind(row.entry.response.as_slice())
                    .bind(row.entry.src_ip.to_string())
                    .bind(row.entry.src_host.as_str())
                    .bind(row.created_at.as_str());
            }
            match q.execute(&mut *tx).await {
                Ok(r) => inserted += r.rows_affected() as usize,
                Err(e) => {
                    errors += chunk.len();
                    warn!(error = %e, chunk_size = chunk.len(), "Failed to insert request log chunk");
                }
            }
        }

        match tx.commit().await {
            Ok(_) => debug!(
                count = inserted,
                errors,
                duration_ms = start.elapsed().as_millis(),
                "Request log batch flushed"
            ),
            Err(e) => error!(error = %e, count, "Failed to commit request log batch"),
        }

        batch.clear();
    }
}

impl AuditSink for SqliteRequestLogRepository {
    fn record(&self, entry: AuditEntry) -> Result<(), DomainError> {
        let row = RequestLogEntry {
            entry,
            created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        match self.sender.try_send(row) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Request log channel full, dropping entry");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(DomainError::DatabaseError("request log writer stopped".to_string()))
            }
        }
    }
}

#[async_trait]
impl RequestLogRepository for SqliteRequestLogRepository {
    #[instrument(skip(self))]
    async fn delete_older_than(&self, retention_hours: u32) -> Result<u64, DomainError> {
        let cutoff = (Utc::now() - chrono::Duration::hours(i64::from(retention_hours)))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let deleted = sqlx::query("DELETE FROM dns_requests WHERE created_at < ?")
            .bind(&cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete old request logs");
                DomainError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if deleted > 0 {
            info!(deleted, retention_hours, "Old request logs removed");
        }
        Ok(deleted)
    }
}
