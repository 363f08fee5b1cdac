use async_trait::async_trait;
use flatboat_application::ports::RecordRepository;
use flatboat_domain::{normalize_name, DomainError, Mutation, RecordCodec, StoredRecord, Zone};
use hickory_proto::rr::Record;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::serial_counter::SqliteSerialCounter;

type RecordRow = (i64, String, String, Vec<u8>, String);

/// A record ready to be written: normalized owner, owning subdomain, type and
/// encoded payload.
struct PreparedRecord {
    name: String,
    subdomain: String,
    rrtype: u16,
    content: Vec<u8>,
}

pub struct SqliteRecordRepository {
    write_pool: SqlitePool,
    read_pool: SqlitePool,
    codec: Arc<RecordCodec>,
    serial: Arc<SqliteSerialCounter>,
    zone: Arc<Zone>,
}

impl SqliteRecordRepository {
    pub fn new(
        write_pool: SqlitePool,
        read_pool: SqlitePool,
        codec: Arc<RecordCodec>,
        serial: Arc<SqliteSerialCounter>,
        zone: Arc<Zone>,
    ) -> Self {
        Self {
            write_pool,
            read_pool,
            codec,
            serial,
            zone,
        }
    }

    fn prepare(&self, record: &Record) -> Result<PreparedRecord, DomainError> {
        let name = normalize_name(&record.name.to_ascii());
        if !self.zone.contains(&name) {
            return Err(DomainError::OutOfZone(name));
        }

        let content = self.codec.encode(record)?;
        // The payload must come back as a valid record before it is stored.
        self.codec.decode(&content)?;

        Ok(PreparedRecord {
            subdomain: self.zone.subdomain_of(&name).unwrap_or_default(),
            rrtype: u16::from(record.record_type()),
            name,
            content,
        })
    }

    fn decode_row(&self, id: i64, content: &[u8]) -> Result<Record, DomainError> {
        self.codec.decode(content).map_err(|e| {
            error!(id, error = %e, "Stored record failed to decode");
            DomainError::from(e)
        })
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        error!(error = %e, "{}", context);
        DomainError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl RecordRepository for SqliteRecordRepository {
    #[instrument(skip(self, record))]
    async fn insert(&self, record: &Record) -> Result<Mutation, DomainError> {
        let prepared = self.prepare(record)?;
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut tx = self
            .write_pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO dns_records (name, subdomain, rrtype, content, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&prepared.name)
        .bind(&prepared.subdomain)
        .bind(i64::from(prepared.rrtype))
        .bind(&prepared.content)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to insert record"))?;

        let serial = self.serial.increment(&mut tx).await?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit record insert"))?;
        self.serial.publish(serial);

        info!(id, name = %prepared.name, rrtype = prepared.rrtype, serial, "Record created");
        Ok(Mutation { id, serial })
    }

    #[instrument(skip(self, record))]
    async fn update(&self, id: i64, record: &Record) -> Result<Mutation, DomainError> {
        let prepared = self.prepare(record)?;

        let mut tx = self
            .write_pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let result = sqlx::query(
            "UPDATE dns_records SET name = ?, subdomain = ?, rrtype = ?, content = ?
             WHERE id = ?",
        )
        .bind(&prepared.name)
        .bind(&prepared.subdomain)
        .bind(i64::from(prepared.rrtype))
        .bind(&prepared.content)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update record"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RecordNotFound(id));
        }

        let serial = self.serial.increment(&mut tx).await?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit record update"))?;
        self.serial.publish(serial);

        info!(id, name = %prepared.name, rrtype = prepared.rrtype, serial, "Record updated");
        Ok(Mutation { id, serial })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<Mutation, DomainError> {
        let mut tx = self
            .write_pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let result = sqlx::query("DELETE FROM dns_records WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete record"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RecordNotFound(id));
        }

        let serial = self.serial.increment(&mut tx).await?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit record delete"))?;
        self.serial.publish(serial);

        info!(id, serial, "Record deleted");
        Ok(Mutation { id, serial })
    }

    #[instrument(skip(self))]
    async fn fetch_by_name(&self, name: &str) -> Result<Vec<Record>, DomainError> {
        let rows = sqlx::query_as::<_, (i64, Vec<u8>)>(
            "SELECT id, content FROM dns_records
             WHERE name = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(normalize_name(name))
        .fetch_all(&self.read_pool)
        .await
        .map_err(db_error("Failed to query records by name"))?;

        rows.iter()
            .map(|(id, content)| self.decode_row(*id, content))
            .collect()
    }

    #[instrument(skip(self))]
    async fn fetch_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<BTreeMap<i64, Record>, DomainError> {
        let rows = sqlx::query_as::<_, (i64, Vec<u8>)>(
            "SELECT id, content FROM dns_records WHERE subdomain = ?",
        )
        .bind(subdomain.to_ascii_lowercase())
        .fetch_all(&self.read_pool)
        .await
        .map_err(db_error("Failed to query records by subdomain"))?;

        rows.iter()
            .map(|(id, content)| Ok((*id, self.decode_row(*id, content)?)))
            .collect()
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>, DomainError> {
        let row = sqlx::query_as::<_, RecordRow>(
            "SELECT id, name, subdomain, content, created_at FROM dns_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.write_pool)
        .await
        .map_err(db_error("Failed to query record by id"))?;

        let Some((id, name, subdomain, content, created_at)) = row else {
            return Ok(None);
        };

        Ok(Some(StoredRecord {
            id,
            record: self.decode_row(id, &content)?,
            name,
            subdomain,
            created_at: Some(created_at),
        }))
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, retention_hours: u32) -> Result<u64, DomainError> {
        let cutoff = (chrono::Utc::now() - chrono::Duration::hours(i64::from(retention_hours)))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let mut tx = self
            .write_pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let deleted = sqlx::query("DELETE FROM dns_records WHERE created_at < ?")
            .bind(&cutoff)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to prune records"))?
            .rows_affected();

        if deleted == 0 {
            debug!(retention_hours, "No expired records");
            return Ok(0);
        }

        let serial = self.serial.increment(&mut tx).await?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit record pruning"))?;
        self.serial.publish(serial);

        info!(deleted, retention_hours, serial, "Expired records pruned");
        Ok(deleted)
    }
}
