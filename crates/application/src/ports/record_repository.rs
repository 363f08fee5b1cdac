use async_trait::async_trait;
use flatboat_domain::{DomainError, Mutation, StoredRecord};
use hickory_proto::rr::Record;
use std::collections::BTreeMap;

/// Durable record storage. Every mutation commits together with a zone serial
/// increment, or not at all.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn insert(&self, record: &Record) -> Result<Mutation, DomainError>;

    async fn update(&self, id: i64, record: &Record) -> Result<Mutation, DomainError>;

    async fn delete(&self, id: i64) -> Result<Mutation, DomainError>;

    /// Records stored under exactly `name`, newest first. May observe writes
    /// that are not yet committed.
    async fn fetch_by_name(&self, name: &str) -> Result<Vec<Record>, DomainError>;

    /// All records owned by `subdomain`, keyed by id. Same isolation as
    /// `fetch_by_name`.
    async fn fetch_by_subdomain(&self, subdomain: &str)
        -> Result<BTreeMap<i64, Record>, DomainError>;

    /// Committed state only.
    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>, DomainError>;

    async fn delete_older_than(&self, retention_hours: u32) -> Result<u64, DomainError>;
}
