use async_trait::async_trait;
use flatboat_domain::{AuditEntry, DomainError};

/// Receives every answered query that names a subdomain.
pub trait AuditSink: Send + Sync {
    /// Queues `entry` for persistence without waiting on storage. Entries may
    /// be dropped under load; errors never change the answer.
    fn record(&self, entry: AuditEntry) -> Result<(), DomainError>;
}

#[async_trait]
pub trait RequestLogRepository: Send + Sync {
    async fn delete_older_than(&self, retention_hours: u32) -> Result<u64, DomainError>;
}
