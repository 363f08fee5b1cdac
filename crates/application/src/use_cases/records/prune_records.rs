use crate::ports::RecordRepository;
use flatboat_domain::DomainError;
use std::sync::Arc;
use tracing::info;

pub struct PruneExpiredRecordsUseCase {
    repo: Arc<dyn RecordRepository>,
}

impl PruneExpiredRecordsUseCase {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, retention_hours: u32) -> Result<u64, DomainError> {
        let deleted = self.repo.delete_older_than(retention_hours).await?;
        info!(deleted, retention_hours, "Expired records pruned");
        Ok(deleted)
    }
}
