use crate::ports::RequestLogRepository;
use flatboat_domain::DomainError;
use std::sync::Arc;
use tracing::info;

pub struct CleanupOldRequestLogsUseCase {
    request_log_repo: Arc<dyn RequestLogRepository>,
}

impl CleanupOldRequestLogsUseCase {
    pub fn new(request_log_repo: Arc<dyn RequestLogRepository>) -> Self {
        Self { request_log_repo }
    }

    pub async fn execute(&self, retention_hours: u32) -> Result<u64, DomainError> {
        let deleted = self
            .request_log_repo
            .delete_older_than(retention_hours)
            .await?;
        info!(deleted, retention_hours, "Old request logs cleaned up");
        Ok(deleted)
    }
}
