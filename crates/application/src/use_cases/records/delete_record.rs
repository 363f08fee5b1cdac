use flatboat_domain::{DomainError, Mutation};
use std::sync::Arc;
use tracing::{info, instrument};

use super::owned_record;
use crate::ports::RecordRepository;

pub struct DeleteRecordUseCase {
    repo: Arc<dyn RecordRepository>,
}

impl DeleteRecordUseCase {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, owner: &str, id: i64) -> Result<Mutation, DomainError> {
        owned_record(self.repo.as_ref(), owner, id).await?;

        let mutation = self.repo.delete(id).await?;

        info!(record_id = id, serial = mutation.serial, "Record deleted");

        Ok(mutation)
    }
}
