use flatboat_domain::{validate_domain_name, DomainError, Mutation, Zone};
use hickory_proto::rr::Record;
use std::sync::Arc;
use tracing::{info, instrument};

use super::owned_record;
use crate::ports::RecordRepository;

pub struct UpdateRecordUseCase {
    repo: Arc<dyn RecordRepository>,
    zone: Arc<Zone>,
}

impl UpdateRecordUseCase {
    pub fn new(repo: Arc<dyn RecordRepository>, zone: Arc<Zone>) -> Self {
        Self { repo, zone }
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    pub async fn execute(
        &self,
        owner: &str,
        id: i64,
        record: Record,
    ) -> Result<Mutation, DomainError> {
        validate_domain_name(&record.name.to_ascii(), owner, &self.zone)?;
        owned_record(self.repo.as_ref(), owner, id).await?;

        let mutation = self.repo.update(id, &record).await?;

        info!(record_id = id, serial = mutation.serial, "Record updated");

        Ok(mutation)
    }
}
