use flatboat_domain::{validate_domain_name, DomainError, Mutation, Zone};
use hickory_proto::rr::Record;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::RecordRepository;

pub struct CreateRecordUseCase {
    repo: Arc<dyn RecordRepository>,
    zone: Arc<Zone>,
}

impl CreateRecordUseCase {
    pub fn new(repo: Arc<dyn RecordRepository>, zone: Arc<Zone>) -> Self {
        Self { repo, zone }
    }

    #[instrument(skip(self, record), fields(name = %record.name, rrtype = %record.record_type()))]
    pub async fn execute(&self, owner: &str, record: Record) -> Result<Mutation, DomainError> {
        validate_domain_name(&record.name.to_ascii(), owner, &self.zone)?;

        let mutation = self.repo.insert(&record).await?;

        info!(
            record_id = mutation.id,
            serial = mutation.serial,
            owner = %owner,
            "Record created"
        );

        Ok(mutation)
    }
}
