use flatboat_domain::DomainError;
use hickory_proto::rr::Record;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::RecordRepository;

pub struct GetRecordsUseCase {
    repo: Arc<dyn RecordRepository>,
}

impl GetRecordsUseCase {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, owner: &str) -> Result<BTreeMap<i64, Record>, DomainError> {
        let records = self
            .repo
            .fetch_by_subdomain(&owner.to_ascii_lowercase())
            .await?;

        debug!(count = records.len(), "Records retrieved");

        Ok(records)
    }
}
