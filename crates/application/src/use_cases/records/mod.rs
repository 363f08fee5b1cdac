mod create_record;
mod delete_record;
mod get_records;
mod prune_records;
mod update_record;

pub use create_record::CreateRecordUseCase;
pub use delete_record::DeleteRecordUseCase;
pub use get_records::GetRecordsUseCase;
pub use prune_records::PruneExpiredRecordsUseCase;
pub use update_record::UpdateRecordUseCase;

use crate::ports::RecordRepository;
use flatboat_domain::{DomainError, StoredRecord};

/// Loads `id` from committed state and checks it belongs to `owner`.
async fn owned_record(
    repo: &dyn RecordRepository,
    owner: &str,
    id: i64,
) -> Result<StoredRecord, DomainError> {
    let existing = repo
        .get_by_id(id)
        .await?
        .ok_or(DomainError::RecordNotFound(id))?;

    if !existing.subdomain.eq_ignore_ascii_case(owner) {
        return Err(DomainError::PermissionDenied {
            id,
            owner: owner.to_string(),
        });
    }

    Ok(existing)
}
