pub mod dns;
pub mod records;
pub mod requests;

// Re-export use cases
pub use dns::ResolveQueryUseCase;
pub use records::{
    CreateRecordUseCase, DeleteRecordUseCase, GetRecordsUseCase, PruneExpiredRecordsUseCase,
    UpdateRecordUseCase,
};
pub use requests::CleanupOldRequestLogsUseCase;
