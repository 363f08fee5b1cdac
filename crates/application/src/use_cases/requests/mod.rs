mod cleanup_old_requests;

pub use cleanup_old_requests::CleanupOldRequestLogsUseCase;
