pub mod record_retention;
pub mod request_log_retention;
pub mod runner;
pub mod wal_checkpoint;

pub use record_retention::RecordRetentionJob;
pub use request_log_retention::RequestLogRetentionJob;
pub use runner::JobRunner;
pub use wal_checkpoint::WalCheckpointJob;
