pub mod record_repository;
pub mod request_log_repository;
pub mod serial_counter;

pub use record_repository::SqliteRecordRepository;
pub use request_log_repository::SqliteRequestLogRepository;
pub use serial_counter::SqliteSerialCounter;
