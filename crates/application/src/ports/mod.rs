mod audit_sink;
mod record_repository;
mod zone_serial;

pub use audit_sink::{AuditSink, RequestLogRepository};
pub use record_repository::RecordRepository;
pub use zone_serial::ZoneSerial;

// Re-export for convenience
pub use flatboat_domain::DnsQuery;
