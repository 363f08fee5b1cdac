//! flatboat domain layer
pub mod audit;
pub mod codec;
pub mod config;
pub mod dns_query;
pub mod errors;
pub mod overrides;
pub mod record;
pub mod resolution;
pub mod validation;
pub mod zone;

pub use audit::AuditEntry;
pub use codec::RecordCodec;
pub use config::Config;
pub use dns_query::DnsQuery;
pub use errors::{CodecError, DomainError};
pub use overrides::OverrideTable;
pub use record::{Mutation, StoredRecord};
pub use resolution::{accepts, Resolution, ResponseStatus};
pub use validation::validate_domain_name;
pub use zone::{normalize_name, Zone};
