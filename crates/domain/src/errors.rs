use thiserror::Error;

/// Failures raised while converting between a resource record and its
/// persisted payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Cannot encode record type {rrtype}: {reason}")]
    Encoding { rrtype: u16, reason: String },

    #[error("No codec registered for record type {0}")]
    UnknownType(u16),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Corrupt record of type {rrtype}: {reason}")]
    Corrupt { rrtype: u16, reason: String },
}

impl CodecError {
    pub fn corrupt(rrtype: u16, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            rrtype,
            reason: reason.into(),
        }
    }

    pub fn encoding(rrtype: u16, reason: impl Into<String>) -> Self {
        Self::Encoding {
            rrtype,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Name is outside the served zone: {0}")]
    OutOfZone(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    #[error("Record {id} is not owned by {owner}")]
    PermissionDenied { id: i64, owner: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
