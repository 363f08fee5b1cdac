use hickory_proto::rr::RecordType;
use std::sync::Arc;

use crate::zone::normalize_name;

/// A single question: lowercase, fully-qualified name plus type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl AsRef<str>, record_type: RecordType) -> Self {
        Self {
            domain: normalize_name(domain.as_ref()).into(),
            record_type,
        }
    }
}
