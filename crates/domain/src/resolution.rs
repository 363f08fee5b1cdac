use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{Record, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    NoError,
    NxDomain,
    ServFail,
    Refused,
}

impl From<ResponseStatus> for ResponseCode {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::NoError => ResponseCode::NoError,
            ResponseStatus::NxDomain => ResponseCode::NXDomain,
            ResponseStatus::ServFail => ResponseCode::ServFail,
            ResponseStatus::Refused => ResponseCode::Refused,
        }
    }
}

/// Result of answering one query. Always authoritative.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub status: ResponseStatus,
    pub answers: Vec<Record>,
    /// Exactly one SOA when `answers` is empty, otherwise empty.
    pub authority: Vec<Record>,
}

impl Resolution {
    pub fn answered(answers: Vec<Record>) -> Self {
        Self {
            status: ResponseStatus::NoError,
            answers,
            authority: Vec::new(),
        }
    }

    pub fn empty(status: ResponseStatus, soa: Record) -> Self {
        Self {
            status,
            answers: Vec::new(),
            authority: vec![soa],
        }
    }

    pub fn is_nodata(&self) -> bool {
        self.status == ResponseStatus::NoError && self.answers.is_empty()
    }
}

/// Whether a stored record of type `candidate` answers a query for `query`.
///
/// CNAMEs answer every type, and HTTPS queries fall back to address records.
pub fn accepts(query: RecordType, candidate: RecordType) -> bool {
    candidate == query
        || candidate == RecordType::CNAME
        || (query == RecordType::HTTPS && matches!(candidate, RecordType::A | RecordType::AAAA))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_type_is_accepted() {
        assert!(accepts(RecordType::A, RecordType::A));
        assert!(accepts(RecordType::TXT, RecordType::TXT));
        assert!(!accepts(RecordType::AAAA, RecordType::A));
    }

    #[test]
    fn test_cname_answers_any_type() {
        assert!(accepts(RecordType::A, RecordType::CNAME));
        assert!(accepts(RecordType::MX, RecordType::CNAME));
        assert!(accepts(RecordType::HTTPS, RecordType::CNAME));
    }

    #[test]
    fn test_https_falls_back_to_addresses() {
        assert!(accepts(RecordType::HTTPS, RecordType::A));
        assert!(accepts(RecordType::HTTPS, RecordType::AAAA));
        assert!(!accepts(RecordType::HTTPS, RecordType::TXT));
        assert!(!accepts(RecordType::SVCB, RecordType::A));
    }
}
