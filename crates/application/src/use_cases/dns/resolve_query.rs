use flatboat_domain::{accepts, DnsQuery, OverrideTable, Resolution, ResponseStatus, Zone};
use hickory_proto::rr::RecordType;
use std::sync::Arc;
use tracing::{debug, error};

use crate::ports::{RecordRepository, ZoneSerial};

/// Answers one query against stored records and built-in overrides.
///
/// Rules apply in order: out-of-zone names are refused, overrides win, the
/// apex SOA is synthesized, then stored records are filtered. Storage or
/// decode failures become SERVFAIL.
pub struct ResolveQueryUseCase {
    records: Arc<dyn RecordRepository>,
    serial: Arc<dyn ZoneSerial>,
    zone: Arc<Zone>,
    overrides: Arc<OverrideTable>,
}

impl ResolveQueryUseCase {
    pub fn new(
        records: Arc<dyn RecordRepository>,
        serial: Arc<dyn ZoneSerial>,
        zone: Arc<Zone>,
        overrides: Arc<OverrideTable>,
    ) -> Self {
        Self {
            records,
            serial,
            zone,
            overrides,
        }
    }

    pub async fn execute(&self, query: &DnsQuery) -> Resolution {
        let name = query.domain.as_ref();
        let qtype = query.record_type;

        if !self.zone.contains(name) {
            debug!(domain = %name, "Query outside served zone");
            // Refusals stay off storage.
            let soa = self.zone.soa_record(self.serial.current());
            return Resolution::empty(ResponseStatus::Refused, soa);
        }

        if let Some(record) = self.overrides.lookup(name, qtype) {
            debug!(domain = %name, record_type = %qtype, "Answered from override");
            return Resolution::answered(vec![record.clone()]);
        }

        if qtype == RecordType::SOA && self.zone.is_apex(name) {
            return Resolution::answered(vec![self.zone.soa_record(self.serial.latest().await)]);
        }

        let stored = match self.records.fetch_by_name(name).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(domain = %name, record_type = %qtype, error = %e, "Record lookup failed");
                return self.empty(ResponseStatus::ServFail).await;
            }
        };

        if stored.is_empty() {
            return self.empty(ResponseStatus::NxDomain).await;
        }

        let answers: Vec<_> = stored
            .into_iter()
            .filter(|r| accepts(qtype, r.record_type()))
            .collect();

        if answers.is_empty() {
            return self.empty(ResponseStatus::NoError).await;
        }

        debug!(domain = %name, record_type = %qtype, answers = answers.len(), "Answered from store");
        Resolution::answered(answers)
    }

    /// Zero-answer response. The serial is read after any record lookup, so
    /// the SOA is never older than the data the answer was built from.
    async fn empty(&self, status: ResponseStatus) -> Resolution {
        Resolution::empty(status, self.zone.soa_record(self.serial.latest().await))
    }
}
