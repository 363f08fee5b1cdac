use hickory_proto::rr::{Record, RecordType};
use serde_json::json;

use crate::codec::RecordCodec;
use crate::config::OverrideRecord;
use crate::errors::DomainError;
use crate::zone::{normalize_name, Zone};

struct OverrideEntry {
    name: String,
    record_type: RecordType,
    record: Record,
}

/// Fixed answers that take precedence over stored records.
///
/// Built once at startup and never mutated afterwards.
#[derive(Default)]
pub struct OverrideTable {
    entries: Vec<OverrideEntry>,
}

impl OverrideTable {
    pub fn from_config(
        overrides: &[OverrideRecord],
        zone: &Zone,
        codec: &RecordCodec,
    ) -> Result<Self, DomainError> {
        let mut entries = Vec::with_capacity(overrides.len());

        for o in overrides {
            let name = normalize_name(&o.name);
            if !zone.contains(&name) {
                return Err(DomainError::OutOfZone(name));
            }

            let payload = json!({
                "header": {"name": name, "rrtype": o.rrtype, "class": 1, "ttl": o.ttl},
                "rdata": o.rdata,
            });
            let bytes = serde_json::to_vec(&payload)
                .map_err(|e| DomainError::ConfigError(format!("override {name}: {e}")))?;
            let record = codec.decode(&bytes)?;

            entries.push(OverrideEntry {
                name,
                record_type: record.record_type(),
                record,
            });
        }

        Ok(Self { entries })
    }

    /// First override for exactly this name and type. `name` must already be
    /// normalized.
    pub fn lookup(&self, name: &str, record_type: RecordType) -> Option<&Record> {
        self.entries
            .iter()
            .find(|e| e.record_type == record_type && e.name == name)
            .map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
