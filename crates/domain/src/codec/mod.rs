//! Conversion between resource records and their persisted payload.
//!
//! A payload is a JSON document with a `header` (owner name, numeric type,
//! class, TTL) and an `rdata` object whose keys follow the registered field
//! shape for that type:
//!
//! ```json
//! {"header":{"name":"abc.flatbo.at.","rrtype":1,"class":1,"ttl":300},
//!  "rdata":{"address":"1.2.3.4"}}
//! ```
//!
//! Decoding never trusts the payload: the record is rebuilt in wire format,
//! parsed, and packed again before it is handed out.

mod field;
mod registry;
pub mod validate;

pub use field::Field;
pub use registry::CodecEntry;

use hickory_proto::rr::Record;
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CodecError;
use field::FieldError;

const DEFAULT_CLASS: u64 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    header: PayloadHeader,
    rdata: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PayloadHeader {
    name: String,
    rrtype: u16,
    #[serde(default = "default_class")]
    class: u64,
    ttl: u64,
}

#[derive(Deserialize)]
struct TagProbe {
    header: TagProbeHeader,
}

#[derive(Deserialize)]
struct TagProbeHeader {
    rrtype: u16,
}

fn default_class() -> u64 {
    DEFAULT_CLASS
}

/// Registry of per-type codecs keyed by numeric type tag.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    entries: FxHashMap<u16, CodecEntry>,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCodec {
    /// Codec with every built-in record type registered.
    pub fn new() -> Self {
        Self::with_entries(registry::BUILTIN.iter().copied())
    }

    pub fn with_entries(entries: impl IntoIterator<Item = CodecEntry>) -> Self {
        let mut codec = Self {
            entries: FxHashMap::default(),
        };
        for entry in entries {
            codec.register(entry);
        }
        codec
    }

    /// Adds or replaces the codec for `entry.code`.
    pub fn register(&mut self, entry: CodecEntry) {
        self.entries.insert(entry.code, entry);
    }

    pub fn entry(&self, code: u16) -> Option<&CodecEntry> {
        self.entries.get(&code)
    }

    pub fn mnemonic(&self, code: u16) -> Option<&'static str> {
        self.entries.get(&code).map(|e| e.mnemonic)
    }

    /// Numeric codes of every registered type, ascending.
    pub fn supported_types(&self) -> Vec<u16> {
        let mut codes: Vec<u16> = self.entries.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    pub fn encode(&self, record: &Record) -> Result<Vec<u8>, CodecError> {
        let rrtype = u16::from(record.record_type());
        let entry = self
            .entries
            .get(&rrtype)
            .ok_or_else(|| CodecError::encoding(rrtype, "no codec registered"))?;

        let rdata = record
            .data
            .to_bytes()
            .map_err(|e| CodecError::encoding(rrtype, e.to_string()))?;
        let fields = field::read_fields(entry.shape, &rdata)
            .map_err(|reason| CodecError::encoding(rrtype, reason))?;

        let payload = Payload {
            header: PayloadHeader {
                name: record.name.to_ascii(),
                rrtype,
                class: u64::from(u16::from(record.dns_class)),
                ttl: u64::from(record.ttl),
            },
            rdata: fields,
        };

        serde_json::to_vec(&payload).map_err(|e| CodecError::encoding(rrtype, e.to_string()))
    }

    pub fn decode(&self, payload: &[u8]) -> Result<Record, CodecError> {
        let probe: TagProbe =
            serde_json::from_slice(payload).map_err(|e| CodecError::Malformed(e.to_string()))?;
        let rrtype = probe.header.rrtype;
        let entry = self
            .entries
            .get(&rrtype)
            .ok_or(CodecError::UnknownType(rrtype))?;

        let payload: Payload =
            serde_json::from_slice(payload).map_err(|e| CodecError::Malformed(e.to_string()))?;

        let name = field::fqdn("name", &payload.header.name).map_err(|e| classify(rrtype, e))?;
        let class = u16::try_from(payload.header.class)
            .map_err(|_| CodecError::corrupt(rrtype, "class is out of range"))?;
        let ttl = u32::try_from(payload.header.ttl)
            .map_err(|_| CodecError::corrupt(rrtype, "ttl is out of range"))?;

        let mut rdata = Vec::new();
        field::write_fields(entry.shape, &payload.rdata, &mut rdata)
            .map_err(|e| classify(rrtype, e))?;
        (entry.validate)(&payload.rdata).map_err(|reason| CodecError::corrupt(rrtype, reason))?;

        let rdlength = u16::try_from(rdata.len())
            .map_err(|_| CodecError::corrupt(rrtype, "rdata exceeds 65535 bytes"))?;

        let mut wire = name
            .to_bytes()
            .map_err(|e| CodecError::corrupt(rrtype, e.to_string()))?;
        wire.extend_from_slice(&rrtype.to_be_bytes());
        wire.extend_from_slice(&class.to_be_bytes());
        wire.extend_from_slice(&ttl.to_be_bytes());
        wire.extend_from_slice(&rdlength.to_be_bytes());
        wire.extend_from_slice(&rdata);

        let record = Record::from_bytes(&wire)
            .map_err(|e| CodecError::corrupt(rrtype, e.to_string()))?;
        record
            .to_bytes()
            .map_err(|e| CodecError::corrupt(rrtype, format!("record does not pack: {e}")))?;

        Ok(record)
    }
}

fn classify(rrtype: u16, error: FieldError) -> CodecError {
    match error {
        FieldError::Shape(reason) => CodecError::Malformed(reason),
        FieldError::Range(reason) => CodecError::corrupt(rrtype, reason),
    }
}
