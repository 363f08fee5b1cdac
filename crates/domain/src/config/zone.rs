use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    #[serde(default = "default_apex")]
    pub apex: String,

    /// MNAME of the synthesized SOA.
    #[serde(default = "default_nameserver")]
    pub nameserver: String,

    /// RNAME of the synthesized SOA.
    #[serde(default = "default_mailbox")]
    pub mailbox: String,

    /// Subdomains that can never own user records.
    #[serde(default = "default_reserved_subdomains")]
    pub reserved_subdomains: Vec<String>,

    /// Answers served before stored records, matched on exact name and type.
    #[serde(default = "default_overrides")]
    pub overrides: Vec<OverrideRecord>,
}

/// One fixed answer. `rdata` uses the same field layout as stored payloads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverrideRecord {
    pub name: String,
    pub rrtype: u16,
    #[serde(default = "default_override_ttl")]
    pub ttl: u32,
    pub rdata: Map<String, Value>,
}

impl OverrideRecord {
    pub fn a(name: &str, address: &str, ttl: u32) -> Self {
        let rdata = match json!({ "address": address }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.to_string(),
            rrtype: 1,
            ttl,
            rdata,
        }
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            apex: default_apex(),
            nameserver: default_nameserver(),
            mailbox: default_mailbox(),
            reserved_subdomains: default_reserved_subdomains(),
            overrides: default_overrides(),
        }
    }
}

fn default_apex() -> String {
    "flatbo.at.".to_string()
}

fn default_nameserver() -> String {
    "ns1.flatbo.at.".to_string()
}

fn default_mailbox() -> String {
    "hostmaster.flatbo.at.".to_string()
}

fn default_reserved_subdomains() -> Vec<String> {
    ["ns1", "ns2", "orange", "purple", "www"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_override_ttl() -> u32 {
    300
}

fn default_overrides() -> Vec<OverrideRecord> {
    vec![
        OverrideRecord::a("flatbo.at.", "213.188.214.254", 60),
        OverrideRecord::a("orange.flatbo.at.", "213.188.218.160", 3600),
        OverrideRecord::a("purple.flatbo.at.", "213.188.209.192", 3600),
    ]
}
