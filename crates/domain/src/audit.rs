use std::net::IpAddr;

/// One served query, as handed to the audit sink.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub name: String,
    pub subdomain: String,
    pub request: Vec<u8>,
    pub response: Vec<u8>,
    pub src_ip: IpAddr,
    pub src_host: String,
}
