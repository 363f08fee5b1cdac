use std::str::FromStr;
use std::sync::Arc;

use hickory_proto::rr::rdata::SOA;
use hickory_proto::rr::{Name, RData, Record};

use crate::config::ZoneConfig;
use crate::errors::DomainError;

pub const SOA_TTL: u32 = 300;
pub const SOA_REFRESH: i32 = 3600;
pub const SOA_RETRY: i32 = 3600;
pub const SOA_EXPIRE: i32 = 7300;
pub const SOA_MINIMUM: u32 = 3600;

/// Lowercases `name` and makes it fully qualified.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.trim().to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}

/// The single zone this server is authoritative for.
#[derive(Debug, Clone)]
pub struct Zone {
    apex: Arc<str>,
    apex_name: Name,
    nameserver: Name,
    mailbox: Name,
    reserved: Vec<String>,
}

impl Zone {
    pub fn new<I, S>(apex: &str, nameserver: &str, mailbox: &str, reserved: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let apex = normalize_name(apex);
        Ok(Self {
            apex_name: parse_name(&apex)?,
            nameserver: parse_name(&normalize_name(nameserver))?,
            mailbox: parse_name(&normalize_name(mailbox))?,
            apex: apex.into(),
            reserved: reserved
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        })
    }

    pub fn from_config(config: &ZoneConfig) -> Result<Self, DomainError> {
        Self::new(
            &config.apex,
            &config.nameserver,
            &config.mailbox,
            &config.reserved_subdomains,
        )
    }

    pub fn apex(&self) -> &str {
        &self.apex
    }

    pub fn is_apex(&self, name: &str) -> bool {
        normalize_name(name) == *self.apex
    }

    /// True for the apex and every name below it. Matching is per label, so
    /// `evilflatbo.at.` is not inside `flatbo.at.`.
    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_name(name);
        name == *self.apex || self.relative_part(&name).is_some()
    }

    /// The label directly under the apex that owns `name`.
    ///
    /// `a.b.flatbo.at.` belongs to `b`; the apex itself and names outside the
    /// zone have no owner.
    pub fn subdomain_of(&self, name: &str) -> Option<String> {
        let name = normalize_name(name);
        let relative = self.relative_part(&name)?;
        relative.rsplit('.').next().map(str::to_string)
    }

    pub fn is_reserved(&self, subdomain: &str) -> bool {
        let subdomain = subdomain.to_ascii_lowercase();
        self.reserved.iter().any(|r| *r == subdomain)
    }

    /// The zone's SOA as of `serial`.
    pub fn soa_record(&self, serial: u32) -> Record {
        let soa = SOA::new(
            self.nameserver.clone(),
            self.mailbox.clone(),
            serial,
            SOA_REFRESH as _,
            SOA_RETRY as _,
            SOA_EXPIRE as _,
            SOA_MINIMUM as _,
        );
        Record::from_rdata(self.apex_name.clone(), SOA_TTL, RData::SOA(soa))
    }

    /// Everything left of `.<apex>`, for names strictly below the apex.
    pub(crate) fn relative_part<'a>(&self, normalized: &'a str) -> Option<&'a str> {
        let prefix = normalized.strip_suffix(&*self.apex)?;
        prefix.strip_suffix('.').filter(|p| !p.is_empty())
    }
}

fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_str(name).map_err(|e| DomainError::InvalidDomainName(format!("{name}: {e}")))
}
