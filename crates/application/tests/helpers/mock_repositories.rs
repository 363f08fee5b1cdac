#![allow(dead_code)]

use async_trait::async_trait;
use flatboat_application::ports::{RecordRepository, ZoneSerial};
use flatboat_domain::config::ZoneConfig;
use flatboat_domain::{normalize_name, DomainError, Mutation, StoredRecord, Zone};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, TXT};
use hickory_proto::rr::{Name, RData, Record};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub fn test_zone() -> Arc<Zone> {
    Arc::new(Zone::from_config(&ZoneConfig::default()).unwrap())
}

pub fn a_record(name: &str, ip: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::A(A(ip.parse().unwrap())),
    )
}

pub fn aaaa_record(name: &str, ip: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::AAAA(AAAA(ip.parse().unwrap())),
    )
}

pub fn cname_record(name: &str, target: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::CNAME(CNAME(Name::from_str(target).unwrap())),
    )
}

pub fn txt_record(name: &str, text: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::TXT(TXT::new(vec![text.to_string()])),
    )
}

/// Cached serial plus the value "in storage", which another writer may move.
pub struct MockZoneSerial {
    value: AtomicU32,
    stored: AtomicU32,
}

impl MockZoneSerial {
    pub fn new(value: u32) -> Self {
        Self {
            value: AtomicU32::new(value),
            stored: AtomicU32::new(value),
        }
    }

    pub fn set(&self, value: u32) {
        self.value.store(value, Ordering::SeqCst);
        self.stored.store(value, Ordering::SeqCst);
    }

    /// Commit made by a different process; the cache does not see it.
    pub fn set_stored(&self, value: u32) {
        self.stored.store(value, Ordering::SeqCst);
    }
}

#[async_trait]
impl ZoneSerial for MockZoneSerial {
    fn current(&self) -> u32 {
        self.value.load(Ordering::SeqCst)
    }

    async fn latest(&self) -> u32 {
        self.value
            .fetch_max(self.stored.load(Ordering::SeqCst), Ordering::SeqCst);
        self.current()
    }
}

/// In-memory store keeping insertion order, newest last.
pub struct MockRecordRepository {
    rows: RwLock<Vec<StoredRecord>>,
    next_id: AtomicI64,
    serial: AtomicU32,
    fail: AtomicBool,
    zone: Arc<Zone>,
}

impl MockRecordRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            serial: AtomicU32::new(10),
            fail: AtomicBool::new(false),
            zone: test_zone(),
        }
    }

    pub async fn with_records(records: Vec<Record>) -> Self {
        let repo = Self::new();
        for record in records {
            repo.insert(&record).await.unwrap();
        }
        repo
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn serial(&self) -> u32 {
        self.serial.load(Ordering::SeqCst)
    }

    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock failure".to_string()));
        }
        Ok(())
    }

    fn bump(&self) -> u32 {
        self.serial.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl RecordRepository for MockRecordRepository {
    async fn insert(&self, record: &Record) -> Result<Mutation, DomainError> {
        self.check()?;
        let name = normalize_name(&record.name.to_ascii());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.push(StoredRecord {
            id,
            subdomain: self.zone.subdomain_of(&name).unwrap_or_default(),
            name,
            record: record.clone(),
            created_at: None,
        });
        Ok(Mutation {
            id,
            serial: self.bump(),
        })
    }

    async fn update(&self, id: i64, record: &Record) -> Result<Mutation, DomainError> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::RecordNotFound(id))?;
        row.record = record.clone();
        Ok(Mutation {
            id,
            serial: self.bump(),
        })
    }

    async fn delete(&self, id: i64) -> Result<Mutation, DomainError> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(DomainError::RecordNotFound(id));
        }
        Ok(Mutation {
            id,
            serial: self.bump(),
        })
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Vec<Record>, DomainError> {
        self.check()?;
        let name = normalize_name(name);
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.name == name)
            .map(|r| r.record.clone())
            .collect())
    }

    async fn fetch_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<BTreeMap<i64, Record>, DomainError> {
        self.check()?;
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.subdomain == subdomain)
            .map(|r| (r.id, r.record.clone()))
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>, DomainError> {
        self.check()?;
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_older_than(&self, _retention_hours: u32) -> Result<u64, DomainError> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let deleted = rows.len() as u64;
        rows.clear();
        if deleted > 0 {
            self.bump();
        }
        Ok(deleted)
    }
}
