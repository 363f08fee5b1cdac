#![allow(dead_code)]

use async_trait::async_trait;
use flatboat_application::ports::{RecordRepository, RequestLogRepository};
use flatboat_domain::{DomainError, Mutation, StoredRecord};
use hickory_proto::rr::Record;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Counts prune calls and fails the first `failures` of them.
pub struct FlakyPruner {
    calls: AtomicU32,
    failures: u32,
    deleted_per_call: u64,
    last_retention: AtomicU64,
}

impl FlakyPruner {
    pub fn new(failures: u32, deleted_per_call: u64) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures,
            deleted_per_call,
            last_retention: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_retention(&self) -> u64 {
        self.last_retention.load(Ordering::SeqCst)
    }

    fn prune(&self, retention_hours: u32) -> Result<u64, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_retention
            .store(u64::from(retention_hours), Ordering::SeqCst);
        if call < self.failures {
            return Err(DomainError::DatabaseError("database is locked".into()));
        }
        Ok(self.deleted_per_call)
    }
}

#[async_trait]
impl RecordRepository for FlakyPruner {
    async fn insert(&self, _record: &Record) -> Result<Mutation, DomainError> {
        unimplemented!()
    }

    async fn update(&self, _id: i64, _record: &Record) -> Result<Mutation, DomainError> {
        unimplemented!()
    }

    async fn delete(&self, _id: i64) -> Result<Mutation, DomainError> {
        unimplemented!()
    }

    async fn fetch_by_name(&self, _name: &str) -> Result<Vec<Record>, DomainError> {
        Ok(Vec::new())
    }

    async fn fetch_by_subdomain(
        &self,
        _subdomain: &str,
    ) -> Result<BTreeMap<i64, Record>, DomainError> {
        Ok(BTreeMap::new())
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<StoredRecord>, DomainError> {
        Ok(None)
    }

    async fn delete_older_than(&self, retention_hours: u32) -> Result<u64, DomainError> {
        self.prune(retention_hours)
    }
}

#[async_trait]
impl RequestLogRepository for FlakyPruner {
    async fn delete_older_than(&self, retention_hours: u32) -> Result<u64, DomainError> {
        self.prune(retention_hours)
    }
}
