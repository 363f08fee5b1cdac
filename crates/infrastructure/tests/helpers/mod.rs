#![allow(dead_code)]

use flatboat_domain::config::DatabaseConfig;
use flatboat_domain::{RecordCodec, Zone};
use flatboat_infrastructure::database::MIGRATOR;
use flatboat_infrastructure::repositories::{SqliteRecordRepository, SqliteSerialCounter};
use hickory_proto::rr::rdata::{A, TXT};
use hickory_proto::rr::{Name, RData, Record};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;

pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    MIGRATOR.run(&pool).await.unwrap();
    pool
}

/// Request log settings that flush quickly enough for tests to poll.
pub fn request_log_config(channel_capacity: usize, max_batch_size: usize) -> DatabaseConfig {
    DatabaseConfig {
        request_log_channel_capacity: channel_capacity,
        request_log_max_batch_size: max_batch_size,
        request_log_flush_interval_ms: 10,
        ..DatabaseConfig::default()
    }
}

pub async fn count_requests(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dns_requests")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

/// Polls until at least `expected` request log rows exist, or gives up.
pub async fn wait_for_requests(pool: &SqlitePool, expected: i64) -> i64 {
    for _ in 0..100 {
        let count = count_requests(pool).await;
        if count >= expected {
            return count;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    count_requests(pool).await
}

pub fn test_zone() -> Arc<Zone> {
    Arc::new(
        Zone::new(
            "flatbo.at.",
            "ns1.flatbo.at.",
            "hostmaster.flatbo.at.",
            ["ns1", "ns2", "orange", "purple", "www"],
        )
        .unwrap(),
    )
}

pub struct Store {
    pub pool: SqlitePool,
    pub repo: Arc<SqliteRecordRepository>,
    pub serial: Arc<SqliteSerialCounter>,
}

/// Repository over `pool`, used for both reads and writes.
pub async fn store(pool: SqlitePool) -> Store {
    let serial = Arc::new(SqliteSerialCounter::load(pool.clone()).await.unwrap());
    let repo = Arc::new(SqliteRecordRepository::new(
        pool.clone(),
        pool.clone(),
        Arc::new(RecordCodec::new()),
        serial.clone(),
        test_zone(),
    ));
    Store { pool, repo, serial }
}

pub fn a_record(name: &str, ip: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::A(A(Ipv4Addr::from_str(ip).unwrap())),
    )
}

pub fn txt_record(name: &str, text: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::TXT(TXT::new(vec![text.to_string()])),
    )
}

pub async fn stored_serial(pool: &SqlitePool) -> i64 {
    let (serial,): (i64,) = sqlx::query_as("SELECT serial FROM dns_serials WHERE id = 1")
        .fetch_one(pool)
        .await
        .unwrap();
    serial
}
