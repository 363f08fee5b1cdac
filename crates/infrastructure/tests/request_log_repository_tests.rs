mod helpers;

use flatboat_application::ports::{AuditSink, RequestLogRepository};
use flatboat_domain::AuditEntry;
use flatboat_infrastructure::repositories::SqliteRequestLogRepository;
use helpers::*;
use std::net::{IpAddr, Ipv4Addr};

fn entry(name: &str, subdomain: &str) -> AuditEntry {
    AuditEntry {
        name: name.to_string(),
        subdomain: subdomain.to_string(),
        request: vec![1, 2, 3],
        response: vec![4, 5, 6],
        src_ip: IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)),
        src_host: "edge-1".to_string(),
    }
}

#[tokio::test]
async fn test_record_persists_entry() {
    let pool = create_test_db().await;
    let repo = SqliteRequestLogRepository::new(pool.clone(), &request_log_config(100, 10));

    repo.record(entry("abc.flatbo.at.", "abc")).unwrap();

    assert_eq!(wait_for_requests(&pool, 1).await, 1);
    let (name, subdomain, request, src_ip, src_host): (String, String, Vec<u8>, String, String) =
        sqlx::query_as("SELECT name, subdomain, request, src_ip, src_host FROM dns_requests")
            .fetch_one(&pool)
            .await
            .unwrap();

    assert_eq!(name, "abc.flatbo.at.");
    assert_eq!(subdomain, "abc");
    assert_eq!(request, vec![1, 2, 3]);
    assert_eq!(src_ip, "192.0.2.7");
    assert_eq!(src_host, "edge-1");
}

#[tokio::test]
async fn test_entries_are_written_in_batches() {
    let pool = create_test_db().await;
    let repo = SqliteRequestLogRepository::new(pool.clone(), &request_log_config(1000, 4));

    for i in 0..10 {
        repo.record(entry(&format!("host{i}.abc.flatbo.at."), "abc")).unwrap();
    }

    assert_eq!(wait_for_requests(&pool, 10).await, 10);
}

#[tokio::test]
async fn test_full_channel_drops_entries_without_waiting() {
    let pool = create_test_db().await;
    let repo = SqliteRequestLogRepository::new(pool.clone(), &request_log_config(4, 2));

    // Hold the only connection, as a long mutation would.
    let tx = pool.begin().await.unwrap();
    for i in 0..100 {
        repo.record(entry(&format!("host{i}.abc.flatbo.at."), "abc")).unwrap();
    }
    tx.rollback().await.unwrap();

    assert_eq!(wait_for_requests(&pool, 4).await, 4);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(count_requests(&pool).await, 4);
}

#[tokio::test]
async fn test_delete_older_than_keeps_recent_entries() {
    let pool = create_test_db().await;
    let repo = SqliteRequestLogRepository::new(pool.clone(), &request_log_config(100, 10));
    repo.record(entry("abc.flatbo.at.", "abc")).unwrap();
    repo.record(entry("xyz.flatbo.at.", "xyz")).unwrap();
    assert_eq!(wait_for_requests(&pool, 2).await, 2);
    sqlx::query("UPDATE dns_requests SET created_at = '2000-01-01 00:00:00' WHERE subdomain = 'abc'")
        .execute(&pool)
        .await
        .unwrap();

    let deleted = repo.delete_older_than(24).await.unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(count_requests(&pool).await, 1);
}
