mod helpers;

use flatboat_application::ports::{RecordRepository, ZoneSerial};
use flatboat_domain::config::DatabaseConfig;
use flatboat_domain::{CodecError, DomainError, RecordCodec};
use flatboat_infrastructure::database::{create_read_pool, create_write_pool};
use flatboat_infrastructure::repositories::{SqliteRecordRepository, SqliteSerialCounter};
use helpers::*;
use hickory_proto::rr::{RData, Record, RecordType};
use std::collections::HashSet;
use std::sync::Arc;

fn address(record: &Record) -> String {
    match &record.data {
        RData::A(a) => a.0.to_string(),
        other => format!("{other:?}"),
    }
}

// ============================================================================
// Serial bookkeeping
// ============================================================================

#[tokio::test]
async fn test_fresh_database_starts_at_serial_ten() {
    let s = store(create_test_db().await).await;

    assert_eq!(s.serial.current(), 10);
    assert_eq!(stored_serial(&s.pool).await, 10);
}

#[tokio::test]
async fn test_each_mutation_bumps_serial_once() {
    let s = store(create_test_db().await).await;

    let created = s.repo.insert(&a_record("abc.flatbo.at.", "1.2.3.4")).await.unwrap();
    assert_eq!(created.serial, 11);

    let updated = s
        .repo
        .update(created.id, &a_record("abc.flatbo.at.", "5.6.7.8"))
        .await
        .unwrap();
    assert_eq!(updated.serial, 12);

    let deleted = s.repo.delete(created.id).await.unwrap();
    assert_eq!(deleted.serial, 13);

    assert_eq!(s.serial.current(), 13);
    assert_eq!(stored_serial(&s.pool).await, 13);
}

#[tokio::test]
async fn test_update_of_missing_row_rolls_back() {
    let s = store(create_test_db().await).await;

    let err = s
        .repo
        .update(9999, &a_record("abc.flatbo.at.", "1.2.3.4"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::RecordNotFound(9999)));
    assert_eq!(s.serial.current(), 10);
    assert_eq!(stored_serial(&s.pool).await, 10);
}

#[tokio::test]
async fn test_delete_of_missing_row_rolls_back() {
    let s = store(create_test_db().await).await;

    let err = s.repo.delete(42).await.unwrap_err();

    assert!(matches!(err, DomainError::RecordNotFound(42)));
    assert_eq!(stored_serial(&s.pool).await, 10);
}

#[tokio::test]
async fn test_out_of_zone_insert_is_rejected() {
    let s = store(create_test_db().await).await;

    let err = s
        .repo
        .insert(&a_record("abc.example.com.", "1.2.3.4"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::OutOfZone(_)));
    assert_eq!(stored_serial(&s.pool).await, 10);
}

#[tokio::test]
async fn test_serial_reload_picks_up_external_writes() {
    let s = store(create_test_db().await).await;

    sqlx::query("UPDATE dns_serials SET serial = 500 WHERE id = 1")
        .execute(&s.pool)
        .await
        .unwrap();
    assert_eq!(s.serial.current(), 10);

    assert_eq!(s.serial.reload().await.unwrap(), 500);
    assert_eq!(s.serial.current(), 500);
}

#[tokio::test]
async fn test_latest_reads_stored_serial_and_never_goes_back() {
    let s = store(create_test_db().await).await;

    sqlx::query("UPDATE dns_serials SET serial = 77 WHERE id = 1")
        .execute(&s.pool)
        .await
        .unwrap();
    assert_eq!(s.serial.latest().await, 77);
    assert_eq!(s.serial.current(), 77);

    sqlx::query("UPDATE dns_serials SET serial = 12 WHERE id = 1")
        .execute(&s.pool)
        .await
        .unwrap();
    assert_eq!(s.serial.latest().await, 77);
}

#[tokio::test]
async fn test_concurrent_inserts_get_distinct_serials() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("records.db").display());
    let cfg = DatabaseConfig::default();

    let write_pool = create_write_pool(&url, &cfg).await.unwrap();
    let read_pool = create_read_pool(&url, &cfg).await.unwrap();
    let serial = Arc::new(SqliteSerialCounter::load(write_pool.clone()).await.unwrap());
    let repo = Arc::new(SqliteRecordRepository::new(
        write_pool.clone(),
        read_pool,
        Arc::new(RecordCodec::new()),
        serial.clone(),
        test_zone(),
    ));

    let mut handles = Vec::new();
    for i in 0..20 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.insert(&a_record("abc.flatbo.at.", &format!("10.0.0.{i}")))
                .await
                .unwrap()
                .serial
        }));
    }

    let mut serials = HashSet::new();
    for handle in handles {
        serials.insert(handle.await.unwrap());
    }

    assert_eq!(serials.len(), 20);
    assert_eq!(serials.iter().min(), Some(&11));
    assert_eq!(serials.iter().max(), Some(&30));
    assert_eq!(serial.current(), 30);
    assert_eq!(stored_serial(&write_pool).await, 30);
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_fetch_by_name_is_newest_first() {
    let s = store(create_test_db().await).await;
    for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        s.repo.insert(&a_record("abc.flatbo.at.", ip)).await.unwrap();
    }

    let records = s.repo.fetch_by_name("abc.flatbo.at.").await.unwrap();

    let addresses: Vec<String> = records.iter().map(address).collect();
    assert_eq!(addresses, vec!["10.0.0.3", "10.0.0.2", "10.0.0.1"]);
}

#[tokio::test]
async fn test_names_are_stored_lowercase() {
    let s = store(create_test_db().await).await;
    s.repo.insert(&a_record("ABC.Flatbo.AT.", "1.2.3.4")).await.unwrap();

    let records = s.repo.fetch_by_name("abc.flatbo.at.").await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type(), RecordType::A);
}

#[tokio::test]
async fn test_fetch_by_subdomain_collects_nested_names() {
    let s = store(create_test_db().await).await;
    let a = s.repo.insert(&a_record("abc.flatbo.at.", "1.2.3.4")).await.unwrap();
    let b = s.repo.insert(&txt_record("_acme.abc.flatbo.at.", "token")).await.unwrap();
    s.repo.insert(&a_record("xyz.flatbo.at.", "5.6.7.8")).await.unwrap();

    let records = s.repo.fetch_by_subdomain("ABC").await.unwrap();

    assert_eq!(records.keys().copied().collect::<Vec<_>>(), vec![a.id, b.id]);
    assert_eq!(records[&b.id].record_type(), RecordType::TXT);
}

#[tokio::test]
async fn test_get_by_id_returns_row_metadata() {
    let s = store(create_test_db().await).await;
    let created = s.repo.insert(&txt_record("_acme.abc.flatbo.at.", "token")).await.unwrap();

    let stored = s.repo.get_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(stored.name, "_acme.abc.flatbo.at.");
    assert_eq!(stored.subdomain, "abc");
    assert!(stored.created_at.is_some());
    assert!(s.repo.get_by_id(created.id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_row_fails_the_read() {
    let s = store(create_test_db().await).await;
    sqlx::query(
        "INSERT INTO dns_records (name, subdomain, rrtype, content, created_at)
         VALUES ('abc.flatbo.at.', 'abc', 1, X'00FF', '2024-01-01 00:00:00')",
    )
    .execute(&s.pool)
    .await
    .unwrap();

    let err = s.repo.fetch_by_name("abc.flatbo.at.").await.unwrap_err();

    assert!(matches!(err, DomainError::Codec(CodecError::Malformed(_))));
}

#[tokio::test]
async fn test_row_that_no_longer_packs_is_corrupt() {
    let s = store(create_test_db().await).await;
    sqlx::query(
        "INSERT INTO dns_records (name, subdomain, rrtype, content, created_at)
         VALUES ('abc.flatbo.at.', 'abc', 15, ?, '2024-01-01 00:00:00')",
    )
    .bind(
        r#"{"header":{"name":"abc.flatbo.at.","rrtype":15,"class":1,"ttl":300},"rdata":{"preference":70000,"exchange":"mail.example.com."}}"#
            .as_bytes(),
    )
    .execute(&s.pool)
    .await
    .unwrap();

    let err = s.repo.fetch_by_name("abc.flatbo.at.").await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::Codec(CodecError::Corrupt { rrtype: 15, .. })
    ));
}

// ============================================================================
// Retention
// ============================================================================

#[tokio::test]
async fn test_prune_removes_old_rows_and_bumps_serial_once() {
    let s = store(create_test_db().await).await;
    let old = s.repo.insert(&a_record("abc.flatbo.at.", "1.2.3.4")).await.unwrap();
    s.repo.insert(&a_record("abc.flatbo.at.", "1.2.3.5")).await.unwrap();
    s.repo.insert(&a_record("xyz.flatbo.at.", "1.2.3.6")).await.unwrap();
    sqlx::query("UPDATE dns_records SET created_at = '2000-01-01 00:00:00' WHERE id != ?")
        .bind(old.id + 1)
        .execute(&s.pool)
        .await
        .unwrap();

    let deleted = s.repo.delete_older_than(24).await.unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(s.serial.current(), 14);
    assert_eq!(s.repo.fetch_by_name("abc.flatbo.at.").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_prune_without_expired_rows_keeps_serial() {
    let s = store(create_test_db().await).await;
    s.repo.insert(&a_record("abc.flatbo.at.", "1.2.3.4")).await.unwrap();

    assert_eq!(s.repo.delete_older_than(24).await.unwrap(), 0);
    assert_eq!(s.serial.current(), 11);
    assert_eq!(stored_serial(&s.pool).await, 11);
}
