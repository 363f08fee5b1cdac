mod helpers;

use flatboat_application::ports::RecordRepository;
use flatboat_application::use_cases::{
    CreateRecordUseCase, DeleteRecordUseCase, GetRecordsUseCase, PruneExpiredRecordsUseCase,
    UpdateRecordUseCase,
};
use flatboat_domain::DomainError;
use helpers::mock_repositories::*;
use std::sync::Arc;

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_record_bumps_serial() {
    let repo = Arc::new(MockRecordRepository::new());
    let use_case = CreateRecordUseCase::new(repo.clone(), test_zone());

    let mutation = use_case
        .execute("abc", a_record("www.abc.flatbo.at.", "1.2.3.4"))
        .await
        .unwrap();

    assert_eq!(mutation.serial, 11);
    assert_eq!(repo.count().await, 1);
}

#[tokio::test]
async fn test_create_rejects_foreign_owner() {
    let repo = Arc::new(MockRecordRepository::new());
    let use_case = CreateRecordUseCase::new(repo.clone(), test_zone());

    let result = use_case
        .execute("other", a_record("www.abc.flatbo.at.", "1.2.3.4"))
        .await;

    assert!(matches!(result, Err(DomainError::InvalidDomainName(_))));
    assert_eq!(repo.count().await, 0);
    assert_eq!(repo.serial(), 10);
}

#[tokio::test]
async fn test_create_rejects_reserved_subdomain() {
    let repo = Arc::new(MockRecordRepository::new());
    let use_case = CreateRecordUseCase::new(repo.clone(), test_zone());

    let result = use_case
        .execute("www", a_record("www.flatbo.at.", "1.2.3.4"))
        .await;

    assert!(matches!(result, Err(DomainError::InvalidDomainName(_))));
}

#[tokio::test]
async fn test_create_propagates_storage_error() {
    let repo = Arc::new(MockRecordRepository::new());
    repo.set_should_fail(true);
    let use_case = CreateRecordUseCase::new(repo.clone(), test_zone());

    let result = use_case
        .execute("abc", a_record("abc.flatbo.at.", "1.2.3.4"))
        .await;

    assert!(matches!(result, Err(DomainError::DatabaseError(_))));
}

// ============================================================================
// Update / delete
// ============================================================================

#[tokio::test]
async fn test_update_own_record() {
    let repo = Arc::new(
        MockRecordRepository::with_records(vec![a_record("abc.flatbo.at.", "1.2.3.4")]).await,
    );
    let use_case = UpdateRecordUseCase::new(repo.clone(), test_zone());

    let mutation = use_case
        .execute("abc", 1, a_record("abc.flatbo.at.", "5.6.7.8"))
        .await
        .unwrap();

    assert_eq!(mutation.id, 1);
    assert_eq!(mutation.serial, 12);
    let stored = repo.fetch_by_name("abc.flatbo.at.").await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_update_other_owners_record_is_denied() {
    let repo = Arc::new(
        MockRecordRepository::with_records(vec![a_record("abc.flatbo.at.", "1.2.3.4")]).await,
    );
    let use_case = UpdateRecordUseCase::new(repo.clone(), test_zone());

    let result = use_case
        .execute("xyz", 1, a_record("xyz.flatbo.at.", "5.6.7.8"))
        .await;

    assert!(matches!(result, Err(DomainError::PermissionDenied { id: 1, .. })));
    assert_eq!(repo.serial(), 11);
}

#[tokio::test]
async fn test_delete_missing_record() {
    let repo = Arc::new(MockRecordRepository::new());
    let use_case = DeleteRecordUseCase::new(repo.clone());

    let result = use_case.execute("abc", 42).await;

    assert!(matches!(result, Err(DomainError::RecordNotFound(42))));
    assert_eq!(repo.serial(), 10);
}

#[tokio::test]
async fn test_delete_own_record() {
    let repo = Arc::new(
        MockRecordRepository::with_records(vec![a_record("abc.flatbo.at.", "1.2.3.4")]).await,
    );
    let use_case = DeleteRecordUseCase::new(repo.clone());

    let mutation = use_case.execute("ABC", 1).await.unwrap();

    assert_eq!(mutation.serial, 12);
    assert_eq!(repo.count().await, 0);
}

// ============================================================================
// Listing and pruning
// ============================================================================

#[tokio::test]
async fn test_get_records_for_owner() {
    let repo = Arc::new(
        MockRecordRepository::with_records(vec![
            a_record("abc.flatbo.at.", "1.2.3.4"),
            txt_record("x.abc.flatbo.at.", "hello"),
            a_record("xyz.flatbo.at.", "5.6.7.8"),
        ])
        .await,
    );
    let use_case = GetRecordsUseCase::new(repo);

    let records = use_case.execute("abc").await.unwrap();

    assert_eq!(records.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_prune_reports_deleted_rows() {
    let repo = Arc::new(
        MockRecordRepository::with_records(vec![
            a_record("abc.flatbo.at.", "1.2.3.4"),
            a_record("xyz.flatbo.at.", "5.6.7.8"),
        ])
        .await,
    );
    let use_case = PruneExpiredRecordsUseCase::new(repo.clone());

    assert_eq!(use_case.execute(24).await.unwrap(), 2);
    assert_eq!(repo.serial(), 13);
}
