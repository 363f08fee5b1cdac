use super::Repositories;
use flatboat_application::use_cases::{
    CleanupOldRequestLogsUseCase, CreateRecordUseCase, DeleteRecordUseCase, GetRecordsUseCase,
    PruneExpiredRecordsUseCase, ResolveQueryUseCase, UpdateRecordUseCase,
};
use flatboat_domain::{Config, DomainError, OverrideTable};
use std::sync::Arc;

pub struct UseCases {
    pub resolve: Arc<ResolveQueryUseCase>,
    pub create_record: Arc<CreateRecordUseCase>,
    pub update_record: Arc<UpdateRecordUseCase>,
    pub delete_record: Arc<DeleteRecordUseCase>,
    pub get_records: Arc<GetRecordsUseCase>,
    pub prune_records: Arc<PruneExpiredRecordsUseCase>,
    pub cleanup_requests: Arc<CleanupOldRequestLogsUseCase>,
    pub override_count: usize,
}

impl UseCases {
    pub fn new(repos: &Repositories, config: &Config) -> Result<Self, DomainError> {
        let overrides =
            OverrideTable::from_config(&config.zone.overrides, &repos.zone, &repos.codec)?;
        let override_count = overrides.len();

        Ok(Self {
            resolve: Arc::new(ResolveQueryUseCase::new(
                repos.records.clone(),
                repos.serial.clone(),
                repos.zone.clone(),
                Arc::new(overrides),
            )),
            create_record: Arc::new(CreateRecordUseCase::new(
                repos.records.clone(),
                repos.zone.clone(),
            )),
            update_record: Arc::new(UpdateRecordUseCase::new(
                repos.records.clone(),
                repos.zone.clone(),
            )),
            delete_record: Arc::new(DeleteRecordUseCase::new(repos.records.clone())),
            get_records: Arc::new(GetRecordsUseCase::new(repos.records.clone())),
            prune_records: Arc::new(PruneExpiredRecordsUseCase::new(repos.records.clone())),
            cleanup_requests: Arc::new(CleanupOldRequestLogsUseCase::new(
                repos.request_log.clone(),
            )),
            override_count,
        })
    }
}
