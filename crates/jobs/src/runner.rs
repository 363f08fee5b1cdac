use crate::{RecordRetentionJob, RequestLogRetentionJob, WalCheckpointJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(RecordRetentionJob);
impl_spawnable_job!(RequestLogRetentionJob);
impl_spawnable_job!(WalCheckpointJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

/// Owns the housekeeping jobs until `start` hands them to the runtime.
pub struct JobRunner {
    record_retention: Option<RecordRetentionJob>,
    request_log_retention: Option<RequestLogRetentionJob>,
    wal_checkpoint: Option<WalCheckpointJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            record_retention: None,
            request_log_retention: None,
            wal_checkpoint: None,
            shutdown: None,
        }
    }

    pub fn with_record_retention(mut self, job: RecordRetentionJob) -> Self {
        self.record_retention = Some(job);
        self
    }

    pub fn with_request_log_retention(mut self, job: RequestLogRetentionJob) -> Self {
        self.request_log_retention = Some(job);
        self
    }

    pub fn with_wal_checkpoint(mut self, job: WalCheckpointJob) -> Self {
        self.wal_checkpoint = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        spawn_job(self.record_retention, &self.shutdown);
        spawn_job(self.request_log_retention, &self.shutdown);
        spawn_job(self.wal_checkpoint, &self.shutdown);

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
