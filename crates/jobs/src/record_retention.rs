use flatboat_application::use_cases::PruneExpiredRecordsUseCase;
use flatboat_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periodically deletes records older than the retention window.
pub struct RecordRetentionJob {
    prune: Arc<PruneExpiredRecordsUseCase>,
    retention_hours: u32,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl RecordRetentionJob {
    pub fn new(prune: Arc<PruneExpiredRecordsUseCase>, retention_hours: u32) -> Self {
        Self {
            prune,
            retention_hours,
            interval_secs: 3600,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn run_once(&self) -> Result<u64, DomainError> {
        self.prune.execute(self.retention_hours).await
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            retention_hours = self.retention_hours,
            interval_secs = self.interval_secs,
            "Starting record retention job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("RecordRetentionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.run_once().await {
                            Ok(deleted) => {
                                info!(deleted, "Record retention completed");
                            }
                            Err(e) => {
                                error!(error = %e, "Record retention failed");
                            }
                        }
                    }
                }
            }
        });
    }
}
