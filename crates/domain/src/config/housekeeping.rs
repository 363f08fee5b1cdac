use serde::{Deserialize, Serialize};

/// Background pruning of records and request logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HousekeepingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_retention_hours")]
    pub record_retention_hours: u32,

    #[serde(default = "default_retention_hours")]
    pub request_retention_hours: u32,

    #[serde(default = "default_wal_checkpoint_interval_secs")]
    pub wal_checkpoint_interval_secs: u64,
}

impl Default for HousekeepingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            record_retention_hours: default_retention_hours(),
            request_retention_hours: default_retention_hours(),
            wal_checkpoint_interval_secs: default_wal_checkpoint_interval_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    3600
}

fn default_retention_hours() -> u32 {
    24
}

fn default_wal_checkpoint_interval_secs() -> u64 {
    300
}
