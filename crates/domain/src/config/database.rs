use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Persist every answered query for the owning subdomain.
    #[serde(default = "default_true")]
    pub log_requests: bool,

    /// Pending request log entries; further entries are dropped while full.
    #[serde(default = "default_request_log_channel_capacity")]
    pub request_log_channel_capacity: usize,

    #[serde(default = "default_request_log_max_batch_size")]
    pub request_log_max_batch_size: usize,

    #[serde(default = "default_request_log_flush_interval_ms")]
    pub request_log_flush_interval_ms: u64,

    /// SQLite has a single writer; more connections only queue on the lock.
    #[serde(default = "default_write_pool_max_connections")]
    pub write_pool_max_connections: u32,

    #[serde(default = "default_read_pool_max_connections")]
    pub read_pool_max_connections: u32,

    #[serde(default = "default_write_busy_timeout_secs")]
    pub write_busy_timeout_secs: u64,

    #[serde(default = "default_wal_autocheckpoint")]
    pub wal_autocheckpoint: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            log_requests: true,
            request_log_channel_capacity: default_request_log_channel_capacity(),
            request_log_max_batch_size: default_request_log_max_batch_size(),
            request_log_flush_interval_ms: default_request_log_flush_interval_ms(),
            write_pool_max_connections: default_write_pool_max_connections(),
            read_pool_max_connections: default_read_pool_max_connections(),
            write_busy_timeout_secs: default_write_busy_timeout_secs(),
            wal_autocheckpoint: default_wal_autocheckpoint(),
        }
    }
}

fn default_db_path() -> String {
    "./flatboat.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_log_channel_capacity() -> usize {
    10_000
}

fn default_request_log_max_batch_size() -> usize {
    500
}

fn default_request_log_flush_interval_ms() -> u64 {
    100
}

fn default_write_pool_max_connections() -> u32 {
    1
}

fn default_read_pool_max_connections() -> u32 {
    8
}

fn default_write_busy_timeout_secs() -> u64 {
    30
}

fn default_wal_autocheckpoint() -> u32 {
    10_000
}
