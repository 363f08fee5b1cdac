pub mod database;
pub mod errors;
pub mod housekeeping;
pub mod logging;
pub mod root;
pub mod server;
pub mod zone;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use housekeeping::HousekeepingConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use zone::{OverrideRecord, ZoneConfig};
