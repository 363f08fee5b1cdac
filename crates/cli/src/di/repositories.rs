use flatboat_application::ports::ZoneSerial;
use flatboat_domain::{Config, DomainError, RecordCodec, Zone};
use flatboat_infrastructure::repositories::{
    SqliteRecordRepository, SqliteRequestLogRepository, SqliteSerialCounter,
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Repositories {
    pub zone: Arc<Zone>,
    pub codec: Arc<RecordCodec>,
    pub serial: Arc<SqliteSerialCounter>,
    pub records: Arc<SqliteRecordRepository>,
    pub request_log: Arc<SqliteRequestLogRepository>,
    pub write_pool: SqlitePool,
}

impl Repositories {
    pub async fn new(
        write_pool: SqlitePool,
        read_pool: SqlitePool,
        config: &Config,
    ) -> Result<Self, DomainError> {
        let zone = Arc::new(Zone::from_config(&config.zone)?);
        let codec = Arc::new(RecordCodec::new());
        let serial = Arc::new(
            SqliteSerialCounter::load(write_pool.clone())
                .await?
                .with_read_pool(read_pool.clone()),
        );

        Ok(Self {
            records: Arc::new(SqliteRecordRepository::new(
                write_pool.clone(),
                read_pool,
                codec.clone(),
                serial.clone(),
                zone.clone(),
            )),
            request_log: Arc::new(SqliteRequestLogRepository::new(
                write_pool.clone(),
                &config.database,
            )),
            zone,
            codec,
            serial,
            write_pool,
        })
    }

    pub fn serial_value(&self) -> u32 {
        self.serial.current()
    }
}
