use async_trait::async_trait;

/// Read side of the zone serial.
#[async_trait]
pub trait ZoneSerial: Send + Sync {
    /// Latest serial committed through this process. Never blocks.
    fn current(&self) -> u32;

    /// The stored serial, which also moves when another process writes to the
    /// zone. Falls back to `current()` when storage cannot be read.
    async fn latest(&self) -> u32 {
        self.current()
    }
}
