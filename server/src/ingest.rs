use crate::errors::Result;
use crate::metrics::{APPEND_LATENCY_SECONDS, READINGS_INGESTED_TOTAL, REJECTED_PAYLOADS_TOTAL};
use crate::model::Reading;
use crate::store::ReadingStore;
use crate::validate::parse_reading;
use std::time::Instant;
use tracing::{info, warn};

/// Validates one device payload and appends it to the store.
///
/// Rejected payloads never reach the store. Storage failures are returned as-is
/// and are not retried; the device sends again on its next cycle.
pub async fn ingest(store: &dyn ReadingStore, payload: &[u8]) -> Result<Reading> {
    let candidate = parse_reading(payload).map_err(|e| {
        REJECTED_PAYLOADS_TOTAL.inc();
        warn!("Rejected reading payload: {}", e);
        e
    })?;

    let start = Instant::now();
    let reading = store.append(candidate).await?;
    APPEND_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
    READINGS_INGESTED_TOTAL.inc();

    info!(
        id = reading.id,
        temp = reading.temperature,
        hum = reading.humidity,
        "Data received"
    );

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::memory::MemoryStore;

    #[test]
    fn test_ingest_valid() {
        tokio_test::block_on(async {
            let store = MemoryStore::default();
            let reading = ingest(&store, br#"{"temp": 23.4, "hum": 55.1}"#)
                .await
                .unwrap();

            assert_eq!(reading.id, 1);
            assert_eq!(store.latest().await.unwrap(), Some(reading));
        });
    }

    #[test]
    fn test_ingest_invalid_does_not_touch_store() {
        tokio_test::block_on(async {
            let store = MemoryStore::default();
            let result = ingest(&store, br#"{"temp": 21.5}"#).await;

            assert!(matches!(result, Err(Error::Validation(_))));
            assert_eq!(store.count().await.unwrap(), 0);
        });
    }
}
