use crate::errors::Result;
use crate::model::{NewReading, Reading};
use crate::store::{ReadingStore, Retention};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct Inner {
    next_id: i64,
    readings: VecDeque<Reading>,
}

/// In-process reading store. Nothing survives a restart.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    retention: Retention,
    clock: Clock,
}

impl MemoryStore {
    pub fn new(retention: Retention) -> Self {
        Self::with_clock(retention, Arc::new(Utc::now))
    }

    pub fn with_clock(retention: Retention, clock: Clock) -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                readings: VecDeque::new(),
            }),
            retention,
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Retention::Unbounded)
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn append(&self, reading: NewReading) -> Result<Reading> {
        let mut inner = self.inner.write().await;

        let stored = Reading {
            id: inner.next_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            timestamp: (self.clock)(),
        };
        inner.next_id += 1;
        inner.readings.push_back(stored.clone());

        if let Some(limit) = self.retention.limit() {
            while inner.readings.len() > limit {
                inner.readings.pop_front();
            }
        }

        Ok(stored)
    }

    async fn latest(&self) -> Result<Option<Reading>> {
        Ok(self.inner.read().await.readings.back().cloned())
    }

    async fn all_ordered(&self) -> Result<Vec<Reading>> {
        Ok(self.inner.read().await.readings.iter().cloned().collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.inner.read().await.readings.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn sample(temperature: f64, humidity: f64) -> NewReading {
        NewReading {
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_empty_store() {
        tokio_test::block_on(async {
            let store = MemoryStore::default();
            assert_eq!(store.latest().await.unwrap(), None);
            assert!(store.all_ordered().await.unwrap().is_empty());
            assert_eq!(store.count().await.unwrap(), 0);
        });
    }

    #[test]
    fn test_append_assigns_id_and_timestamp() {
        tokio_test::block_on(async {
            let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 5, 2).unwrap();
            let store = MemoryStore::with_clock(Retention::Unbounded, Arc::new(move || at));

            let first = store.append(sample(21.0, 40.0)).await.unwrap();
            let second = store.append(sample(22.0, 41.0)).await.unwrap();

            assert_eq!(first.id, 1);
            assert_eq!(second.id, 2);
            assert_eq!(first.timestamp, at);
            assert_eq!(second.temperature, 22.0);
            assert_eq!(second.humidity, 41.0);
        });
    }

    #[test]
    fn test_latest_is_last_of_history() {
        tokio_test::block_on(async {
            let store = MemoryStore::default();
            for i in 0..5 {
                store.append(sample(20.0 + i as f64, 50.0)).await.unwrap();
            }

            let history = store.all_ordered().await.unwrap();
            let latest = store.latest().await.unwrap().unwrap();
            assert_eq!(history.last(), Some(&latest));
            assert!(history.windows(2).all(|w| w[0].id < w[1].id));
            assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        });
    }

    #[test]
    fn test_retention_evicts_oldest() {
        tokio_test::block_on(async {
            let store = MemoryStore::new(Retention::Newest(3));
            for i in 0..5 {
                store.append(sample(i as f64, i as f64)).await.unwrap();
            }

            let ids: Vec<i64> = store
                .all_ordered()
                .await
                .unwrap()
                .iter()
                .map(|r| r.id)
                .collect();
            assert_eq!(ids, vec![3, 4, 5]);
            assert_eq!(store.count().await.unwrap(), 3);
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_gapless() {
        let store = Arc::new(MemoryStore::default());
        let n = 200;

        let handles: Vec<_> = (0..n)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.append(sample(i as f64, 50.0)).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let reading = handle.await.unwrap().unwrap();
            assert!(ids.insert(reading.id), "duplicate id {}", reading.id);
        }

        let expected: HashSet<i64> = (1..=n as i64).collect();
        assert_eq!(ids, expected);

        let history = store.all_ordered().await.unwrap();
        assert_eq!(history.len(), n);
        assert!(history.windows(2).all(|w| w[0].id + 1 == w[1].id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_consistent_prefixes_during_appends() {
        let store = Arc::new(MemoryStore::default());
        let done = Arc::new(AtomicBool::new(false));

        let appenders: Vec<_> = (0..4)
            .map(|worker| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    for i in 0..50 {
                        let temperature = (worker * 100 + i) as f64;
                        store
                            .append(sample(temperature, temperature + 0.5))
                            .await
                            .unwrap();
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let store = Arc::clone(&store);
                let done = Arc::clone(&done);
                tokio::spawn(async move {
                    let mut previous_len = 0;
                    loop {
                        let finished = done.load(Ordering::SeqCst);
                        let snapshot = store.all_ordered().await.unwrap();

                        assert!(snapshot.len() >= previous_len);
                        if let Some(first) = snapshot.first() {
                            for (offset, reading) in snapshot.iter().enumerate() {
                                assert_eq!(reading.id, first.id + offset as i64);
                                assert_eq!(reading.humidity, reading.temperature + 0.5);
                            }
                        }
                        previous_len = snapshot.len();

                        let latest = store.latest().await.unwrap();
                        if let Some(last) = snapshot.last() {
                            assert!(latest.unwrap().id >= last.id);
                        }

                        if finished {
                            return snapshot.len();
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for appender in appenders {
            appender.await.unwrap();
        }
        done.store(true, Ordering::SeqCst);

        for reader in readers {
            assert_eq!(reader.await.unwrap(), 200);
        }
    }
}
