// src/services/cache_writer.rs
// DOCUMENTATION: Write-behind persistence of resolved POI results
// PURPOSE: Persist live aggregation results without blocking the caller and
// without inheriting the inbound request's cancellation

use crate::db::PoiStore;
use crate::models::{Coordinate, NearbyPois};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One queued write-back
#[derive(Debug, Clone)]
pub struct CacheWriteJob {
    /// Opaque listing identifier the metrics are keyed under
    pub origin_id: String,
    pub origin: Coordinate,
    pub result: NearbyPois,
}

/// Handle for submitting write-back jobs to the background worker
/// DOCUMENTATION: The worker owns its own lifetime: jobs keep running after
/// the request that produced them has finished. Each job carries a timeout so
/// a stuck store cannot wedge the queue. Dropping every handle closes the
/// channel and lets the worker drain and exit.
#[derive(Clone)]
pub struct CacheWriter {
    tx: mpsc::Sender<CacheWriteJob>,
}

impl CacheWriter {
    /// Spawn the worker task and return the submit handle plus its join handle
    pub fn spawn(
        store: Arc<dyn PoiStore>,
        queue_depth: usize,
        job_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<CacheWriteJob>(queue_depth);

        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let origin_id = job.origin_id.clone();
                match tokio::time::timeout(job_timeout, persist_result(store.as_ref(), &job)).await
                {
                    Ok(()) => log::debug!("write-back finished for origin {}", origin_id),
                    Err(_) => log::error!(
                        "write-back for origin {} timed out after {:?}",
                        origin_id,
                        job_timeout
                    ),
                }
            }
            log::info!("cache writer drained, shutting down");
        });

        (Self { tx }, handle)
    }

    /// Submit a job without waiting; a full queue drops the job with a log
    /// line, never an error to the caller
    pub fn submit(&self, job: CacheWriteJob) {
        if let Err(e) = self.tx.try_send(job) {
            log::error!("cache write-back dropped: {}", e);
        }
    }
}

/// Persist every POI of every category, skipping failed units
/// DOCUMENTATION: No transaction spans the write-back: a half-persisted result
/// is re-completed by the next cache miss for the same coordinate. Zero rows
/// affected on the metric insert means the pair was already cached.
pub(crate) async fn persist_result(store: &dyn PoiStore, job: &CacheWriteJob) {
    for (category, pois) in &job.result.categories {
        for poi in pois {
            let poi_id = match store
                .upsert_poi(*category, &poi.name, poi.address.as_deref(), poi.location)
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    log::warn!(
                        "Error upserting {} POI '{}': {}",
                        category.as_str(),
                        poi.name,
                        e
                    );
                    continue;
                }
            };

            match store
                .upsert_travel_metric(
                    &job.origin_id,
                    job.origin,
                    poi_id,
                    poi.distance_meters,
                    poi.duration_minutes,
                )
                .await
            {
                Ok(0) => log::debug!(
                    "Travel metrics already exist for origin {} and poi {} ({})",
                    job.origin_id,
                    poi_id,
                    category.as_str()
                ),
                Ok(_) => log::debug!(
                    "Cached {} '{}' for origin {}",
                    category.as_str(),
                    poi.name,
                    job.origin_id
                ),
                Err(e) => log::warn!(
                    "Error saving travel metrics for {} '{}': {}",
                    category.as_str(),
                    poi.name,
                    e
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::RecordingStore;
    use crate::models::{EnrichedPoi, PoiCategory};

    fn sample_result() -> NearbyPois {
        let mut result = NearbyPois::default();
        result.categories.insert(
            PoiCategory::Subway,
            vec![
                EnrichedPoi {
                    name: "Tajrish Station".to_string(),
                    address: Some("Tajrish Sq".to_string()),
                    location: Coordinate::new(35.8044, 51.4325),
                    distance_meters: 800,
                    duration_minutes: 6,
                },
                EnrichedPoi {
                    name: "Gheytariyeh Station".to_string(),
                    address: None,
                    location: Coordinate::new(35.7910, 51.4420),
                    distance_meters: 1400,
                    duration_minutes: 9,
                },
            ],
        );
        result.categories.insert(
            PoiCategory::Hospital,
            vec![EnrichedPoi {
                name: "Bahman Hospital".to_string(),
                address: None,
                location: Coordinate::new(35.7700, 51.4100),
                distance_meters: 2300,
                duration_minutes: 12,
            }],
        );
        result
    }

    #[tokio::test]
    async fn test_persist_writes_every_poi_once() {
        let store = RecordingStore::default();
        let job = CacheWriteJob {
            origin_id: "post-abc".to_string(),
            origin: Coordinate::new(35.78, 51.42),
            result: sample_result(),
        };

        persist_result(&store, &job).await;

        assert_eq!(store.poi_upserts(), 3);
        assert_eq!(store.metric_upserts(), 3);
    }

    #[tokio::test]
    async fn test_persist_is_idempotent() {
        let store = RecordingStore::default();
        let job = CacheWriteJob {
            origin_id: "post-abc".to_string(),
            origin: Coordinate::new(35.78, 51.42),
            result: sample_result(),
        };

        persist_result(&store, &job).await;
        let rows_after_first = store.stored_row_count();

        // Second identical write-back: every insert conflicts, nothing errors
        persist_result(&store, &job).await;

        assert_eq!(store.stored_row_count(), rows_after_first);
        assert_eq!(store.error_count(), 0);
    }

    #[tokio::test]
    async fn test_worker_drains_submitted_jobs() {
        let store = Arc::new(RecordingStore::default());
        let (writer, handle) =
            CacheWriter::spawn(store.clone(), 8, Duration::from_secs(5));

        writer.submit(CacheWriteJob {
            origin_id: "post-xyz".to_string(),
            origin: Coordinate::new(35.70, 51.33),
            result: sample_result(),
        });

        // Dropping the only submit handle closes the channel; the worker
        // finishes queued jobs before exiting.
        drop(writer);
        handle.await.unwrap();

        assert_eq!(store.poi_upserts(), 3);
    }
}
