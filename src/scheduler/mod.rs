//! Periodic analytics trigger
//!
//! Runs the aggregation pipeline on a fixed interval. Runs are sequential
//! within one scheduler; ticks missed while a run is in progress are
//! skipped rather than queued.

use crate::analytics::{Pipeline, RunStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Invokes [`Pipeline::run`] every `interval`
pub struct AnalyticsScheduler {
    pipeline: Arc<Pipeline>,
    interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AnalyticsScheduler {
    pub fn new(pipeline: Arc<Pipeline>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            handle: Mutex::new(None),
        }
    }

    /// Whether the background loop is active
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .map(|h| h.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Spawn the background loop. The first run happens immediately.
    ///
    /// Calling `start` on a running scheduler is a no-op.
    pub fn start(&self) {
        let mut handle = match self.handle.lock() {
            Ok(handle) => handle,
            Err(poisoned) => poisoned.into_inner(),
        };
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let pipeline = self.pipeline.clone();
        let period = self.interval.max(Duration::from_millis(1));

        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let outcome = pipeline.run().await;
                if outcome.status == RunStatus::Error {
                    tracing::warn!(
                        run_id = %outcome.run_id,
                        "Scheduled analytics run failed; retrying next interval"
                    );
                }
            }
        }));

        tracing::info!(interval_secs = self.interval.as_secs(), "Analytics scheduler started");
    }

    /// Stop the background loop; an in-flight run is cancelled
    pub fn stop(&self) {
        let handle = match self.handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
            tracing::info!("Analytics scheduler stopped");
        }
    }
}

impl Drop for AnalyticsScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FaqUpdaterConfig;
    use crate::error::Result;
    use crate::extraction::KeyPhraseService;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct NoPhrases;

    #[async_trait]
    impl KeyPhraseService for NoPhrases {
        async fn detect_key_phrases(
            &self,
            texts: &[String],
            _language_code: &str,
        ) -> Result<Vec<Vec<String>>> {
            Ok(vec![Vec::new(); texts.len()])
        }
    }

    fn make_pipeline() -> Arc<Pipeline> {
        let store = Arc::new(MemoryStore::new(10));
        Arc::new(Pipeline::from_config(
            &FaqUpdaterConfig::default(),
            store.clone(),
            store,
            Arc::new(NoPhrases),
        ))
    }

    #[tokio::test]
    async fn test_runs_on_start_and_records_outcome() {
        let pipeline = make_pipeline();
        let scheduler = AnalyticsScheduler::new(pipeline.clone(), Duration::from_secs(3600));

        scheduler.start();
        assert!(scheduler.is_running());

        for _ in 0..100 {
            if pipeline.last_outcome().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let outcome = pipeline.last_outcome().await.expect("first tick should run");
        assert_eq!(outcome.status, RunStatus::NoOp);

        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn test_repeats_on_interval() {
        let pipeline = make_pipeline();
        let scheduler = AnalyticsScheduler::new(pipeline.clone(), Duration::from_millis(20));
        scheduler.start();

        let mut run_ids = std::collections::HashSet::new();
        for _ in 0..100 {
            if let Some(outcome) = pipeline.last_outcome().await {
                run_ids.insert(outcome.run_id);
            }
            if run_ids.len() >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        scheduler.stop();
        assert!(run_ids.len() >= 2);
    }

    #[tokio::test]
    async fn test_double_start_keeps_single_loop() {
        let scheduler = AnalyticsScheduler::new(make_pipeline(), Duration::from_secs(3600));
        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
