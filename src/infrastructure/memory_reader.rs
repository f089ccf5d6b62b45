// In-memory sample reader implementation
use crate::application::sample_reader::{SampleReader, SampleStream};
use crate::domain::descriptor::FetchDescriptor;
use crate::domain::sample::{Range, Timeseries};
use crate::error::ReadError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// [`SampleReader`] backed by preloaded series, for tests and local tooling.
/// Each registered snapshot is streamed in order, optionally with a delay
/// between chunks to exercise batching and interleaving.
#[derive(Default)]
pub struct MemorySampleReader {
    snapshots: HashMap<FetchDescriptor, Vec<Timeseries>>,
    failures: HashMap<FetchDescriptor, String>,
    chunk_delay: Option<Duration>,
}

impl MemorySampleReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, fetch: FetchDescriptor, snapshots: Vec<Timeseries>) -> Self {
        self.snapshots.insert(fetch, snapshots);
        self
    }

    pub fn with_failure(mut self, fetch: FetchDescriptor, reason: impl Into<String>) -> Self {
        self.failures.insert(fetch, reason.into());
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    fn series_name(fetch: &FetchDescriptor) -> String {
        format!("{}/{}/{}", fetch.test_suite, fetch.bot, fetch.measurement)
    }
}

#[async_trait]
impl SampleReader for MemorySampleReader {
    async fn read(&self, fetch: FetchDescriptor, _range: Range) -> SampleStream {
        if let Some(reason) = self.failures.get(&fetch) {
            let error = ReadError::Backend {
                series: Self::series_name(&fetch),
                reason: reason.clone(),
            };
            return Box::pin(futures::stream::iter(vec![Err(error)]));
        }

        let snapshots = self.snapshots.get(&fetch).cloned().unwrap_or_default();
        if snapshots.is_empty() {
            tracing::debug!(series = %Self::series_name(&fetch), "no preloaded data");
        }
        let delay = self.chunk_delay;
        Box::pin(async_stream::stream! {
            for snapshot in snapshots {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(snapshot);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::{BuildType, LevelOfDetail, Statistic};
    use crate::domain::sample::Sample;
    use chrono::{TimeZone, Utc};
    use futures::StreamExt;

    fn fetch() -> FetchDescriptor {
        FetchDescriptor {
            test_suite: "system_health".to_string(),
            bot: "linux-perf".to_string(),
            measurement: "timeToFirstPaint".to_string(),
            test_case: None,
            statistic: Statistic::Avg,
            build_type: BuildType::Test,
            level_of_detail: LevelOfDetail::Xy,
        }
    }

    fn snapshot() -> Timeseries {
        let ts = Utc.timestamp_opt(1, 0).single().unwrap();
        Timeseries::new("ms", vec![Sample::point(1, ts, 10.0)])
    }

    #[tokio::test]
    async fn test_streams_registered_snapshots() {
        let reader = MemorySampleReader::new().with_series(fetch(), vec![snapshot(), snapshot()]);
        let items: Vec<_> = reader.read(fetch(), Range::unbounded()).await.collect().await;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn test_unregistered_fetch_yields_nothing() {
        let reader = MemorySampleReader::new();
        let items: Vec<_> = reader.read(fetch(), Range::unbounded()).await.collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_registered_failure_surfaces_as_error() {
        let reader = MemorySampleReader::new().with_failure(fetch(), "503");
        let items: Vec<_> = reader.read(fetch(), Range::unbounded()).await.collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }
}
