// Batching iterator - fan-in over streaming readers with debounced batches
use crate::error::ReadError;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde::Deserialize;
use std::time::Duration;
use tokio_stream::StreamExt as _;

/// Policy bounding one batch: flush once `max_size` items arrived or once
/// `debounce_ms` elapsed since the first pending item, whichever is first.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BatchSettings {
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_max_size() -> usize {
    32
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// One flushed batch: whatever arrived, split into successes and failures.
/// Failures never abort the other readers; they just contribute nothing.
#[derive(Debug)]
pub struct Batch<T> {
    pub results: Vec<T>,
    pub errors: Vec<ReadError>,
}

/// Merges N reader streams (first-of-N-ready, no cross-reader ordering) and
/// groups arrivals into batches so one network response does not trigger a
/// full re-layout on its own.
pub struct BatchIterator<T> {
    chunks: BoxStream<'static, Vec<Result<T, ReadError>>>,
}

impl<T: Send + 'static> BatchIterator<T> {
    pub fn new(
        readers: Vec<BoxStream<'static, Result<T, ReadError>>>,
        settings: &BatchSettings,
    ) -> Self {
        let merged = stream::select_all(readers);
        let chunks =
            merged.chunks_timeout(settings.max_size, Duration::from_millis(settings.debounce_ms));
        Self {
            chunks: Box::pin(chunks),
        }
    }

    /// Next batch, or `None` once every reader has ended.
    pub async fn next(&mut self) -> Option<Batch<T>> {
        let items = StreamExt::next(&mut self.chunks).await?;
        let mut batch = Batch {
            results: Vec::new(),
            errors: Vec::new(),
        };
        for item in items {
            match item {
                Ok(result) => batch.results.push(result),
                Err(error) => batch.errors.push(error),
            }
        }
        Some(batch)
    }
}
