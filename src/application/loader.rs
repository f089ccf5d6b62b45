// Streaming line loader - fans out readers, batches arrivals, lays out lines
use crate::application::cancel::CancelToken;
use crate::application::layout::{layout, measure_y_ticks};
use crate::application::sample_reader::SampleReader;
use crate::application::store::ChartStore;
use crate::domain::descriptor::LineDescriptor;
use crate::domain::sample::Timeseries;
use crate::error::ReadError;
use crate::infrastructure::batch::{BatchIterator, BatchSettings};
use crate::infrastructure::config::EngineConfig;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::sync::Arc;

/// One reader result tagged with the logical line it belongs to.
#[derive(Debug, Clone)]
pub struct TaggedSeries {
    pub descriptor: LineDescriptor,
    pub timeseries: Timeseries,
}

/// Loads all lines of a chart by fanning out one streaming reader per fetch
/// descriptor and laying out arrivals batch by batch.
pub struct LineLoader {
    store: Arc<ChartStore>,
    reader: Arc<dyn SampleReader>,
    batch: BatchSettings,
}

impl LineLoader {
    pub fn new(store: Arc<ChartStore>, reader: Arc<dyn SampleReader>, config: &EngineConfig) -> Self {
        Self {
            store,
            reader,
            batch: config.batch.clone(),
        }
    }

    /// Full load cycle: mark the chart loading, clear its lines, stream
    /// everything in, then clear the loading flag.
    pub async fn load(&self, chart_id: &str, cancel: CancelToken) -> anyhow::Result<()> {
        let updated = self
            .store
            .update(chart_id, |mut state| {
                state.is_loading = true;
                state.lines.clear();
                state
            })
            .await;
        if !updated {
            return Ok(());
        }

        self.load_lines(chart_id, cancel).await?;

        // The chart may have been closed before the load finished; then
        // there is nothing left to unmark.
        self.store
            .update(chart_id, |mut state| {
                state.is_loading = false;
                state
            })
            .await;
        Ok(())
    }

    /// Stream raw series for every line descriptor of the chart and dispatch
    /// one layout pass per batch of arrivals.
    ///
    /// Readers run concurrently and their results arrive in any order; the
    /// layout step merges by descriptor equality, so arrival order does not
    /// matter. Results whose chart or descriptor disappeared mid-flight are
    /// dropped silently, and a single failed reader only costs its own
    /// points.
    pub async fn load_lines(&self, chart_id: &str, mut cancel: CancelToken) -> anyhow::Result<()> {
        let Some(state) = self.store.get(chart_id).await else {
            return Ok(());
        };

        let mut readers: Vec<BoxStream<'static, Result<TaggedSeries, ReadError>>> = Vec::new();
        for line_descriptor in &state.line_descriptors {
            for fetch in line_descriptor.fetch_descriptors(state.level_of_detail) {
                let reader = Arc::clone(&self.reader);
                let descriptor = line_descriptor.clone();
                let range = state.range.clone();
                readers.push(Box::pin(async_stream::stream! {
                    let mut inner = reader.read(fetch, range).await;
                    while let Some(item) = inner.next().await {
                        yield item.map(|timeseries| TaggedSeries {
                            descriptor: descriptor.clone(),
                            timeseries,
                        });
                    }
                }));
            }
        }
        tracing::debug!(chart = chart_id, readers = readers.len(), "starting line load");

        let mut batches = BatchIterator::new(readers, &self.batch);

        loop {
            let batch = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(chart = chart_id, "line load cancelled");
                    return Ok(());
                }
                batch = batches.next() => match batch {
                    Some(batch) => batch,
                    None => break,
                },
            };

            for error in &batch.errors {
                tracing::warn!(
                    chart = chart_id,
                    series = error.series(),
                    error = %error,
                    "series fetch failed, laying out the rest"
                );
            }

            let Some(state) = self.store.get(chart_id).await else {
                // The chart was removed from the store between awaits.
                tracing::debug!(chart = chart_id, "chart closed mid-load, dropping results");
                return Ok(());
            };

            let by_line = collate_timeseries_by_line(batch.results, &state.line_descriptors);
            if by_line.is_empty() {
                continue;
            }

            let updated = self
                .store
                .update(chart_id, |state| layout(state, by_line))
                .await;
            if !updated {
                return Ok(());
            }
            self.store
                .update(chart_id, |mut state| {
                    state.y_axis = measure_y_ticks(&state.lines);
                    state
                })
                .await;
        }

        Ok(())
    }
}

/// Group arrived serieses by their owning line descriptor, matched against
/// the chart's current descriptors. A descriptor the user removed mid-flight
/// no longer matches anything and its data is dropped, not reported.
fn collate_timeseries_by_line(
    results: Vec<TaggedSeries>,
    current_descriptors: &[LineDescriptor],
) -> Vec<(LineDescriptor, Vec<Timeseries>)> {
    let mut by_line: Vec<(LineDescriptor, Vec<Timeseries>)> = Vec::new();
    for TaggedSeries {
        descriptor,
        timeseries,
    } in results
    {
        if !current_descriptors.iter().any(|other| *other == descriptor) {
            tracing::debug!(
                measurement = %descriptor.measurement,
                "descriptor no longer requested, dropping series"
            );
            continue;
        }
        match by_line.iter_mut().find(|(other, _)| *other == descriptor) {
            Some((_, list)) => list.push(timeseries),
            None => by_line.push((descriptor, vec![timeseries])),
        }
    }
    by_line
}
