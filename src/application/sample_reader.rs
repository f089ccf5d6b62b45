// Streaming reader trait for raw sample data access
use crate::domain::descriptor::FetchDescriptor;
use crate::domain::sample::{Range, Timeseries};
use crate::error::ReadError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Async sequence of series snapshots for one fetch descriptor.
pub type SampleStream = BoxStream<'static, Result<Timeseries, ReadError>>;

/// Data-access collaborator behind the streaming loader.
///
/// Each stream item is a complete snapshot of the series so far (e.g. a
/// cached response followed by the fresh network response) and supersedes
/// the previous item. A stream may end after zero items, and one item
/// failing never poisons the rest of the stream.
#[async_trait]
pub trait SampleReader: Send + Sync {
    async fn read(&self, fetch: FetchDescriptor, range: Range) -> SampleStream;
}
