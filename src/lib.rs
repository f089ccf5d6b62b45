// Chart timeseries engine - merges sparse benchmark series into display lines
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::aggregate::aggregate_timeserieses;
pub use application::cancel::{CancelHandle, CancelToken, cancel_pair};
pub use application::colors::assign_colors;
pub use application::iterator::{MAX_POINTS, MultiTimeseriesIterator, TimeseriesIterator};
pub use application::layout::{ChartState, layout, measure_y_ticks};
pub use application::loader::LineLoader;
pub use application::sample_reader::{SampleReader, SampleStream};
pub use application::store::ChartStore;
pub use domain::descriptor::{BuildType, FetchDescriptor, LevelOfDetail, LineDescriptor, Statistic};
pub use domain::line::Line;
pub use domain::merged::MergedDatum;
pub use domain::sample::{Range, Sample, Timeseries};
pub use error::ReadError;
pub use infrastructure::batch::{Batch, BatchIterator, BatchSettings};
pub use infrastructure::config::{EngineConfig, load_engine_config};
pub use infrastructure::memory_reader::MemorySampleReader;
