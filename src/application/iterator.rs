// Timeseries iterators - range clipping, downsampling and lock-step fan-in
use crate::domain::descriptor::LineDescriptor;
use crate::domain::merged::MergedDatum;
use crate::domain::sample::{Range, Revision, Sample, Timeseries};

/// Global display budget: one iterator yields at most this many points no
/// matter how dense the underlying series is.
pub const MAX_POINTS: usize = 500;

/// Walks one raw sample sequence clipped to a revision/timestamp window,
/// advancing by a fractional stride so the output stays within
/// [`MAX_POINTS`]. This is systematic uniform-stride subsampling: beyond the
/// point budget the display is representative, not full fidelity.
pub struct TimeseriesIterator<'a> {
    samples: &'a [Sample],
    end_index: usize,
    index: f64,
    stride: f64,
    exhausted: bool,
}

impl<'a> TimeseriesIterator<'a> {
    pub fn new(_descriptor: &LineDescriptor, samples: &'a [Sample], range: &Range) -> Self {
        let start_index = Self::find_start_index(samples, range);
        // One past the last in-range sample.
        let end_count = Self::find_end_count(samples, range);

        let exhausted = end_count == 0 || start_index >= end_count;
        let end_index = end_count.saturating_sub(1);
        let span = end_index.saturating_sub(start_index);
        let stride = (span as f64 / (MAX_POINTS - 1) as f64).max(1.0);

        Self {
            samples,
            end_index,
            index: start_index as f64,
            stride,
            exhausted,
        }
    }

    // The timestamp bound takes precedence over the revision bound when
    // both are given.
    fn find_start_index(samples: &[Sample], range: &Range) -> usize {
        if let Some(min_timestamp) = range.min_timestamp {
            return samples.partition_point(|s| s.timestamp < min_timestamp);
        }
        if let Some(min_revision) = range.min_revision {
            return samples.partition_point(|s| s.revision < min_revision);
        }
        0
    }

    fn find_end_count(samples: &[Sample], range: &Range) -> usize {
        if let Some(max_timestamp) = range.max_timestamp {
            return samples.partition_point(|s| s.timestamp <= max_timestamp);
        }
        if let Some(max_revision) = range.max_revision {
            return samples.partition_point(|s| s.revision <= max_revision);
        }
        samples.len()
    }

    fn round_index(&self) -> usize {
        self.index.round() as usize
    }

    pub fn done(&self) -> bool {
        self.exhausted || self.round_index() > self.end_index
    }

    pub fn current(&self) -> Option<&'a Sample> {
        if self.done() {
            return None;
        }
        self.samples.get(self.round_index().min(self.end_index))
    }

    pub fn next(&mut self) {
        self.index += self.stride;
    }
}

/// Drives N [`TimeseriesIterator`]s in lock-step by revision, merging the
/// samples that share the minimum x into one [`MergedDatum`] per step. This
/// is the fan-in for aggregated lines, e.g. one logical line summed across
/// several bots or test cases.
pub struct MultiTimeseriesIterator<'a> {
    iterators: Vec<TimeseriesIterator<'a>>,
}

impl<'a> MultiTimeseriesIterator<'a> {
    pub fn new(
        descriptor: &LineDescriptor,
        timeserieses: &'a [Timeseries],
        range: &Range,
    ) -> Self {
        Self {
            iterators: timeserieses
                .iter()
                .map(|series| TimeseriesIterator::new(descriptor, &series.samples, range))
                .collect(),
        }
    }
}

impl Iterator for MultiTimeseriesIterator<'_> {
    type Item = (Revision, MergedDatum);

    fn next(&mut self) -> Option<Self::Item> {
        let min_x = self
            .iterators
            .iter()
            .filter(|it| !it.done())
            .filter_map(TimeseriesIterator::current)
            .map(|sample| sample.revision)
            .min()?;

        let mut merged: Option<MergedDatum> = None;
        for iterator in &mut self.iterators {
            let Some(sample) = iterator.current() else {
                continue;
            };
            if sample.revision != min_x {
                continue;
            }
            match &mut merged {
                None => merged = Some(MergedDatum::from_sample(sample)),
                Some(datum) => datum.merge(sample),
            }
            iterator.next();
        }

        merged.map(|datum| (min_x, datum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::{BuildType, Statistic};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    fn descriptor() -> LineDescriptor {
        LineDescriptor {
            test_suites: vec!["system_health".to_string()],
            measurement: "timeToFirstPaint".to_string(),
            bots: vec!["linux-perf".to_string()],
            test_cases: vec![],
            statistic: Statistic::Avg,
            build_type: BuildType::Test,
        }
    }

    fn series(revisions: &[Revision]) -> Vec<Sample> {
        revisions
            .iter()
            .map(|&r| Sample::point(r, ts(r as i64), r as f64))
            .collect()
    }

    fn collect(samples: &[Sample], range: &Range) -> Vec<Revision> {
        let descriptor = descriptor();
        let mut iterator = TimeseriesIterator::new(&descriptor, samples, range);
        let mut revisions = Vec::new();
        while let Some(sample) = iterator.current() {
            revisions.push(sample.revision);
            iterator.next();
        }
        revisions
    }

    #[test]
    fn test_empty_series_is_immediately_done() {
        let descriptor = descriptor();
        let iterator = TimeseriesIterator::new(&descriptor, &[], &Range::unbounded());
        assert!(iterator.done());
        assert!(iterator.current().is_none());
    }

    #[test]
    fn test_dense_series_stays_within_point_budget() {
        let samples = series(&(0..10_000).collect::<Vec<_>>());
        let yielded = collect(&samples, &Range::unbounded());
        assert!(yielded.len() <= MAX_POINTS);
        assert_eq!(yielded.first(), Some(&0));
        assert_eq!(yielded.last(), Some(&9_999));
    }

    #[test]
    fn test_sparse_series_yields_every_sample() {
        let samples = series(&[1, 4, 9, 16, 25]);
        assert_eq!(collect(&samples, &Range::unbounded()), vec![1, 4, 9, 16, 25]);
    }

    #[test]
    fn test_revision_clipping_is_inclusive() {
        let samples = series(&[1, 4, 9, 16, 25]);
        let range = Range::revisions(Some(4), Some(16));
        assert_eq!(collect(&samples, &range), vec![4, 9, 16]);
    }

    #[test]
    fn test_clipped_budget_keeps_range_endpoints() {
        let samples = series(&(0..5_000).collect::<Vec<_>>());
        let range = Range::revisions(Some(1_000), Some(4_000));
        let yielded = collect(&samples, &range);
        assert!(yielded.len() <= MAX_POINTS);
        assert_eq!(yielded.first(), Some(&1_000));
        assert_eq!(yielded.last(), Some(&4_000));
        assert!(yielded.iter().all(|&r| (1_000..=4_000).contains(&r)));
    }

    #[test]
    fn test_window_outside_data_yields_nothing() {
        let samples = series(&[10, 20, 30]);
        assert!(collect(&samples, &Range::revisions(Some(40), None)).is_empty());
        assert!(collect(&samples, &Range::revisions(None, Some(5))).is_empty());
        assert!(collect(&samples, &Range::revisions(Some(21), Some(29))).is_empty());
    }

    #[test]
    fn test_timestamp_bound_takes_precedence() {
        let samples = series(&[10, 20, 30]);
        // The revision bound alone would keep everything, the timestamp
        // bound must win and clip to the first two samples.
        let range = Range {
            min_revision: Some(0),
            max_revision: Some(100),
            min_timestamp: None,
            max_timestamp: Some(ts(20)),
        };
        assert_eq!(collect(&samples, &range), vec![10, 20]);
    }

    fn merge_all(serieses: &[Timeseries], range: &Range) -> Vec<(Revision, MergedDatum)> {
        MultiTimeseriesIterator::new(&descriptor(), serieses, range).collect()
    }

    #[test]
    fn test_multi_merges_shared_x_and_keeps_singletons() {
        let a = Timeseries::new(
            "ms",
            vec![
                Sample::point(1, ts(1), 10.0),
                Sample::point(5, ts(5), 20.0),
            ],
        );
        let b = Timeseries::new("ms", vec![Sample::point(1, ts(1), 30.0)]);

        let merged = merge_all(&[a, b], &Range::unbounded());
        assert_eq!(merged.len(), 2);

        let (x, datum) = &merged[0];
        assert_eq!(*x, 1);
        assert_eq!(datum.count, 2);
        assert!((datum.avg - 20.0).abs() < 1e-12);
        assert!((datum.std - 10.0).abs() < 1e-9);

        let (x, datum) = &merged[1];
        assert_eq!(*x, 5);
        assert_eq!(datum.count, 1);
        assert!((datum.avg - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_output_is_ordered_and_interleaved() {
        let a = Timeseries::new("ms", series(&[1, 3, 5]));
        let b = Timeseries::new("ms", series(&[2, 3, 6]));

        let merged = merge_all(&[a, b], &Range::unbounded());
        let xs: Vec<Revision> = merged.iter().map(|(x, _)| *x).collect();
        assert_eq!(xs, vec![1, 2, 3, 5, 6]);

        // x=3 exists in both series and must fold both samples.
        let (_, at_three) = &merged[2];
        assert_eq!(at_three.count, 2);
    }

    #[test]
    fn test_multi_merge_is_order_independent() {
        let a = Timeseries::new("ms", series(&[1, 2, 8, 9]));
        let b = Timeseries::new("ms", series(&[2, 4, 9]));
        let c = Timeseries::new("ms", series(&[1, 9, 12]));

        let forward = merge_all(&[a.clone(), b.clone(), c.clone()], &Range::unbounded());
        let backward = merge_all(&[c, b, a], &Range::unbounded());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_multi_respects_range() {
        let a = Timeseries::new("ms", series(&[1, 5, 9]));
        let b = Timeseries::new("ms", series(&[2, 5, 20]));

        let merged = merge_all(&[a, b], &Range::revisions(Some(2), Some(9)));
        let xs: Vec<Revision> = merged.iter().map(|(x, _)| *x).collect();
        assert_eq!(xs, vec![2, 5, 9]);
    }

    #[test]
    fn test_multi_all_empty() {
        assert!(merge_all(&[], &Range::unbounded()).is_empty());
        let empty = Timeseries::new("ms", vec![]);
        assert!(merge_all(&[empty], &Range::unbounded()).is_empty());
    }
}
