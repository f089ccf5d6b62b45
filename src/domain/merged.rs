// Merged datum - statistical combination of samples sharing an x coordinate
use crate::domain::descriptor::Statistic;
use crate::domain::sample::{DiagnosticSet, Revision, Sample, SampleAlert};
use chrono::{DateTime, Utc};

/// The combination of one or more raw samples that share an x coordinate.
///
/// `count` is the sum of the constituent counts, and `avg`/`std` are the
/// exact combined population statistics, not approximations.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDatum {
    pub revision: Revision,
    pub timestamp: DateTime<Utc>,
    pub count: u64,
    pub avg: f64,
    pub std: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub diagnostics: Option<DiagnosticSet>,
    pub alert: Option<SampleAlert>,
}

fn fold_extreme(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, b) => a.or(b),
    }
}

impl MergedDatum {
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            revision: sample.revision,
            timestamp: sample.timestamp,
            count: sample.count,
            avg: sample.avg,
            std: sample.std,
            min: sample.min,
            max: sample.max,
            // Clone so later unions never mutate the raw series.
            diagnostics: sample.diagnostics.clone(),
            alert: sample.alert.clone(),
        }
    }

    /// Fold another sample into this datum.
    ///
    /// Mean and variance are combined with the parallel-computation formula
    /// for merging two running accumulators, so merging unequal-sized groups
    /// reproduces the statistics of the concatenated population.
    pub fn merge(&mut self, source: &Sample) {
        if let Some(diagnostics) = &source.diagnostics {
            self.diagnostics
                .get_or_insert_with(DiagnosticSet::new)
                .merge_from(diagnostics);
        }
        if self.alert.is_none() {
            self.alert = source.alert.clone();
        }

        self.revision = self.revision.min(source.revision);
        if source.timestamp < self.timestamp {
            self.timestamp = source.timestamp;
        }
        self.min = fold_extreme(self.min, source.min, f64::min);
        self.max = fold_extreme(self.max, source.max, f64::max);

        let n1 = self.count as f64;
        let n2 = source.count as f64;
        let n = n1 + n2;
        let delta = self.avg - source.avg;
        let m2 = self.std * self.std * n1
            + source.std * source.std * n2
            + delta * delta * n1 * n2 / n;

        self.avg = (self.avg * n1 + source.avg * n2) / n;
        self.std = (m2 / n).sqrt();
        self.count += source.count;
    }

    /// The plotted value for one statistic. Min and max fall back to the
    /// mean when the backend did not record them.
    pub fn statistic(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Avg => self.avg,
            Statistic::Count => self.count as f64,
            Statistic::Std => self.std,
            Statistic::Min => self.min.unwrap_or(self.avg),
            Statistic::Max => self.max.unwrap_or(self.avg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    fn accumulator(values: &[f64]) -> (u64, f64, f64) {
        let n = values.len() as f64;
        let avg = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / n;
        (values.len() as u64, avg, var.sqrt())
    }

    fn sample_from(revision: Revision, values: &[f64]) -> Sample {
        let (count, avg, std) = accumulator(values);
        Sample {
            count,
            avg,
            std,
            ..Sample::point(revision, ts(revision as i64), avg)
        }
    }

    #[test]
    fn test_merge_reproduces_population_statistics() {
        // Two partitions of one dataset must combine to the full-dataset
        // count, mean and population stddev.
        let full: Vec<f64> = vec![3.0, 7.0, 7.0, 19.0, 24.0, 1.0, 2.0, 5.0];
        let (count, avg, std) = accumulator(&full);

        let mut merged = MergedDatum::from_sample(&sample_from(10, &full[..3]));
        merged.merge(&sample_from(10, &full[3..]));

        assert_eq!(merged.count, count);
        assert!((merged.avg - avg).abs() / avg.abs() < 1e-9);
        assert!((merged.std - std).abs() / std.abs() < 1e-9);
    }

    #[test]
    fn test_merge_two_single_measurements() {
        let mut merged = MergedDatum::from_sample(&sample_from(1, &[10.0]));
        merged.merge(&sample_from(1, &[30.0]));

        assert_eq!(merged.count, 2);
        assert!((merged.avg - 20.0).abs() < 1e-12);
        assert!((merged.std - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_keeps_earliest_revision_and_timestamp() {
        let mut merged = MergedDatum::from_sample(&sample_from(7, &[1.0]));
        merged.merge(&sample_from(3, &[2.0]));
        assert_eq!(merged.revision, 3);
        assert_eq!(merged.timestamp, ts(3));
    }

    #[test]
    fn test_merge_unions_diagnostics_without_touching_source() {
        let mut first = sample_from(1, &[1.0]);
        let mut diagnostics = DiagnosticSet::new();
        diagnostics.insert("owners", serde_json::json!("a@x.org"));
        first.diagnostics = Some(diagnostics);

        let mut second = sample_from(1, &[2.0]);
        let mut diagnostics = DiagnosticSet::new();
        diagnostics.insert("bisect", serde_json::json!("done"));
        second.diagnostics = Some(diagnostics);

        let mut merged = MergedDatum::from_sample(&first);
        merged.merge(&second);

        assert_eq!(merged.diagnostics.as_ref().map(DiagnosticSet::len), Some(2));
        // The raw samples keep their own single-entry sets.
        assert_eq!(first.diagnostics.as_ref().map(DiagnosticSet::len), Some(1));
        assert_eq!(second.diagnostics.as_ref().map(DiagnosticSet::len), Some(1));
    }

    #[test]
    fn test_merge_folds_min_max() {
        let mut first = sample_from(1, &[5.0]);
        first.min = Some(2.0);
        first.max = Some(9.0);
        let mut second = sample_from(1, &[6.0]);
        second.min = Some(1.0);
        second.max = Some(7.0);

        let mut merged = MergedDatum::from_sample(&first);
        merged.merge(&second);
        assert_eq!(merged.min, Some(1.0));
        assert_eq!(merged.max, Some(9.0));
        assert_eq!(merged.statistic(Statistic::Min), 1.0);
        assert_eq!(merged.statistic(Statistic::Max), 9.0);
    }

    #[test]
    fn test_merge_keeps_first_alert() {
        let mut first = sample_from(1, &[5.0]);
        first.alert = Some(SampleAlert {
            improvement: true,
            bug_id: None,
            delta_value: -2.0,
            percent_delta_value: -0.1,
        });
        let mut second = sample_from(1, &[6.0]);
        second.alert = Some(SampleAlert {
            improvement: false,
            bug_id: Some(1),
            delta_value: 2.0,
            percent_delta_value: 0.1,
        });

        let mut merged = MergedDatum::from_sample(&first);
        merged.merge(&second);
        assert!(merged.alert.as_ref().is_some_and(|a| a.improvement));
    }
}
