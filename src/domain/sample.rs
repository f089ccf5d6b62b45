// Raw sample domain models
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Monotonic commit position on the x axis.
pub type Revision = u64;

/// Diagnostic payloads attached to a sample, keyed by diagnostic name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticSet(BTreeMap<String, serde_json::Value>);

impl DiagnosticSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.0.insert(name.into(), value);
    }

    /// Union with another set. Existing entries win on name collisions.
    pub fn merge_from(&mut self, other: &DiagnosticSet) {
        for (name, value) in &other.0 {
            self.0.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, serde_json::Value)> for DiagnosticSet {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Regression or improvement alert raised against a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleAlert {
    pub improvement: bool,
    pub bug_id: Option<u64>,
    pub delta_value: f64,
    pub percent_delta_value: f64,
}

impl SampleAlert {
    pub fn triaged(&self) -> bool {
        self.bug_id.is_some()
    }
}

/// One raw datum from a backend series.
///
/// Within one series, samples are sorted ascending by `revision`,
/// `count >= 1` and `std >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
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

impl Sample {
    /// A single-measurement sample with no annotations.
    pub fn point(revision: Revision, timestamp: DateTime<Utc>, avg: f64) -> Self {
        Self {
            revision,
            timestamp,
            count: 1,
            avg,
            std: 0.0,
            min: None,
            max: None,
            diagnostics: None,
            alert: None,
        }
    }
}

/// One physical series as fetched from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeseries {
    pub unit: String,
    pub samples: Vec<Sample>,
}

impl Timeseries {
    pub fn new(unit: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            unit: unit.into(),
            samples,
        }
    }
}

/// Clipping window over revisions and upload timestamps.
/// Any absent bound means unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    pub min_revision: Option<Revision>,
    pub max_revision: Option<Revision>,
    pub min_timestamp: Option<DateTime<Utc>>,
    pub max_timestamp: Option<DateTime<Utc>>,
}

impl Range {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn revisions(min: Option<Revision>, max: Option<Revision>) -> Self {
        Self {
            min_revision: min,
            max_revision: max,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_set_union_keeps_existing() {
        let mut a = DiagnosticSet::new();
        a.insert("owners", serde_json::json!(["a@x.org"]));
        let mut b = DiagnosticSet::new();
        b.insert("owners", serde_json::json!(["b@x.org"]));
        b.insert("bisect", serde_json::json!("started"));

        a.merge_from(&b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.names().collect::<Vec<_>>(), vec!["bisect", "owners"]);
    }

    #[test]
    fn test_alert_triaged() {
        let alert = SampleAlert {
            improvement: false,
            bug_id: Some(4242),
            delta_value: 1.5,
            percent_delta_value: 0.1,
        };
        assert!(alert.triaged());
    }
}
