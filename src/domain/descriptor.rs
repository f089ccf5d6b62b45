// Line and fetch descriptor domain models
use serde::{Deserialize, Serialize};

/// Which aggregate of a merged datum is plotted as the y value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Avg,
    Count,
    Min,
    Max,
    Std,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Avg => "avg",
            Statistic::Count => "count",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Std => "std",
        }
    }
}

/// "test" is primary data, "ref" is the baseline control series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "ref")]
    Reference,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Test => "test",
            BuildType::Reference => "ref",
        }
    }
}

/// Coarseness flag controlling whether annotation icons are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelOfDetail {
    Xy,
    Annotations,
}

/// Identity key for one logical chart line.
///
/// The array fields select the dimensions this line aggregates over, so two
/// descriptors are equal iff every field matches with set semantics on the
/// arrays (element order does not matter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDescriptor {
    pub test_suites: Vec<String>,
    pub measurement: String,
    pub bots: Vec<String>,
    pub test_cases: Vec<String>,
    pub statistic: Statistic,
    pub build_type: BuildType,
}

fn array_set_equal(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|e| b.contains(e))
}

impl PartialEq for LineDescriptor {
    fn eq(&self, other: &Self) -> bool {
        array_set_equal(&self.test_suites, &other.test_suites)
            && array_set_equal(&self.bots, &other.bots)
            && array_set_equal(&self.test_cases, &other.test_cases)
            && self.measurement == other.measurement
            && self.statistic == other.statistic
            && self.build_type == other.build_type
    }
}

impl Eq for LineDescriptor {}

impl LineDescriptor {
    fn key(&self, build_type: Option<BuildType>) -> String {
        let sorted = |field: &[String]| {
            let mut values = field.to_vec();
            values.sort();
            values
        };
        serde_json::Value::from(vec![
            serde_json::Value::from(sorted(&self.test_suites)),
            serde_json::Value::from(self.measurement.as_str()),
            serde_json::Value::from(sorted(&self.bots)),
            serde_json::Value::from(sorted(&self.test_cases)),
            serde_json::Value::from(self.statistic.as_str()),
            match build_type {
                Some(build_type) => serde_json::Value::from(build_type.as_str()),
                None => serde_json::Value::Null,
            },
        ])
        .to_string()
    }

    /// Canonical order-independent string form, usable as a cache key.
    pub fn cache_key(&self) -> String {
        self.key(Some(self.build_type))
    }

    /// Cache key with the build type stripped, so a reference line can be
    /// paired with its test-build counterpart.
    pub fn color_key(&self) -> String {
        self.key(None)
    }

    /// Expand to one fully resolved single-series query per
    /// test suite x bot x test case combination.
    pub fn fetch_descriptors(&self, level_of_detail: LevelOfDetail) -> Vec<FetchDescriptor> {
        let test_cases: Vec<Option<String>> = if self.test_cases.is_empty() {
            vec![None]
        } else {
            self.test_cases.iter().cloned().map(Some).collect()
        };

        let mut fetches = Vec::new();
        for test_suite in &self.test_suites {
            for bot in &self.bots {
                for test_case in &test_cases {
                    fetches.push(FetchDescriptor {
                        test_suite: test_suite.clone(),
                        bot: bot.clone(),
                        measurement: self.measurement.clone(),
                        test_case: test_case.clone(),
                        statistic: self.statistic,
                        build_type: self.build_type,
                        level_of_detail,
                    });
                }
            }
        }
        fetches
    }
}

/// Fully resolved single-physical-series query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchDescriptor {
    pub test_suite: String,
    pub bot: String,
    pub measurement: String,
    pub test_case: Option<String>,
    pub statistic: Statistic,
    pub build_type: BuildType,
    pub level_of_detail: LevelOfDetail,
}
