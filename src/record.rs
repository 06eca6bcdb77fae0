// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Typed view of a single benchmark result file.

use crate::Error;

use chrono::TimeZone;
use serde_derive::Deserialize;
use serde_json::Value as JsonValue;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Length of the commit hash prefix used to label a record.
pub const LABEL_LEN: usize = 6;

/// Benchmark key following the `<suite>.<metric>` convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkId {
    suite: String,
    metric: String,
}

impl BenchmarkId {
    pub fn new(suite: impl AsRef<str>, metric: impl AsRef<str>) -> Self {
        Self {
            suite: suite.as_ref().to_owned(),
            metric: metric.as_ref().to_owned(),
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn key(&self) -> String {
        format!("{}.{}", self.suite, self.metric)
    }
}

impl fmt::Display for BenchmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.suite, self.metric)
    }
}

/// When a record was taken. `asv` writes milliseconds since the epoch, older
/// tooling writes strings. Millisecond stamps sort before text stamps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Millis(ms) => match chrono::Utc.timestamp_millis_opt(*ms).single() {
                Some(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{}", ms),
            },
            Timestamp::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Text(text.to_owned())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Sample {
    Scalar(f64),
    Vector(Vec<Option<f64>>),
}

impl Sample {
    fn value(&self) -> Option<f64> {
        match self {
            Sample::Scalar(v) => Some(*v),
            Sample::Vector(values) => values.iter().flatten().next().copied(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BenchmarkResult {
    result: Option<Sample>,
}

/// One file produced by the benchmarking harness. Only the fields needed to
/// build a series are typed; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct BenchmarkRecord {
    #[serde(default)]
    date: Option<Timestamp>,
    #[serde(default)]
    results: Option<BTreeMap<String, JsonValue>>,
}

impl BenchmarkRecord {
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedRecord {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_slice(path, &bytes)
    }

    pub fn date(&self) -> Option<&Timestamp> {
        self.date.as_ref()
    }

    /// Names of all benchmarks present, including those with null results.
    pub fn benchmarks(&self) -> impl Iterator<Item = &str> {
        self.results.iter().flat_map(|r| r.keys().map(|k| k.as_str()))
    }

    /// Extracts the sample for `id`.
    ///
    /// Returns `Ok(None)` when the record has no `results`, lacks the key, or
    /// holds a null there. An explicit `"result": null` is also excluded. A
    /// present value without a usable `date`, without a `result` key, or with
    /// a `result` of unexpected shape is a `MalformedRecord`.
    pub fn sample(&self, path: &Path, id: &BenchmarkId) -> Result<Option<(Timestamp, f64)>, Error> {
        let value = match self.results.as_ref().and_then(|r| r.get(&id.key())) {
            None | Some(JsonValue::Null) => return Ok(None),
            Some(value) => value,
        };

        let malformed = |reason: String| Error::MalformedRecord {
            path: path.to_owned(),
            reason,
        };

        if value.get("result").is_none() {
            return Err(malformed(format!("{} has no result", id)));
        }
        let result: BenchmarkResult = serde_json::from_value(value.clone())
            .map_err(|e| malformed(format!("{}: {}", id, e)))?;

        let sample = match result.result.as_ref().and_then(Sample::value) {
            Some(sample) => sample,
            None => return Ok(None),
        };

        match &self.date {
            Some(date) => Ok(Some((date.clone(), sample))),
            None => Err(malformed(format!("{} present but record has no date", id))),
        }
    }
}

/// Commit label for a result file name: its first six characters, or the
/// whole name when shorter.
pub fn commit_label(file_name: &str) -> String {
    file_name.chars().take(LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> BenchmarkId {
        BenchmarkId::new("benchmarks.TimeSuite", "time_gradient")
    }

    fn parse(json: &str) -> BenchmarkRecord {
        BenchmarkRecord::from_slice(Path::new("test.json"), json.as_bytes()).unwrap()
    }

    #[test]
    fn key() {
        assert_eq!(gradient().key(), "benchmarks.TimeSuite.time_gradient");
        assert_eq!(gradient().to_string(), gradient().key());
    }

    #[test]
    fn scalar_result() {
        let record = parse(
            r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":1.2}}}"#,
        );
        let sample = record.sample(Path::new("test.json"), &gradient()).unwrap();
        assert_eq!(sample, Some((Timestamp::from("2023-01-01"), 1.2)));
    }

    #[test]
    fn asv_vector_result_and_millis() {
        let record = parse(
            r#"{"commit_hash":"abc","date":1672531200000,"params":{},
                "results":{"benchmarks.TimeSuite.time_gradient":{"result":[null,0.5,0.7],"stats":[]}}}"#,
        );
        let (date, value) = record
            .sample(Path::new("test.json"), &gradient())
            .unwrap()
            .unwrap();
        assert_eq!(date, Timestamp::Millis(1_672_531_200_000));
        assert_eq!(date.to_string(), "2023-01-01 00:00:00");
        assert_eq!(value, 0.5);
    }

    #[test]
    fn all_null_vector_is_excluded() {
        let record = parse(
            r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":[null]}}}"#,
        );
        assert_eq!(record.sample(Path::new("t"), &gradient()).unwrap(), None);
    }

    #[test]
    fn missing_results_and_null_are_excluded() {
        let machine = parse(r#"{"machine":"carbonate","version":1}"#);
        assert_eq!(machine.sample(Path::new("t"), &gradient()).unwrap(), None);

        let null = parse(
            r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":null}}"#,
        );
        assert_eq!(null.sample(Path::new("t"), &gradient()).unwrap(), None);

        let other = parse(r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_logp":{"result":1}}}"#);
        assert_eq!(other.sample(Path::new("t"), &gradient()).unwrap(), None);
    }

    #[test]
    fn other_benchmarks_do_not_poison_record() {
        let record = parse(
            r#"{"date":"2023-01-01","results":{
                "benchmarks.TimeSuite.time_gradient":{"result":2.0},
                "benchmarks.MemSuite.mem_model":{"result":{"weird":true}}}}"#,
        );
        assert!(record.sample(Path::new("t"), &gradient()).unwrap().is_some());
        assert_eq!(record.benchmarks().count(), 2);
    }

    #[test]
    fn missing_date_is_malformed() {
        let record = parse(r#"{"results":{"benchmarks.TimeSuite.time_gradient":{"result":1.0}}}"#);
        let err = record.sample(Path::new("t"), &gradient()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn bad_shape_is_malformed() {
        let record = parse(
            r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":"fast"}}}"#,
        );
        assert!(record.sample(Path::new("t"), &gradient()).is_err());
        assert!(BenchmarkRecord::from_slice(Path::new("t"), b"{\"date\":").is_err());
    }

    #[test]
    fn value_without_result_is_malformed() {
        let record = parse(
            r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"stats":[1]}}}"#,
        );
        let err = record.sample(Path::new("t"), &gradient()).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("has no result"));

        let scalar = parse(r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":3}}"#);
        assert!(scalar.sample(Path::new("t"), &gradient()).is_err());
    }

    #[test]
    fn explicit_null_result_is_excluded() {
        let record = parse(
            r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":null}}}"#,
        );
        assert_eq!(record.sample(Path::new("t"), &gradient()).unwrap(), None);
    }

    #[test]
    fn labels() {
        assert_eq!(commit_label("abc123.json"), "abc123");
        assert_eq!(commit_label("abc123"), "abc123");
        assert_eq!(commit_label("ab.j"), "ab.j");
    }

    #[test]
    fn millis_sort_before_text() {
        assert!(Timestamp::Millis(i64::MAX) < Timestamp::from("0"));
        assert!(Timestamp::from("2022-12-01") < Timestamp::from("2023-01-01"));
    }
}
