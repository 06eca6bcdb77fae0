// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sealevel_plot::*;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn gradient() -> BenchmarkId {
    BenchmarkId::new("benchmarks.TimeSuite", "time_gradient")
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn record(date: &str, value: Option<f64>) -> String {
    let value = match value {
        Some(v) => format!("{{\"result\":{}}}", v),
        None => "null".to_owned(),
    };
    format!(
        "{{\"date\":\"{}\",\"results\":{{\"benchmarks.TimeSuite.time_gradient\":{}}}}}",
        date, value
    )
}

fn triples(series: &Series) -> Vec<(String, String, f64)> {
    series
        .iter()
        .map(|p| (p.label.clone(), p.timestamp.to_string(), p.value))
        .collect()
}

#[test]
fn end_to_end() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "abc123.json",
        r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":1.2}}}"#,
    );
    write(
        dir.path(),
        "def456.json",
        r#"{"date":"2022-06-01","results":{"benchmarks.TimeSuite.time_gradient":null}}"#,
    );
    write(
        dir.path(),
        "ghi789.json",
        r#"{"date":"2022-12-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":0.9}}}"#,
    );

    let series = ResultCollector::new(dir.path()).collect(&gradient()).unwrap();
    assert_eq!(
        triples(&series),
        vec![
            ("ghi789".to_owned(), "2022-12-01".to_owned(), 0.9),
            ("abc123".to_owned(), "2023-01-01".to_owned(), 1.2),
        ]
    );
}

#[test]
fn counts_only_non_null_values() {
    let dir = TempDir::new().unwrap();
    let mut expected = 0;
    for i in 0..20 {
        let value = if i % 3 == 0 {
            None
        } else {
            expected += 1;
            Some(i as f64)
        };
        write(
            dir.path(),
            &format!("{:06x}ffff.json", i),
            &record(&format!("2022-01-{:02}", i + 1), value),
        );
    }
    // the machine description lives alongside the results
    write(dir.path(), "machine.json", r#"{"machine":"carbonate","version":1}"#);

    let series = ResultCollector::new(dir.path()).collect(&gradient()).unwrap();
    assert_eq!(series.len(), expected);
}

#[test]
fn reverse_and_duplicate_dates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "aaaaaa.json", &record("2022-03-01", Some(3.0)));
    write(dir.path(), "bbbbbb.json", &record("2022-02-01", Some(2.0)));
    write(dir.path(), "cccccc.json", &record("2022-02-01", Some(2.5)));
    write(dir.path(), "dddddd.json", &record("2022-01-01", Some(1.0)));

    let series = ResultCollector::new(dir.path()).collect(&gradient()).unwrap();
    assert_eq!(series.labels(), vec!["dddddd", "bbbbbb", "cccccc", "aaaaaa"]);
    assert_eq!(series.values(), vec![1.0, 2.0, 2.5, 3.0]);

    // collecting again gives the same series
    let again = ResultCollector::new(dir.path()).collect(&gradient()).unwrap();
    assert_eq!(series, again);
}

#[test]
fn malformed_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "abc123.json", &record("2023-01-01", Some(1.0)));
    write(dir.path(), "crash1.json", r#"{"date":"2023-01-02","results":{"#);
    write(
        dir.path(),
        "nodate.json",
        r#"{"results":{"benchmarks.TimeSuite.time_gradient":{"result":5.0}}}"#,
    );
    write(
        dir.path(),
        "nores1.json",
        r#"{"date":"2023-01-04","results":{"benchmarks.TimeSuite.time_gradient":{"stats":[1]}}}"#,
    );
    write(dir.path(), "notes.txt", "not json at all");
    fs::create_dir(dir.path().join("nested")).unwrap();
    write(&dir.path().join("nested"), "zzzzzz.json", &record("2023-01-03", Some(9.0)));

    let series = ResultCollector::new(dir.path()).collect(&gradient()).unwrap();
    assert_eq!(series.labels(), vec!["abc123"]);
}

#[test]
fn empty_directory_is_empty_series() {
    let dir = TempDir::new().unwrap();
    let series = ResultCollector::new(dir.path()).collect(&gradient()).unwrap();
    assert!(series.is_empty());
}

#[test]
fn missing_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("results");
    match ResultCollector::new(&missing).collect(&gradient()) {
        Err(Error::NotFound { path }) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn asv_format() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "1f2e3d4c-conda-py3.9.json",
        r#"{"commit_hash":"1f2e3d4c","date":1672617600000,"env_name":"conda-py3.9","version":2,
            "results":{"benchmarks.TimeSuite.time_gradient":{"result":[0.42],"stats":[null]},
                       "benchmarks.TimeSuite.time_logp":null}}"#,
    );

    let collector = ResultCollector::new(dir.path());
    let series = collector.collect(&gradient()).unwrap();
    assert_eq!(
        triples(&series),
        vec![("1f2e3d".to_owned(), "2023-01-02 00:00:00".to_owned(), 0.42)]
    );

    let names: Vec<String> = collector.benchmarks().unwrap().into_iter().collect();
    assert_eq!(
        names,
        vec![
            "benchmarks.TimeSuite.time_gradient".to_owned(),
            "benchmarks.TimeSuite.time_logp".to_owned(),
        ]
    );
}
