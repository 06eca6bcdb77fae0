// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sealevel_plot::*;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TRACE: &str = r#"{
    "posterior": {
        "sea_level": [[[1.0, 2.0], [1.5, 2.5], [1.2, 2.2]], [[1.1, 2.1], [1.4, 2.4], [1.3, 2.3]]],
        "sigma": [[0.1, 0.2, 0.3], [0.2, 0.1, 0.3]]
    },
    "posterior_predictive": {
        "y_pred": [[[5.0, -1.0], [6.0, -2.0], [5.5, -1.5]], [[5.2, -1.2], [5.8, -1.8], [5.4, -1.4]]]
    }
}"#;

const OBSERVATIONS: &str = "age,age_sigma,elevation,elevation_sigma\n125,2,5.5,1\n8,0.5,-1.5,0.3\n";

fn config(dir: &Path, results: &Path) -> Config {
    let trace = dir.join("trace.json");
    let observations = dir.join("observations.csv");
    fs::write(&trace, TRACE).unwrap();
    fs::write(&observations, OBSERVATIONS).unwrap();

    Config::from_str(&format!(
        r#"
        [general]
        output = "{}"
        format = "svg"
        width = 640
        height = 480

        [history]
        results = "{}"
        metrics = ["time_gradient", "time_logp"]

        [trace]
        trace = "{}"
        observations = "{}"
        "#,
        dir.join("plots").display(),
        results.display(),
        trace.display(),
        observations.display(),
    ))
    .unwrap()
}

/// Rendering measures text, which needs a system font. Hosts without one
/// report a font error; any other failure must fail the test.
fn rendered(result: Result<PathBuf, Error>, expected: &Path) {
    match result {
        Ok(path) => {
            assert_eq!(path, expected);
            assert!(path.exists());
        }
        Err(Error::Plot(reason)) if reason.to_lowercase().contains("font") => {
            eprintln!("no usable font, skipping render check: {}", reason)
        }
        Err(e) => panic!("unexpected error: {}", e),
    }
}

#[test]
fn history_charts() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results");
    fs::create_dir(&results).unwrap();
    fs::write(
        results.join("abc123.json"),
        r#"{"date":"2023-01-01","results":{"benchmarks.TimeSuite.time_gradient":{"result":1.2}}}"#,
    )
    .unwrap();
    let config = config(dir.path(), &results);

    let ids = config.history().benchmarks();
    rendered(
        render::history_chart(&config, &ids[0]),
        &dir.path().join("plots/time_gradient.svg"),
    );
    // no time_logp results at all: still an (empty) chart
    rendered(
        render::history_chart(&config, &ids[1]),
        &dir.path().join("plots/time_logp.svg"),
    );
}

#[test]
fn history_without_results_dir() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), &dir.path().join("missing"));
    assert!(matches!(render::history(&config), Err(Error::NotFound { .. })));
    assert!(matches!(render::benchmarks(&config), Err(Error::NotFound { .. })));
}

#[test]
fn trace_charts() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), dir.path());

    rendered(
        render::observations(&config),
        &dir.path().join("plots/observations.svg"),
    );
    rendered(render::summary(&config), &dir.path().join("plots/summary.svg"));
}

#[test]
fn missing_trace_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path(), dir.path());
    config.trace_mut().set_trace(dir.path().join("nope.json"));
    assert!(matches!(render::summary(&config), Err(Error::NotFound { .. })));
    assert!(matches!(render::observations(&config), Err(Error::NotFound { .. })));
}

#[test]
fn loaded_inputs() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), dir.path());

    let trace = InferenceTrace::load(config.trace().trace()).unwrap();
    let table = ObservationTable::load(config.trace().observations(), config.trace().columns()).unwrap();
    let prediction = trace.prediction(config.trace().prediction()).unwrap();
    assert_eq!(prediction.components(), table.len());

    let summaries = Summary::all(trace.posterior(), config.trace().hdi_prob());
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sea_level[0]", "sea_level[1]", "sigma"]);
    assert!((summaries[0].mean - 1.25).abs() < 1e-9);
}
