// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logger::{parse_level, Level};
use crate::plot::Format;
use crate::record::BenchmarkId;
use crate::Error;

use serde_derive::*;

use std::path::{Path, PathBuf};

fn default_output() -> PathBuf {
    PathBuf::from("plots")
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    500
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_results() -> PathBuf {
    PathBuf::from(".asv/results/carbonate")
}

fn default_suite() -> String {
    "benchmarks.TimeSuite".to_owned()
}

fn default_metrics() -> Vec<String> {
    vec!["time_gradient".to_owned()]
}

fn default_history_x_desc() -> String {
    "Commit hash".to_owned()
}

fn default_history_y_desc() -> String {
    "Time (seconds)".to_owned()
}

fn default_trace() -> PathBuf {
    PathBuf::from("examples/example.json")
}

fn default_observations() -> PathBuf {
    PathBuf::from("data/example.csv")
}

fn default_hdi_prob() -> f64 {
    crate::trace::DEFAULT_HDI_PROB
}

fn default_prediction() -> String {
    "y_pred".to_owned()
}

fn default_x() -> String {
    "age".to_owned()
}

fn default_x_sigma() -> Option<String> {
    Some("age_sigma".to_owned())
}

fn default_y() -> String {
    "elevation".to_owned()
}

fn default_y_sigma() -> Option<String> {
    Some("elevation_sigma".to_owned())
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    history: History,
    #[serde(default)]
    trace: Trace,
}

impl Config {
    /// Loads the TOML file at `path`, or the defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                Self::from_str(&content)?
            }
        };
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if parse_level(&self.general.log_level).is_none() {
            return Err(Error::Config(format!(
                "unknown log level: {}",
                self.general.log_level
            )));
        }
        if self.general.width == 0 || self.general.height == 0 {
            return Err(Error::Config("chart size must be non-zero".to_owned()));
        }
        if !(self.trace.hdi_prob > 0.0 && self.trace.hdi_prob <= 1.0) {
            return Err(Error::Config(format!(
                "hdi_prob must be in (0, 1], got {}",
                self.trace.hdi_prob
            )));
        }
        Ok(())
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn general_mut(&mut self) -> &mut General {
        &mut self.general
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut Trace {
        &mut self.trace
    }

    pub fn print(&self) {
        info!("-----");
        info!("Config:");
        info!(
            "Config: Output: {} Format: {:?} Size: {}x{}",
            self.general.output.display(),
            self.general.format,
            self.general.width,
            self.general.height
        );
        info!(
            "Config: Results: {} Suite: {} Metrics: {}",
            self.history.results.display(),
            self.history.suite,
            self.history.metrics.join(", ")
        );
        info!(
            "Config: Trace: {} Observations: {} HDI: {}",
            self.trace.trace.display(),
            self.trace.observations.display(),
            self.trace.hdi_prob
        );
        info!("-----");
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "default_output")]
    output: PathBuf,
    #[serde(default)]
    format: Format,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: Format::default(),
            width: default_width(),
            height: default_height(),
            log_level: default_log_level(),
        }
    }
}

impl General {
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn set_output(&mut self, output: impl Into<PathBuf>) {
        self.output = output.into();
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn log_level(&self) -> Level {
        parse_level(&self.log_level).unwrap_or(Level::Info)
    }

    pub fn set_log_level(&mut self, level: Level) {
        self.log_level = level.to_string();
    }

    /// Output file for a chart called `name`.
    pub fn chart_path(&self, name: &str) -> PathBuf {
        self.output
            .join(format!("{}.{}", name, self.format.extension()))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct History {
    #[serde(default = "default_results")]
    results: PathBuf,
    #[serde(default = "default_suite")]
    suite: String,
    #[serde(default = "default_metrics")]
    metrics: Vec<String>,
    title: Option<String>,
    #[serde(default = "default_history_x_desc")]
    x_desc: String,
    #[serde(default = "default_history_y_desc")]
    y_desc: String,
}

impl Default for History {
    fn default() -> Self {
        Self {
            results: default_results(),
            suite: default_suite(),
            metrics: default_metrics(),
            title: None,
            x_desc: default_history_x_desc(),
            y_desc: default_history_y_desc(),
        }
    }
}

impl History {
    pub fn results(&self) -> &Path {
        &self.results
    }

    pub fn set_results(&mut self, results: impl Into<PathBuf>) {
        self.results = results.into();
    }

    pub fn set_suite(&mut self, suite: impl Into<String>) {
        self.suite = suite.into();
    }

    pub fn set_metrics(&mut self, metrics: Vec<String>) {
        self.metrics = metrics;
    }

    pub fn benchmarks(&self) -> Vec<BenchmarkId> {
        self.metrics
            .iter()
            .map(|m| BenchmarkId::new(&self.suite, m))
            .collect()
    }

    /// Chart caption for `id`; a configured title is suffixed with the
    /// metric when several metrics are rendered.
    pub fn caption(&self, id: &BenchmarkId) -> String {
        match &self.title {
            Some(title) if self.metrics.len() > 1 => format!("{} - {}", title, id.metric()),
            Some(title) => title.clone(),
            None => id.metric().to_owned(),
        }
    }

    pub fn x_desc(&self) -> &str {
        &self.x_desc
    }

    pub fn y_desc(&self) -> &str {
        &self.y_desc
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trace {
    #[serde(default = "default_trace")]
    trace: PathBuf,
    #[serde(default = "default_observations")]
    observations: PathBuf,
    #[serde(default = "default_hdi_prob")]
    hdi_prob: f64,
    #[serde(default = "default_prediction")]
    prediction: String,
    #[serde(default)]
    columns: Columns,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            trace: default_trace(),
            observations: default_observations(),
            hdi_prob: default_hdi_prob(),
            prediction: default_prediction(),
            columns: Columns::default(),
        }
    }
}

impl Trace {
    pub fn trace(&self) -> &Path {
        &self.trace
    }

    pub fn set_trace(&mut self, trace: impl Into<PathBuf>) {
        self.trace = trace.into();
    }

    pub fn observations(&self) -> &Path {
        &self.observations
    }

    pub fn set_observations(&mut self, observations: impl Into<PathBuf>) {
        self.observations = observations.into();
    }

    pub fn hdi_prob(&self) -> f64 {
        self.hdi_prob
    }

    pub fn prediction(&self) -> &str {
        &self.prediction
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }
}

/// Names of the observation table columns.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Columns {
    #[serde(default = "default_x")]
    x: String,
    #[serde(default = "default_x_sigma")]
    x_sigma: Option<String>,
    #[serde(default = "default_y")]
    y: String,
    #[serde(default = "default_y_sigma")]
    y_sigma: Option<String>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            x: default_x(),
            x_sigma: default_x_sigma(),
            y: default_y(),
            y_sigma: default_y_sigma(),
        }
    }
}

impl Columns {
    pub fn x(&self) -> &str {
        &self.x
    }

    pub fn x_sigma(&self) -> Option<&str> {
        self.x_sigma.as_deref()
    }

    pub fn y(&self) -> &str {
        &self.y
    }

    pub fn y_sigma(&self) -> Option<&str> {
        self.y_sigma.as_deref()
    }
}
