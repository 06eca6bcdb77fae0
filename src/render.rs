// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Load inputs named by the config, hand them to a figure and write it out.

use crate::collector::ResultCollector;
use crate::config::Config;
use crate::observations::ObservationTable;
use crate::plot::{self, HistoryChart, ObservationChart, PlotConfig, SummaryChart};
use crate::record::BenchmarkId;
use crate::trace::{InferenceTrace, Summary};
use crate::Error;

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Renders one chronological chart for `id`.
pub fn history_chart(config: &Config, id: &BenchmarkId) -> Result<PathBuf, Error> {
    let history = config.history();
    let series = ResultCollector::new(history.results()).collect(id)?;

    if series.is_empty() {
        warn!("{}: no results in {}", id, history.results().display());
    } else {
        info!("{}: {} results", id, series.len());
        for point in &series {
            debug!("{} {} {}", point.label, point.timestamp, point.value);
        }
    }

    let mut style = PlotConfig::new();
    style
        .caption(history.caption(id))
        .x_desc(history.x_desc())
        .y_desc(history.y_desc());

    let general = config.general();
    let path = general.chart_path(id.metric());
    plot::save(
        &HistoryChart::new(&series, &style),
        &path,
        general.format(),
        general.size(),
    )?;
    Ok(path)
}

/// Renders a chart per configured metric.
pub fn history(config: &Config) -> Result<Vec<PathBuf>, Error> {
    config
        .history()
        .benchmarks()
        .iter()
        .map(|id| history_chart(config, id))
        .collect()
}

pub fn benchmarks(config: &Config) -> Result<BTreeSet<String>, Error> {
    ResultCollector::new(config.history().results()).benchmarks()
}

fn load_inputs(config: &Config) -> Result<(InferenceTrace, ObservationTable), Error> {
    let trace = config.trace();
    let inference = InferenceTrace::load(trace.trace())?;
    let table = ObservationTable::load(trace.observations(), trace.columns())?;
    info!(
        "loaded trace {} ({} posterior variables) and {} observations",
        trace.trace().display(),
        inference.posterior().len(),
        table.len()
    );
    Ok((inference, table))
}

pub fn observations(config: &Config) -> Result<PathBuf, Error> {
    let (inference, table) = load_inputs(config)?;
    let trace = config.trace();

    let mut style = PlotConfig::new();
    style
        .caption("Observations")
        .x_desc(table.x_desc())
        .y_desc(table.y_desc());

    let mut chart = ObservationChart::new(&table, &style);
    match inference.prediction(trace.prediction()) {
        Some(variable) => {
            if let Err(e) = chart.prediction(variable, trace.hdi_prob()) {
                warn!("not overlaying prediction: {}", e);
            }
        }
        None => warn!(
            "trace has no '{}' variable, drawing observations only",
            trace.prediction()
        ),
    }

    let general = config.general();
    let path = general.chart_path("observations");
    plot::save(&chart, &path, general.format(), general.size())?;
    Ok(path)
}

pub fn summary(config: &Config) -> Result<PathBuf, Error> {
    let (inference, table) = load_inputs(config)?;
    let hdi_prob = config.trace().hdi_prob();

    let summaries = Summary::all(inference.posterior(), hdi_prob);
    print_summaries(&summaries, hdi_prob);

    let mut style = PlotConfig::new();
    style
        .caption(format!(
            "Posterior summary ({} observations, {:.0}% HDI)",
            table.len(),
            hdi_prob * 100.0
        ))
        .x_desc("Value");

    let general = config.general();
    let path = general.chart_path("summary");
    plot::save(
        &SummaryChart::new(&summaries, &style),
        &path,
        general.format(),
        general.size(),
    )?;
    Ok(path)
}

fn print_summaries(summaries: &[Summary], hdi_prob: f64) {
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0).max(8);
    let lo = format!("hdi_{:.0}%", (1.0 - hdi_prob) / 2.0 * 100.0);
    let hi = format!("hdi_{:.0}%", (1.0 + hdi_prob) / 2.0 * 100.0);
    info!("-----");
    info!(
        "{:<width$} {:>10} {:>10} {:>10} {:>10} {:>6}",
        "variable",
        "mean",
        "sd",
        lo,
        hi,
        "r_hat",
        width = width
    );
    for s in summaries {
        let (lo, hi) = s.hdi.unwrap_or((f64::NAN, f64::NAN));
        info!(
            "{:<width$} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>6.2}",
            s.name,
            s.mean,
            s.sd,
            lo,
            hi,
            s.rhat,
            width = width
        );
    }
    info!("-----");
}
