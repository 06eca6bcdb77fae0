// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use sealevel_plot::fatal;
use sealevel_plot::logger::{Level, Logger};
use sealevel_plot::*;

use std::path::Path;

fn app() -> App<'static, 'static> {
    let results = Arg::with_name("results")
        .long("results")
        .value_name("DIR")
        .help("directory of benchmark result files")
        .takes_value(true);
    let trace = Arg::with_name("trace")
        .long("trace")
        .value_name("FILE")
        .help("posterior trace (JSON)")
        .takes_value(true);
    let observations = Arg::with_name("observations")
        .long("observations")
        .value_name("FILE")
        .help("observation table (CSV)")
        .takes_value(true);

    App::new("sealevel-plot")
        .version(VERSION)
        .about("Plot benchmark history and posterior traces")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("DIR")
                .help("directory to write charts to")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("debug logging")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("history")
                .about("chart a benchmark metric across commits")
                .arg(results.clone())
                .arg(
                    Arg::with_name("suite")
                        .long("suite")
                        .value_name("NAME")
                        .help("benchmark suite prefix")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("metric")
                        .long("metric")
                        .value_name("NAME")
                        .help("metric to chart, may be repeated")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1),
                ),
        )
        .subcommand(
            SubCommand::with_name("benchmarks")
                .about("list benchmark names found in the results")
                .arg(results),
        )
        .subcommand(
            SubCommand::with_name("observations")
                .about("chart observations against the posterior")
                .arg(trace.clone())
                .arg(observations.clone()),
        )
        .subcommand(
            SubCommand::with_name("summary")
                .about("chart a posterior summary")
                .arg(trace)
                .arg(observations),
        )
}

/// Applies command line overrides on top of the file config.
fn configure(matches: &ArgMatches, sub: &ArgMatches) -> Result<Config, Error> {
    // global args may land on either side of the subcommand
    let global = |name: &str| sub.value_of(name).or_else(|| matches.value_of(name)).map(str::to_owned);

    let mut config = Config::load(global("config").as_deref().map(Path::new))?;

    if let Some(output) = global("output") {
        config.general_mut().set_output(output);
    }
    if sub.is_present("verbose") || matches.is_present("verbose") {
        config.general_mut().set_log_level(Level::Debug);
    }
    if let Some(results) = sub.value_of("results") {
        config.history_mut().set_results(results);
    }
    if let Some(suite) = sub.value_of("suite") {
        config.history_mut().set_suite(suite);
    }
    if let Some(metrics) = sub.values_of("metric") {
        config
            .history_mut()
            .set_metrics(metrics.map(str::to_owned).collect());
    }
    if let Some(trace) = sub.value_of("trace") {
        config.trace_mut().set_trace(trace);
    }
    if let Some(observations) = sub.value_of("observations") {
        config.trace_mut().set_observations(observations);
    }

    Ok(config)
}

fn run(command: &str, config: &Config) -> Result<(), Error> {
    match command {
        "history" => {
            for path in render::history(config)? {
                info!("wrote {}", path.display());
            }
        }
        "benchmarks" => {
            let names = render::benchmarks(config)?;
            info!("{} benchmarks in {}", names.len(), config.history().results().display());
            for name in names {
                println!("{}", name);
            }
        }
        "observations" => {
            let path = render::observations(config)?;
            info!("wrote {}", path.display());
        }
        "summary" => {
            let path = render::summary(config)?;
            info!("wrote {}", path.display());
        }
        other => return Err(Error::Config(format!("unknown command: {}", other))),
    }
    Ok(())
}

fn main() {
    let matches = app().get_matches();
    let (command, sub) = match matches.subcommand() {
        (command, Some(sub)) => (command, sub),
        _ => unreachable!("subcommand is required"),
    };

    // logger is not up yet, so config errors go straight to stderr
    let config = match configure(&matches, sub) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    Logger::new()
        .label("sealevel-plot")
        .level(config.general().log_level())
        .init()
        .expect("failed to initialize logger");

    info!("sealevel-plot {} initializing...", VERSION);
    config.print();

    if let Err(e) = run(command, &config) {
        fatal!("{}", e);
    }
}
