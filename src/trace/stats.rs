// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::Variable;

use std::cmp::Ordering;

pub const DEFAULT_HDI_PROB: f64 = 0.94;

fn finite(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

pub fn mean(data: &[f64]) -> f64 {
    let data = finite(data);
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance with one degree of freedom removed.
pub fn variance(data: &[f64]) -> f64 {
    let data = finite(data);
    if data.len() < 2 {
        return f64::NAN;
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Narrowest interval containing `prob` of the draws.
pub fn hdi(data: &[f64], prob: f64) -> Option<(f64, f64)> {
    let mut sorted = finite(data);
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    let included = ((prob * n as f64).floor() as usize).min(n - 1);
    let intervals = n - included;

    let (start, _) = (0..intervals)
        .map(|i| (i, sorted[i + included] - sorted[i]))
        .fold((0, f64::INFINITY), |best, (i, width)| {
            if width < best.1 {
                (i, width)
            } else {
                best
            }
        });

    Some((sorted[start], sorted[start + included]))
}

/// Classic split R-hat. Each chain is cut in half (the middle draw of an odd
/// chain is dropped) and the halves are compared as separate chains.
pub fn split_rhat(chains: &[Vec<f64>]) -> f64 {
    let half = chains.iter().map(|c| c.len() / 2).min().unwrap_or(0);
    if half < 2 {
        return f64::NAN;
    }

    let mut splits = Vec::with_capacity(chains.len() * 2);
    for chain in chains {
        splits.push(&chain[..half]);
        splits.push(&chain[chain.len() - half..]);
    }

    let n = half as f64;
    let means: Vec<f64> = splits.iter().map(|s| mean(s)).collect();
    let within = mean(&splits.iter().map(|s| variance(s)).collect::<Vec<_>>());
    let between = n * variance(&means);

    if !(within > 0.0) {
        return f64::NAN;
    }

    let var_hat = (n - 1.0) / n * within + between / n;
    (var_hat / within).sqrt()
}

/// Per-component summary of a trace variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub name: String,
    pub mean: f64,
    pub sd: f64,
    pub hdi: Option<(f64, f64)>,
    pub rhat: f64,
}

impl Summary {
    pub fn of(variable: &Variable, component: usize, hdi_prob: f64) -> Self {
        let chains = variable.chain_draws(component);
        let pooled: Vec<f64> = chains.iter().flatten().copied().collect();
        Self {
            name: variable.component_name(component),
            mean: mean(&pooled),
            sd: sd(&pooled),
            hdi: hdi(&pooled, hdi_prob),
            rhat: split_rhat(&chains),
        }
    }

    /// One summary per scalar component of every variable, in order.
    pub fn all(variables: &[Variable], hdi_prob: f64) -> Vec<Summary> {
        variables
            .iter()
            .flat_map(|v| (0..v.components()).map(move |c| Summary::of(v, c, hdi_prob)))
            .collect()
    }
}
