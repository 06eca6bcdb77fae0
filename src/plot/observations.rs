// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::*;
use crate::observations::ObservationTable;
use crate::trace::{Summary, Variable};

/// Observations with their uncertainties, optionally overlaid with the
/// posterior estimate for each observation.
pub struct ObservationChart<'a> {
    table: &'a ObservationTable,
    prediction: Option<Vec<Summary>>,
    prediction_label: String,
    config: &'a PlotConfig,
}

impl<'a> ObservationChart<'a> {
    pub fn new(table: &'a ObservationTable, config: &'a PlotConfig) -> Self {
        Self {
            table,
            prediction: None,
            prediction_label: String::new(),
            config,
        }
    }

    /// Overlays `variable`, which must have one component per observation.
    pub fn prediction(&mut self, variable: &Variable, hdi_prob: f64) -> Result<&mut Self, Error> {
        if variable.components() != self.table.len() {
            return Err(Error::Plot(format!(
                "{} has {} components but there are {} observations",
                variable.name(),
                variable.components(),
                self.table.len()
            )));
        }
        self.prediction = Some(
            (0..variable.components())
                .map(|c| Summary::of(variable, c, hdi_prob))
                .collect(),
        );
        self.prediction_label = format!("{} ({:.0}% HDI)", variable.name(), hdi_prob * 100.0);
        Ok(self)
    }

    pub fn has_prediction(&self) -> bool {
        self.prediction.is_some()
    }

    fn bounds(&self) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
        let mut x = None;
        let mut y = None;
        for row in self.table.rows() {
            x = extend(extend(x, row.x - row.x_sigma), row.x + row.x_sigma);
            y = extend(extend(y, row.y - row.y_sigma), row.y + row.y_sigma);
        }
        for summary in self.prediction.iter().flatten() {
            y = extend(y, summary.mean);
            if let Some((lo, hi)) = summary.hdi {
                y = extend(extend(y, lo), hi);
            }
        }
        (x, y)
    }
}

impl<'a> Figure for ObservationChart<'a> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        root.fill(&WHITE).map_err(Error::plot)?;

        let (x_bounds, y_bounds) = self.bounds();

        let mut chart = ChartBuilder::on(root)
            .caption(&self.config.caption, (FONT, CAPTION_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(padded(x_bounds), padded(y_bounds))
            .map_err(Error::plot)?;

        chart
            .configure_mesh()
            .label_style((FONT, LABEL_SIZE))
            .x_desc(&self.config.x_desc)
            .y_desc(&self.config.y_desc)
            .draw()
            .map_err(Error::plot)?;

        let observed = COLOURS[0];
        let rows = self.table.rows();

        chart
            .draw_series(rows.iter().map(|r| {
                ErrorBar::new_horizontal(r.y, r.x - r.x_sigma, r.x, r.x + r.x_sigma, observed, 6)
            }))
            .map_err(Error::plot)?;
        chart
            .draw_series(rows.iter().map(|r| {
                ErrorBar::new_vertical(r.x, r.y - r.y_sigma, r.y, r.y + r.y_sigma, observed, 6)
            }))
            .map_err(Error::plot)?;
        chart
            .draw_series(
                rows.iter()
                    .map(|r| Circle::new((r.x, r.y), 4, observed.filled())),
            )
            .map_err(Error::plot)?
            .label("observations")
            .legend(move |(x, y)| Circle::new((x, y), 4, observed.filled()));

        if let Some(prediction) = &self.prediction {
            let estimate = COLOURS[1];
            let pairs = || {
                rows.iter()
                    .zip(prediction.iter())
                    .filter(|(_, s)| s.mean.is_finite())
            };

            chart
                .draw_series(pairs().filter_map(|(r, s)| {
                    s.hdi
                        .map(|(lo, hi)| ErrorBar::new_vertical(r.x, lo, s.mean, hi, estimate, 6))
                }))
                .map_err(Error::plot)?;
            chart
                .draw_series(
                    pairs().map(|(r, s)| TriangleMarker::new((r.x, s.mean), 5, estimate.filled())),
                )
                .map_err(Error::plot)?
                .label(self.prediction_label.as_str())
                .legend(move |(x, y)| TriangleMarker::new((x, y), 5, estimate.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, LABEL_SIZE))
            .draw()
            .map_err(Error::plot)?;

        Ok(())
    }
}
