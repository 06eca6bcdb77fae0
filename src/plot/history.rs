// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::*;
use crate::collector::Series;

/// Metric value per commit, in chronological order.
pub struct HistoryChart<'a> {
    series: &'a Series,
    config: &'a PlotConfig,
}

impl<'a> HistoryChart<'a> {
    pub fn new(series: &'a Series, config: &'a PlotConfig) -> Self {
        Self { series, config }
    }
}

impl<'a> Figure for HistoryChart<'a> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        root.fill(&WHITE).map_err(Error::plot)?;

        let labels = self.series.labels();
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.config.caption, (FONT, CAPTION_SIZE))
            .margin(20)
            .x_label_area_size(40 + longest * LABEL_SIZE / 2)
            .y_label_area_size(80)
            .build_cartesian_2d(
                (0..last_index(self.series.len())).into_segmented(),
                padded(self.series.range()),
            )
            .map_err(Error::plot)?;

        let formatter = |x: &SegmentValue<usize>| category_label(&labels, x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(self.series.len() + 1)
            .x_label_formatter(&formatter)
            .x_label_style(
                (FONT, LABEL_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_style((FONT, LABEL_SIZE))
            .x_desc(&self.config.x_desc)
            .y_desc(&self.config.y_desc)
            .draw()
            .map_err(Error::plot)?;

        if self.series.is_empty() {
            return Ok(());
        }

        let colour = COLOURS[0];
        let points: Vec<_> = self
            .series
            .iter()
            .enumerate()
            .map(|(i, point)| (SegmentValue::CenterOf(i), point.value))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().cloned(), colour.stroke_width(1)))
            .map_err(Error::plot)?;
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 4, colour.filled())),
            )
            .map_err(Error::plot)?;

        Ok(())
    }
}
