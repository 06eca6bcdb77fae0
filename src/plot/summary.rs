// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::*;
use crate::trace::Summary;

/// Forest plot: one row per posterior component with its mean and HDI.
pub struct SummaryChart<'a> {
    summaries: &'a [Summary],
    config: &'a PlotConfig,
}

impl<'a> SummaryChart<'a> {
    pub fn new(summaries: &'a [Summary], config: &'a PlotConfig) -> Self {
        Self { summaries, config }
    }

    /// Row position of summary `i`; the first summary is drawn on top.
    fn row(&self, i: usize) -> SegmentValue<usize> {
        SegmentValue::CenterOf(self.summaries.len() - 1 - i)
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        self.summaries.iter().fold(None, |bounds, s| {
            let bounds = extend(bounds, s.mean);
            match s.hdi {
                Some((lo, hi)) => extend(extend(bounds, lo), hi),
                None => bounds,
            }
        })
    }
}

impl<'a> Figure for SummaryChart<'a> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        root.fill(&WHITE).map_err(Error::plot)?;

        // rows are listed bottom to top
        let labels: Vec<&str> = self.summaries.iter().rev().map(|s| s.name.as_str()).collect();
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.config.caption, (FONT, CAPTION_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(20 + longest * LABEL_SIZE * 2 / 3)
            .build_cartesian_2d(
                padded(self.bounds()),
                (0..last_index(self.summaries.len())).into_segmented(),
            )
            .map_err(Error::plot)?;

        let formatter = |y: &SegmentValue<usize>| category_label(&labels, y);
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(self.summaries.len() + 1)
            .y_label_formatter(&formatter)
            .label_style((FONT, LABEL_SIZE))
            .x_desc(&self.config.x_desc)
            .y_desc(&self.config.y_desc)
            .draw()
            .map_err(Error::plot)?;

        let colour = COLOURS[0];
        let rows = || {
            self.summaries
                .iter()
                .enumerate()
                .filter(|(_, s)| s.mean.is_finite())
        };

        chart
            .draw_series(rows().filter_map(|(i, s)| {
                s.hdi.map(|(lo, hi)| {
                    PathElement::new(vec![(lo, self.row(i)), (hi, self.row(i))], colour.stroke_width(3))
                })
            }))
            .map_err(Error::plot)?;
        chart
            .draw_series(rows().map(|(i, s)| Circle::new((s.mean, self.row(i)), 5, colour.filled())))
            .map_err(Error::plot)?;

        Ok(())
    }
}
