// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Chart rendering. Every figure draws onto a drawing area it is handed;
//! nothing here keeps global figure state.

mod history;
mod observations;
mod summary;

pub use self::history::HistoryChart;
pub use self::observations::ObservationChart;
pub use self::summary::SummaryChart;

use crate::Error;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde_derive::Deserialize;

use std::ops::Range;
use std::path::Path;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

pub(crate) const COLOURS: &[RGBColor] = &[
    hexcolour!(0x332288),
    hexcolour!(0xAA0000),
    hexcolour!(0x117733),
    hexcolour!(0x888888),
    hexcolour!(0xDDCC77),
    hexcolour!(0x88CCEE),
];

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const CAPTION_SIZE: u32 = 30;
pub(crate) const LABEL_SIZE: u32 = 15;

/// Output file format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Png,
    Svg,
}

impl Default for Format {
    fn default() -> Self {
        Format::Png
    }
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Svg => "svg",
        }
    }
}

/// Caller supplied chart text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotConfig {
    caption: String,
    x_desc: String,
    y_desc: String,
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }
}

/// Something that can be drawn onto a drawing area.
pub trait Figure {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error>;
}

/// Renders `figure` into a new file at `path`.
pub fn save<F: Figure>(figure: &F, path: &Path, format: Format, size: (u32, u32)) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    match format {
        Format::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(Error::plot)?;
        }
        Format::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(Error::plot)?;
        }
    }

    debug!("wrote {}", path.display());
    Ok(())
}

/// Axis range around `[min, max]` with a tenth of headroom either side. A
/// degenerate range is widened so the axis stays drawable.
pub(crate) fn padded(bounds: Option<(f64, f64)>) -> Range<f64> {
    match bounds {
        Some((min, max)) if min.is_finite() && max.is_finite() => {
            let pad = if max > min {
                (max - min) * 0.1
            } else if min != 0.0 {
                min.abs() * 0.1
            } else {
                1.0
            };
            (min - pad)..(max + pad)
        }
        _ => 0.0..1.0,
    }
}

/// Widens `bounds` to include `value`, ignoring non-finite values.
pub(crate) fn extend(bounds: Option<(f64, f64)>, value: f64) -> Option<(f64, f64)> {
    if !value.is_finite() {
        return bounds;
    }
    match bounds {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    }
}

/// Last segment index for a categorical axis of `n` entries.
pub(crate) fn last_index(n: usize) -> usize {
    n.max(1) - 1
}

/// Label for a categorical axis position.
pub(crate) fn category_label<S: AsRef<str>>(labels: &[S], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
            .get(*i)
            .map(|l| l.as_ref().to_owned())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}
