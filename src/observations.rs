// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Observation table exported alongside a trace.

use crate::config::Columns;
use crate::Error;

use std::io::Read;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub x_sigma: f64,
    pub y: f64,
    pub y_sigma: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationTable {
    x_desc: String,
    y_desc: String,
    rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn load(path: &Path, columns: &Columns) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(path, file, columns)
    }

    pub fn from_reader<R: Read>(path: &Path, reader: R, columns: &Columns) -> Result<Self, Error> {
        let malformed = |reason: String| Error::MalformedObservations {
            path: path.to_owned(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| malformed(e.to_string()))?
            .clone();
        let find = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &str| find(name).ok_or_else(|| malformed(format!("missing column '{}'", name)));

        let x = required(columns.x())?;
        let y = required(columns.y())?;
        let x_sigma = columns.x_sigma().and_then(|c| find(c));
        let y_sigma = columns.y_sigma().and_then(|c| find(c));

        if let (Some(name), None) = (columns.x_sigma(), x_sigma) {
            debug!("no column '{}' in {}, assuming zero", name, path.display());
        }
        if let (Some(name), None) = (columns.y_sigma(), y_sigma) {
            debug!("no column '{}' in {}, assuming zero", name, path.display());
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| malformed(e.to_string()))?;
            let field = |index: Option<usize>| -> Result<f64, Error> {
                match index {
                    None => Ok(0.0),
                    Some(i) => {
                        let raw = record.get(i).unwrap_or("");
                        raw.parse().map_err(|_| {
                            malformed(format!("row {}: '{}' in column {} is not a number", line + 1, raw, i))
                        })
                    }
                }
            };
            rows.push(Observation {
                x: field(Some(x))?,
                x_sigma: field(x_sigma)?,
                y: field(Some(y))?,
                y_sigma: field(y_sigma)?,
            });
        }

        Ok(Self {
            x_desc: columns.x().to_owned(),
            y_desc: columns.y().to_owned(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn x_desc(&self) -> &str {
        &self.x_desc
    }

    pub fn y_desc(&self) -> &str {
        &self.y_desc
    }
}
