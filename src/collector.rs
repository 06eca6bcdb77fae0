// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::record::{commit_label, BenchmarkId, BenchmarkRecord, Timestamp};
use crate::Error;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One point of a chronological series.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub label: String,
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Points ordered by ascending timestamp.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    /// Builds a series from unordered points. The sort is stable so points
    /// sharing a timestamp keep their relative order.
    pub fn from_points(mut points: Vec<Point>) -> Self {
        points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Smallest and largest value, `None` for an empty series.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Reads a directory of benchmark result files.
pub struct ResultCollector {
    dir: PathBuf,
}

impl ResultCollector {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Regular files in the directory, in file name order.
    fn files(&self) -> Result<Vec<PathBuf>, Error> {
        let entries = fs::read_dir(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() {
                        files.push(path);
                    } else {
                        trace!("skipping non-file entry: {}", path.display());
                    }
                }
                Err(e) => {
                    warn!("error reading entry in {}: {}", self.dir.display(), e);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Errors confined to one result file. The file may be left over from a
    /// crashed run or removed after the directory was listed.
    fn skippable(e: &Error) -> bool {
        e.is_recoverable() || matches!(e, Error::Io { .. } | Error::NotFound { .. })
    }

    fn point(path: &Path, id: &BenchmarkId) -> Result<Option<Point>, Error> {
        let record = BenchmarkRecord::load(path)?;
        let label = path
            .file_name()
            .map(|name| commit_label(&name.to_string_lossy()))
            .unwrap_or_default();

        Ok(record
            .sample(path, id)?
            .map(|(timestamp, value)| Point {
                label,
                timestamp,
                value,
            }))
    }

    /// Collects every non-null sample of `id` into a chronological series.
    ///
    /// Each call re-reads the directory. Unreadable or unparseable files are
    /// skipped with a warning; a missing directory is `Error::NotFound`.
    pub fn collect(&self, id: &BenchmarkId) -> Result<Series, Error> {
        let files = self.files()?;
        debug!("{} files in {}", files.len(), self.dir.display());

        let mut points = Vec::new();
        for path in files {
            match Self::point(&path, id) {
                Ok(Some(point)) => points.push(point),
                Ok(None) => {
                    debug!("{} has no value for {}", path.display(), id);
                }
                Err(e) if Self::skippable(&e) => {
                    warn!("skipping {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Series::from_points(points))
    }

    /// All benchmark keys present in any parseable record.
    pub fn benchmarks(&self) -> Result<BTreeSet<String>, Error> {
        let mut keys = BTreeSet::new();
        for path in self.files()? {
            match BenchmarkRecord::load(&path) {
                Ok(record) => keys.extend(record.benchmarks().map(str::to_owned)),
                Err(e) if Self::skippable(&e) => warn!("skipping {}", e),
                Err(e) => return Err(e),
            }
        }
        Ok(keys)
    }
}
