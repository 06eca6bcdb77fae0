// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record {}: {reason}", .path.display())]
    MalformedRecord { path: PathBuf, reason: String },
    #[error("malformed trace {}: {reason}", .path.display())]
    MalformedTrace { path: PathBuf, reason: String },
    #[error("malformed observations {}: {reason}", .path.display())]
    MalformedObservations { path: PathBuf, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to render chart: {0}")]
    Plot(String),
}

impl Error {
    /// Wraps an io error for `path`, promoting `ErrorKind::NotFound`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                path: path.to_owned(),
            }
        } else {
            Error::Io {
                path: path.to_owned(),
                source,
            }
        }
    }

    pub fn plot(e: impl std::fmt::Display) -> Self {
        Error::Plot(e.to_string())
    }

    /// Errors that only affect one input file and may be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }
}
