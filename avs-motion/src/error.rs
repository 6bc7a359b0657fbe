//! Filter construction errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::map;

/// The error type for building an `AvsMotion` filter.
///
/// Every variant is fatal: a filter is either fully constructed or not at all.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Couldn't find one of the required functions: {}", .0.join(", "))]
    MissingRequiredHostFunction(Vec<&'static str>),
    #[error("No motion file was specified")]
    MissingFilePath,
    #[error("Nonexistent or empty motion file: {path}")]
    EmptyOrUnreadableFile {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
    #[error("Invalid motion file: expected the After Effects 6.0 keyframe data signature")]
    InvalidSignature,
    #[error("Malformed keyframe row on line {line}: {reason}")]
    MalformedKeyframeRow { line: usize, reason: String },
    #[error("Host call {function}() failed: {message}")]
    Host {
        function: &'static str,
        message: String,
    },
    #[error("Invalid argument `{name}`")]
    Argument {
        name: &'static str,
        #[source]
        source: map::Error,
    },
}

/// A specialized `Result` type for filter construction.
pub type Result<T> = std::result::Result<T, Error>;
