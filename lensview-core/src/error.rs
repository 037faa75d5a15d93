use std::path::PathBuf;

use thiserror::Error;

use crate::params::Variant;

/// Top-level error type for the projection core.
#[derive(Debug, Error)]
pub enum LensviewError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Errors raised while reading a point file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected {expected}, found {found:?}")]
    Format {
        line: usize,
        expected: &'static str,
        found: String,
    },
}

/// Errors raised by the projection engine.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// A divisor was zero or the result left the finite range.
    #[error("numeric overflow at point {index} during {stage}")]
    NumericOverflow { index: usize, stage: &'static str },

    #[error("{variant} expects {expected} parameters, got {found}")]
    ParameterCount {
        variant: Variant,
        expected: usize,
        found: usize,
    },
}

/// Errors raised by parameter controls.
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("{label}: {text:?} is not a number")]
    InvalidEntry { label: &'static str, text: String },

    #[error("no control at index {0}")]
    UnknownControl(usize),
}

/// Convenience result type for the projection core.
pub type Result<T> = std::result::Result<T, LensviewError>;
