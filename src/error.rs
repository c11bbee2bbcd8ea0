//! Conversion error types

use std::io;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting an SVG document into a footprint
#[derive(Error, Debug)]
pub enum ConvertError {
    /// IO error when reading the input or writing the output
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML or has no `<svg>` root
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Malformed transform list, path data, length or viewBox
    #[error("invalid {kind} \"{input}\": {message}")]
    Parse {
        kind: &'static str,
        input: String,
        message: String,
    },

    /// Root width and height are declared in different units
    #[error("units for SVG root width and height differ: width=\"{width}\", height=\"{height}\"")]
    UnitMismatch { width: String, height: String },

    /// Curve subdivision or group nesting went deeper than allowed
    #[error("recursion limit of {limit} exceeded while processing {what}")]
    RecursionLimitExceeded { what: String, limit: usize },

    /// Nothing drawable was found in the document
    #[error("no shapes found in document")]
    EmptyInput,
}

impl ConvertError {
    pub(crate) fn parse(kind: &'static str, input: &str, message: impl Into<String>) -> Self {
        ConvertError::Parse {
            kind,
            input: input.to_string(),
            message: message.into(),
        }
    }
}
