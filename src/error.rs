#![warn(missing_docs)]
//! Paraxial specific error structures
use std::{error::Error, fmt::Display};

/// Application specific Result type
pub type ParaxResult<T> = std::result::Result<T, ParaxError>;

/// Errors that can be returned by the various raytracing functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParaxError {
    /// a non-finite or zero-valued input which has no physical meaning (zero focal length, zero radius, ...)
    InvalidArgument(String),
    /// an [`OpticalSystem`](crate::OpticalSystem) is in an inconsistent configuration (e.g. non-monotonic element locations)
    InvalidState(String),
    /// errors while reading, parsing or writing a system document
    Document(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for ParaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(m) => {
                write!(f, "InvalidArgument:{m}")
            }
            Self::InvalidState(m) => {
                write!(f, "InvalidState:{m}")
            }
            Self::Document(m) => {
                write!(f, "Document:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "Paraxial Error:Other:{m}"),
        }
    }
}
impl Error for ParaxError {}

impl std::convert::From<String> for ParaxError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
