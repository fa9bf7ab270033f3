//! Error types for im-isbn

use thiserror::Error;

/// Result type alias for ISBN operations
pub type Result<T> = std::result::Result<T, IsbnError>;

/// Failures raised while building, converting or hyphenating an ISBN
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsbnError {
    /// No input was given
    #[error("no ISBN given")]
    NilInput,

    /// Normalized digit count is not accepted
    #[error("given ISBN length is {length}, must be 10 or 13")]
    InvalidLength { length: usize },

    /// Characters do not fit the ISBN-10 / EAN-13 shape
    #[error("invalid ISBN format: {0}")]
    InvalidFormat(String),

    /// Shape is fine but the check digit is wrong
    #[error("given ISBN control key is {given}, must be {expected}")]
    InvalidControlKey { given: char, expected: char },

    /// Only the 978 numbering space has an ISBN-10 form
    #[error("given prefix is {prefix}, only 978 can be converted")]
    CannotConvertToTen { prefix: String },

    /// The range table has no path for this number
    #[error("no registration range matches {0}")]
    NoMatchingRange(String),
}

/// Range-table loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeDataError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("{element} is missing <{field}>")]
    MissingField { element: String, field: String },

    #[error("invalid range {range:?} for length {length}")]
    InvalidRange { range: String, length: usize },

    #[error("invalid group prefix: {0}")]
    InvalidPrefix(String),

    #[error("unknown EAN prefix {0}, expected 978 or 979")]
    UnknownPrefix(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RangeDataError {
    fn from(err: std::io::Error) -> Self {
        RangeDataError::Io(err.to_string())
    }
}

impl From<quick_xml::Error> for RangeDataError {
    fn from(err: quick_xml::Error) -> Self {
        RangeDataError::Xml(err.to_string())
    }
}
