use thiserror::Error;

/// Errors raised while building a [`Header`](crate::header::Header).
///
/// These are always fatal to parser construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("empty header received")]
    Empty,

    #[error("no non-empty header lines specified")]
    NoLines,

    #[error("Bad line in header:\n{0}")]
    BadLine(String),

    #[error("Line is not a valid metadata line: {0}")]
    InvalidMetadataLine(String),

    #[error("No format line found in header")]
    NoFormatLine,

    #[error("VCF header missing columns:\n{0}")]
    MissingColumns(String),

    #[error("VCF column headers not correct:\n{0}")]
    IncorrectColumns(String),

    #[error("VCF header has FORMAT but no samples:\n{0}")]
    NoSamples(String),
}

/// Errors raised while decoding a single data line.
///
/// A caller may catch these per line and carry on with the next one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("empty line")]
    EmptyLine,

    #[error("expected at least 7 tab-separated columns, found {found}")]
    MissingColumns { found: usize },

    #[error("no INFO field specified, must contain at least a '.' (turn off strict mode to allow)")]
    MissingInfo,

    #[error("invalid POS value: {0:?}")]
    InvalidPosition(String),

    #[error("invalid QUAL value: {0:?}")]
    InvalidQuality(String),

    #[error(transparent)]
    Breakend(#[from] BreakendError),
}

/// Errors raised by [`parse_breakend`](crate::breakend::parse_breakend).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BreakendError {
    #[error("Invalid breakend: {0}")]
    Invalid(String),

    #[error("failed to parse {0}")]
    Unparseable(String),
}
