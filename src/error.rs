use std::fmt;
use std::io;

/// Unified error type for building and reading tables.
///
/// A missing key is never an error: lookups return `Option`.
#[derive(Debug)]
pub enum Error {
    /// IO error from disk operations.
    Io(io::Error),
    /// Ran out of bytes while decoding a block, footer record or trailer.
    Eof,
    /// A length, offset or count does not fit its 4-byte on-disk field.
    TooLarge(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Eof => write!(f, "Unexpected end of data"),
            Error::TooLarge(what) => write!(f, "Too large for a 32-bit field: {what}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
