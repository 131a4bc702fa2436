//! Error type returned by [`TerminalWriter`](crate::TerminalWriter).

use std::fmt;
use std::io;

use crate::markup::InvalidMarkupError;
use crate::sink::{EncodeError, SinkError};

/// Failure while writing or measuring.
#[derive(Debug)]
pub enum WriteError {
    /// A style flag name is not in the markup table.
    InvalidMarkup(InvalidMarkupError),
    /// `sep` was called with an empty separator.
    EmptySeparator,
    /// The terminal size query was interrupted; never swallowed.
    Interrupted(io::Error),
    /// Even the escaped fallback could not be encoded by the sink.
    Encode(EncodeError),
    /// The sink failed.
    Io(io::Error),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMarkup(err) => write!(f, "{err}"),
            Self::EmptySeparator => write!(f, "separator must not be empty"),
            Self::Interrupted(err) => write!(f, "terminal size query interrupted: {err}"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "write failed: {err}"),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidMarkup(err) => Some(err),
            Self::EmptySeparator => None,
            Self::Interrupted(err) | Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<InvalidMarkupError> for WriteError {
    fn from(err: InvalidMarkupError) -> Self {
        Self::InvalidMarkup(err)
    }
}

impl From<io::Error> for WriteError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<EncodeError> for WriteError {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<SinkError> for WriteError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Encoding(err) => Self::Encode(err),
            SinkError::Io(err) => Self::Io(err),
        }
    }
}
