//! Error handling for the Markdown renderer.

use ecow::EcoString;

use std::error::Error;
use std::fmt::{self, Display};
use std::io;

/// Errors that can occur while configuring or running the renderer.
#[derive(Debug)]
pub enum WriteError {
    /// The output sink reported an I/O error. Rendering stopped at the first
    /// failed write.
    Io(io::Error),
    /// An option value could not be parsed.
    InvalidOption {
        /// Name of the option.
        name: EcoString,
        /// The rejected value.
        value: EcoString,
    },
    /// A configuration file could not be read or understood.
    Config(EcoString),
}

impl Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Io(err) => write!(f, "I/O error: {err}"),
            WriteError::InvalidOption { name, value } => {
                write!(f, "Invalid value '{value}' for option {name}")
            }
            WriteError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WriteError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(err: io::Error) -> Self {
        WriteError::Io(err)
    }
}

/// Result type alias for renderer operations.
pub type WriteResult<T> = Result<T, WriteError>;

impl WriteError {
    /// Error for an option value that could not be parsed.
    pub fn invalid_option(name: impl Into<EcoString>, value: impl Into<EcoString>) -> Self {
        WriteError::InvalidOption {
            name: name.into(),
            value: value.into(),
        }
    }
}
