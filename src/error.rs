use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures that stop a parse from producing a tree.
///
/// Malformed source is not an error here: it yields diagnostics and `ERROR`
/// nodes inside a successful [`crate::ParseResult`].
#[derive(Debug)]
pub enum Error {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// The cancellation flag was raised between two token requests.
    Cancelled,
    InvalidEdit {
        start: usize,
        end: usize,
        len: usize,
    },
    Internal {
        message: String,
        backtrace: Option<Backtrace>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            backtrace: capture_backtrace(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    #[must_use]
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            Error::Internal { backtrace, .. } => backtrace.as_ref(),
            _ => None,
        }
    }
}

fn capture_backtrace() -> Option<Backtrace> {
    if cfg!(debug_assertions) {
        Some(Backtrace::force_capture())
    } else {
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Error::Cancelled => f.write_str("parse cancelled"),
            Error::InvalidEdit { start, end, len } => write!(
                f,
                "edit range {start}..{end} is outside the {len}-byte source or splits a character"
            ),
            Error::Internal { message, .. } => write!(f, "internal parser error: {message}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_expose_their_source() {
        let err = Error::io("Missing.bf", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "failed to read `Missing.bf`: gone");
        assert!(err.source().is_some());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn internal_errors_capture_backtrace_in_debug() {
        let err = Error::internal("builder stack underflow");
        assert_eq!(err.to_string(), "internal parser error: builder stack underflow");
        assert_eq!(err.backtrace().is_some(), cfg!(debug_assertions));
    }
}
