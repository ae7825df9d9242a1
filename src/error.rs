//! Error types for epochsim.
//!
//! Only conditions caused by the outside world are errors: unreadable
//! traces, malformed records and unusable configurations. Broken internal
//! invariants of the simulator are bugs and panic instead.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors in epochsim.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading a trace.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A trace line could not be parsed.
    ///
    /// `line` is 1-based.
    #[error("malformed trace record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// Simulator parameters that cannot describe a buffer.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedRecord {
            line: 7,
            reason: "expected 3 fields, found 2".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "malformed trace record at line 7: expected 3 fields, found 2"
        );

        let err = Error::InvalidConfig("buffer capacity must be > 0".to_string());
        assert_eq!(
            format!("{}", err),
            "invalid configuration: buffer capacity must be > 0"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
        assert!(std::error::Error::source(&Error::from(std::io::Error::other("x"))).is_some());
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
