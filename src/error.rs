//! Error types for vhost construction.
//!
//! Errors only happen while building a middleware. Matching a request never
//! fails: a missing host header or a mismatch is a pass-through, not an error.

use thiserror::Error;

/// Vhost construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VhostError {
    /// A required argument was not supplied (or was empty).
    #[error("argument {0} is required")]
    MissingArgument(&'static str),

    /// An argument was supplied but cannot be used.
    #[error("argument {argument} is invalid: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, VhostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_display() {
        let err = VhostError::MissingArgument("hostname");
        assert_eq!(err.to_string(), "argument hostname is required");
    }

    #[test]
    fn test_invalid_argument_is_matchable() {
        let err = VhostError::InvalidArgument {
            argument: "hostname",
            message: "unclosed group".into(),
        };
        match &err {
            VhostError::InvalidArgument { argument, .. } => assert_eq!(*argument, "hostname"),
            _ => panic!("expected InvalidArgument"),
        }
        assert!(err.to_string().contains("unclosed group"), "got: {}", err);
    }
}
