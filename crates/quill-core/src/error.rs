use core::result::Result as CoreResult;
use std::io::Error as IoError;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlDeError;
use toml::ser::Error as TomlSerError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the core library.
///
/// Step-level failures (missing tools, timeouts, failing handlers) are never
/// represented here; they are captured in the orchestration result instead.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] TomlDeError),

    /// TOML serialization failed.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] TomlSerError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A step list handed to the engine was empty.
    #[error("At least one step required")]
    EmptyPlan,

    /// A step list exceeded the configured maximum.
    #[error("Too many steps: {count} (maximum is {max})")]
    TooManySteps {
        /// Number of steps supplied
        count: usize,
        /// Maximum number of steps accepted
        max: usize,
    },

    /// A step had no tool name.
    #[error("Step {step} is missing a tool name")]
    MissingToolName {
        /// One-based step number
        step: usize,
    },

    /// A step had no argument mapping.
    #[error("Step {step} is missing an arguments object")]
    MissingArguments {
        /// One-based step number
        step: usize,
    },

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error describes a structurally invalid step list.
    ///
    /// These are programmer errors raised before any step runs.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPlan
                | Self::TooManySteps { .. }
                | Self::MissingToolName { .. }
                | Self::MissingArguments { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value as JsonValue, from_str};
    use std::io;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::EmptyPlan.to_string(), "At least one step required");

        let too_many = Error::TooManySteps { count: 51, max: 50 };
        assert_eq!(too_many.to_string(), "Too many steps: 51 (maximum is 50)");

        let missing = Error::MissingToolName { step: 3 };
        assert_eq!(missing.to_string(), "Step 3 is missing a tool name");
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::EmptyPlan.is_validation());
        assert!(Error::MissingArguments { step: 1 }.is_validation());
        assert!(!Error::Config("bad".to_owned()).is_validation());
        assert!(!Error::Other("x".to_owned()).is_validation());
    }

    #[test]
    fn test_error_from_io() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = from_str::<JsonValue>("invalid json").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
