use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Error as SerdeJsonError, Map, Value};
use thiserror::Error;

/// Errors a tool handler can raise.
///
/// The engine treats any of these exactly like a handler returning
/// `success: false`: the step fails and the message is kept.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The provided arguments were invalid or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The tool failed to execute its operation.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Failed to serialize or deserialize data.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Arguments provided to a tool for execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    /// Tool-specific key/value arguments.
    pub params: Map<String, Value>,
}

impl ToolInput {
    /// Wraps an argument map
    pub fn new(params: Map<String, Value>) -> Self {
        Self { params }
    }

    /// Reads a string argument
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    /// Reads a string argument that the tool cannot work without
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidInput`] when the key is absent or not a string
    pub fn require_str(&self, key: &str) -> ToolResult<&str> {
        self.get_str(key)
            .ok_or_else(|| ToolError::InvalidInput(format!("missing string argument '{key}'")))
    }
}

/// Outcome reported by a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// Whether the tool considers its operation successful.
    pub success: bool,
    /// Human-readable message describing the result.
    pub message: String,
    /// Optional tool-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Time the tool itself measured, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
}

impl ToolOutput {
    /// Creates a successful output with the given message and no data.
    pub fn success<T: Into<String>>(message: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            execution_time: None,
        }
    }

    /// Creates a successful output with the given message and associated data.
    pub fn success_with_data<T: Into<String>>(message: T, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            execution_time: None,
        }
    }

    /// Creates a failed output with the given message.
    pub fn error<T: Into<String>>(message: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            execution_time: None,
        }
    }

    /// Records the time the tool measured for itself
    #[must_use]
    pub fn with_execution_time(mut self, millis: u64) -> Self {
        self.execution_time = Some(millis);
        self
    }
}

/// A named operation against the host document.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique identifier for this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this tool does.
    fn description(&self) -> &str {
        ""
    }

    /// Executes the tool with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns a `ToolError` if the input is invalid or execution fails.
    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput>;
}
