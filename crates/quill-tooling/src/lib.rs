//! Tool boundary for the orchestration engine.
//!
//! This crate provides the contract between the engine and the host
//! document API:
//! - `Tool` trait and its input/output types
//! - `ToolRegistry` for name-based lookup
//! - `FnTool` for registering closures as tools
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        reason = "Allow for tests"
    )
)]

/// Closure-backed tool adapter.
mod fn_tool;
/// Tool registry for managing available tools.
mod registry;
/// Core abstractions shared by all tools.
mod tool;

pub use fn_tool::FnTool;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolError, ToolInput, ToolOutput, ToolResult};
