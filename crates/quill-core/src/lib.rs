//! Core types for the quill document-editing assistant.
//!
//! This crate provides the plan data model shared by the planner and the
//! orchestration engine, the crate-wide error type, and configuration.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Configuration loading and defaults.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Task plans and the steps they are made of.
pub mod plan;

pub use config::{ExecutionConfig, PlanningConfig, QuillConfig};
pub use error::{Error, Result};
pub use plan::{IssueType, PlanId, PlanSource, RiskLevel, TaskPlan, TaskStep, into_args};
