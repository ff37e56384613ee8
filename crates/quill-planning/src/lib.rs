//! Request classification and plan decomposition.
//!
//! This crate decides whether a request needs a multi-step plan and, when it
//! does, turns the request (or a list of previously reported findings) into
//! an ordered [`quill_core::TaskPlan`]. Everything here is synchronous and
//! pure: no I/O, no shared mutable state.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::float_cmp,
        reason = "Allow for tests"
    )
)]

/// Complexity classification of incoming requests
pub mod analyzer;
/// Plan construction from requests and review findings
pub mod decompose;
/// Keyword and pattern helpers shared by the analyzer and decomposer
mod text;

pub use analyzer::{
    ComplexityClassifier, ComplexityLevel, ComplexityResult, ContextReference,
    ContextReferenceType, RequestClassifier,
};
pub use decompose::{DecomposeOptions, ReviewFinding, ReviewResult, TaskDecomposer};
