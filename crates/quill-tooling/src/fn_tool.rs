//! Adapter that turns an async closure into a [`Tool`].

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt as _};

use crate::{Tool, ToolInput, ToolOutput, ToolResult};

type Handler = dyn Fn(ToolInput) -> BoxFuture<'static, ToolResult<ToolOutput>> + Send + Sync;

/// A tool whose behaviour is a closure.
///
/// Hosts wrapping many thin document-API calls can register each one without
/// declaring a dedicated type:
///
/// ```
/// use quill_tooling::{FnTool, ToolError, ToolOutput, ToolRegistry};
/// use std::sync::Arc;
///
/// let bold = FnTool::new("word_set_bold", |_input| async {
///     Ok::<_, ToolError>(ToolOutput::success("bold applied"))
/// });
/// let registry = ToolRegistry::default().with_tool(Arc::new(bold));
/// assert!(registry.contains("word_set_bold"));
/// ```
pub struct FnTool {
    name: String,
    description: String,
    handler: Box<Handler>,
}

impl FnTool {
    /// Wraps `handler` under `name`
    pub fn new<N, F, Fut>(name: N, handler: F) -> Self
    where
        N: Into<String>,
        F: Fn(ToolInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<ToolOutput>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            handler: Box::new(move |input| handler(input).boxed()),
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FnTool")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        (self.handler)(input).await
    }
}
