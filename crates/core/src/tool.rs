//! Tool trait — the abstraction over named, side-effecting capabilities.
//!
//! A tool describes itself (name, description, example input and output) so a
//! language model can decide when to call it, and exposes `invoke` so the
//! application can run it once a decision has been made.

use async_trait::async_trait;
use std::sync::Arc;
use crate::error::ToolError;

/// The core Tool trait.
///
/// Each tool (shell_list, shell_read, ...) implements this trait. Tools are
/// registered in the ToolRegistry and offered to the model by the selector.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "shell_list").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// A canonical example of the JSON arguments this tool accepts.
    fn input_example(&self) -> serde_json::Value;

    /// An example of what this tool returns.
    fn output_example(&self) -> &str;

    /// Whether the user must approve each invocation.
    fn requires_consent(&self) -> bool {
        false
    }

    /// Run the tool with JSON-encoded arguments.
    async fn invoke(&self, arguments: &str) -> std::result::Result<String, ToolError>;

    /// The block describing this tool in a tool-selection prompt.
    fn specification(&self) -> String {
        format!(
            "Tool Name: {}\n- Description: {}\n- Input Example:\n{}\n- Output Example:\n{}",
            self.name(),
            self.description(),
            self.input_example(),
            self.output_example(),
        )
    }
}

/// Parse JSON tool arguments into a typed input.
pub fn parse_arguments<T: serde::de::DeserializeOwned>(
    arguments: &str,
) -> std::result::Result<T, ToolError> {
    serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// An ordered registry of tools with unique names.
///
/// Order is registration order; it is the order tools are listed to the model.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Build a registry from a list of tools, rejecting duplicate names.
    pub fn from_tools(
        tools: impl IntoIterator<Item = Arc<dyn Tool>>,
    ) -> std::result::Result<Self, ToolError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool. A name already in the registry is a configuration error.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> std::result::Result<(), ToolError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolError::DuplicateName(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Invoke a tool by name.
    pub async fn invoke(&self, name: &str, arguments: &str) -> std::result::Result<String, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(arguments).await
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}
