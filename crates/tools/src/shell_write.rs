//! shell_write — replace a file's contents.

use async_trait::async_trait;
use pipewright_core::error::ToolError;
use pipewright_core::tool::{Tool, parse_arguments};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use crate::workspace;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct Input {
    file_name: String,
    file_content: String,
}

pub struct ShellWriteTool {
    dir: PathBuf,
}

impl ShellWriteTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ShellWriteTool {
    fn name(&self) -> &str {
        "shell_write"
    }

    fn description(&self) -> &str {
        "Write **file_content** to the file with the given **file_name**."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({
            "file_name": "file.txt",
            "file_content": "This is the file content."
        })
    }

    fn output_example(&self) -> &str {
        "The contents of file.txt have been updated."
    }

    fn requires_consent(&self) -> bool {
        true
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let input: Input = parse_arguments(arguments)?;
        let path = workspace::resolve(self.name(), &self.dir, &input.file_name)?;

        debug!(path = %path.display(), bytes = input.file_content.len(), "Writing file");
        tokio::fs::write(&path, input.file_content.as_bytes())
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("failed to write {}: {e}", input.file_name),
            })?;

        Ok(format!("The contents of {} have been updated.", input.file_name))
    }
}
