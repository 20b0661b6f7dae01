//! shell_touch — create an empty file.

use async_trait::async_trait;
use pipewright_core::error::ToolError;
use pipewright_core::tool::{Tool, parse_arguments};
use serde::Deserialize;
use std::path::PathBuf;

use crate::workspace;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct Input {
    file_name: String,
}

pub struct ShellTouchTool {
    dir: PathBuf,
}

impl ShellTouchTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ShellTouchTool {
    fn name(&self) -> &str {
        "shell_touch"
    }

    fn description(&self) -> &str {
        "Create an empty file with the given **file_name**."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({ "file_name": "new_file.txt" })
    }

    fn output_example(&self) -> &str {
        "Created an empty file named new_file.txt."
    }

    fn requires_consent(&self) -> bool {
        true
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let input: Input = parse_arguments(arguments)?;
        let path = workspace::resolve(self.name(), &self.dir, &input.file_name)?;

        workspace::run(self.name(), &self.dir, "touch", [path.as_os_str()]).await?;
        Ok(format!("Created an empty file named {}.", input.file_name))
    }
}
