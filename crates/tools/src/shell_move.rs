//! shell_move — rename a file.

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
    new_file_name: String,
}

pub struct ShellMoveTool {
    dir: PathBuf,
}

impl ShellMoveTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ShellMoveTool {
    fn name(&self) -> &str {
        "shell_move"
    }

    fn description(&self) -> &str {
        "Rename the **file_name** file to **new_file_name**."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({
            "file_name": "file.txt",
            "new_file_name": "new_name_file.txt"
        })
    }

    fn output_example(&self) -> &str {
        "Renamed file.txt to new_name_file.txt."
    }

    fn requires_consent(&self) -> bool {
        true
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let input: Input = parse_arguments(arguments)?;
        let from = workspace::resolve(self.name(), &self.dir, &input.file_name)?;
        let to = workspace::resolve(self.name(), &self.dir, &input.new_file_name)?;

        workspace::run(self.name(), &self.dir, "mv", [from.as_os_str(), to.as_os_str()]).await?;
        Ok(format!("Renamed {} to {}.", input.file_name, input.new_file_name))
    }
}
