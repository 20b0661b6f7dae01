//! shell_copy — copy a file to a new name.

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
    copy_file_name: String,
}

pub struct ShellCopyTool {
    dir: PathBuf,
}

impl ShellCopyTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ShellCopyTool {
    fn name(&self) -> &str {
        "shell_copy"
    }

    fn description(&self) -> &str {
        "Copy the **file_name** file and create a new file named **copy_file_name**."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({
            "file_name": "file.txt",
            "copy_file_name": "file_copy.txt"
        })
    }

    fn output_example(&self) -> &str {
        "Copied file.txt and created a new file named file_copy.txt."
    }

    fn requires_consent(&self) -> bool {
        true
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let input: Input = parse_arguments(arguments)?;
        let from = workspace::resolve(self.name(), &self.dir, &input.file_name)?;
        let to = workspace::resolve(self.name(), &self.dir, &input.copy_file_name)?;

        workspace::run(self.name(), &self.dir, "cp", [from.as_os_str(), to.as_os_str()]).await?;
        Ok(format!(
            "Copied {} and created a new file named {}.",
            input.file_name, input.copy_file_name
        ))
    }
}
