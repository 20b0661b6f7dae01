//! shell_read — print a file's contents.

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

pub struct ShellReadTool {
    dir: PathBuf,
}

impl ShellReadTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ShellReadTool {
    fn name(&self) -> &str {
        "shell_read"
    }

    fn description(&self) -> &str {
        "Read the contents of the file with the given **file_name**."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({ "file_name": "file.txt" })
    }

    fn output_example(&self) -> &str {
        "The contents of file.txt are as follows:\nThis is the file contents."
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let input: Input = parse_arguments(arguments)?;
        let path = workspace::resolve(self.name(), &self.dir, &input.file_name)?;

        let contents = workspace::run(self.name(), &self.dir, "cat", [path.as_os_str()]).await?;
        Ok(format!(
            "The contents of {} are as follows:\n{contents}",
            input.file_name
        ))
    }
}
