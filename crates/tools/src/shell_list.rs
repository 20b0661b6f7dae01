//! shell_list — list the files in the working directory.

use async_trait::async_trait;
use pipewright_core::error::ToolError;
use pipewright_core::tool::Tool;
use std::path::PathBuf;

use crate::workspace;

pub struct ShellListTool {
    dir: PathBuf,
}

impl ShellListTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ShellListTool {
    fn name(&self) -> &str {
        "shell_list"
    }

    fn description(&self) -> &str {
        "List the files in the current directory."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn output_example(&self) -> &str {
        "The files in the current directory are as follows:\nfile_1.txt\nfile_2.txt\nfile_3.txt"
    }

    async fn invoke(&self, _arguments: &str) -> Result<String, ToolError> {
        let listing = workspace::run(self.name(), &self.dir, "ls", ["-1"]).await?;
        Ok(format!(
            "The files in the current directory are as follows:\n{}",
            listing.trim_end()
        ))
    }
}
