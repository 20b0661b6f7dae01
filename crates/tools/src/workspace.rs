//! Path scoping and process execution shared by the shell tools.

use pipewright_core::error::ToolError;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// Resolve `file_name` inside `dir`.
///
/// Only plain relative names are accepted: no absolute paths and no `..`.
pub(crate) fn resolve(tool: &str, dir: &Path, file_name: &str) -> Result<PathBuf, ToolError> {
    let relative = Path::new(file_name);
    if file_name.trim().is_empty() {
        return Err(ToolError::InvalidArguments(format!(
            "{tool}: file name must not be empty"
        )));
    }

    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ToolError::InvalidArguments(format!(
            "{tool}: '{file_name}' must be a path inside the working directory"
        )));
    }

    Ok(dir.join(relative))
}

/// Run `program` in `dir` and return its stdout.
///
/// Arguments are handed to the process directly, never to a shell.
pub(crate) async fn run<I, S>(tool: &str, dir: &Path, program: &str, args: I) -> Result<String, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!(tool, program, dir = %dir.display(), "Running command");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| ToolError::ExecutionFailed {
            tool_name: tool.into(),
            reason: format!("failed to run {program}: {e}"),
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(tool, program, exit_code = code, "Command failed");
        return Err(ToolError::ExecutionFailed {
            tool_name: tool.into(),
            reason: if stderr.is_empty() {
                format!("{program} exited with code {code}")
            } else {
                stderr
            },
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
