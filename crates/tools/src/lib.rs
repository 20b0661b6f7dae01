//! Built-in shell tools for Pipewright.
//!
//! Six file tools scoped to a working directory: list, read, write, touch,
//! copy, and move. File names are resolved inside that directory and passed
//! to processes as arguments, never through a shell.
//!
//! The read-only tools (`shell_list`, `shell_read`) run freely; the others
//! report `requires_consent() == true`.

pub mod shell_copy;
pub mod shell_list;
pub mod shell_move;
pub mod shell_read;
pub mod shell_touch;
pub mod shell_write;
mod workspace;

use pipewright_core::tool::{Tool, ToolRegistry};
use std::path::Path;
use std::sync::Arc;

pub use shell_copy::ShellCopyTool;
pub use shell_list::ShellListTool;
pub use shell_move::ShellMoveTool;
pub use shell_read::ShellReadTool;
pub use shell_touch::ShellTouchTool;
pub use shell_write::ShellWriteTool;

/// All six shell tools, operating in `dir`.
pub fn shell_tools(dir: &Path) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ShellListTool::new(dir)),
        Arc::new(ShellReadTool::new(dir)),
        Arc::new(ShellWriteTool::new(dir)),
        Arc::new(ShellTouchTool::new(dir)),
        Arc::new(ShellCopyTool::new(dir)),
        Arc::new(ShellMoveTool::new(dir)),
    ]
}

/// A registry holding every shell tool, operating in `dir`.
pub fn shell_toolbox(dir: &Path) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in shell_tools(dir) {
        // Names are distinct constants, so registration cannot collide.
        if let Err(e) = registry.register(tool) {
            tracing::error!(error = %e, "Shell tool registration failed");
        }
    }
    registry
}
