//! The Pipewright agent — conversation, tool selection, and turn driving.
//!
//! A turn follows a **Recall → Act → Answer** cycle:
//!
//! 1. **Recall** the knowledge fragment closest to the user's input
//! 2. **Act**: ask the [`ToolSelector`] whether a tool should run, and run it
//! 3. **Answer** with the [`ContextAwareLanguageModel`], whose prompt carries
//!    the conversation, knowledge, and tool histories
//!
//! [`Session`] wires the three together; each piece is also usable alone.

pub mod language_model;
pub mod prompt;
pub mod session;
pub mod tool_selector;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use language_model::ContextAwareLanguageModel;
pub use prompt::{Histories, NONE_PLACEHOLDER};
pub use session::{
    AlwaysDeny, AutoApprove, ConsentGate, DECLINED, Session, ToolInvocation, TurnOutcome,
};
pub use tool_selector::{Decision, ToolSelector};
