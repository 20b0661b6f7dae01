//! Prompt rendering shared by the context-aware model and the tool selector.
//!
//! Both prompts are Markdown documents made of `# Heading` sections. Optional
//! histories render as an explicit `None.` so the model can tell "nothing
//! happened" apart from a missing section.

use pipewright_core::message::Context;

/// Placeholder for an absent or empty history.
pub const NONE_PLACEHOLDER: &str = "None.";

/// The histories a prompt is rendered from.
///
/// Borrowed for the duration of one render; the owning component keeps the
/// logs themselves.
#[derive(Debug, Clone, Copy)]
pub struct Histories<'a> {
    /// USER / ASSISTANT dialogue.
    pub conversation: &'a Context,
    /// Retrieved reference material, if the application tracks it.
    pub knowledge: Option<&'a Context>,
    /// Tool invocations and results, if the application tracks them.
    pub tools: Option<&'a Context>,
}

impl<'a> Histories<'a> {
    pub fn new(conversation: &'a Context) -> Self {
        Self {
            conversation,
            knowledge: None,
            tools: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: &'a Context) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn with_tools(mut self, tools: &'a Context) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Knowledge history with repeated snippets collapsed, or `None.`.
    pub fn render_knowledge(&self) -> String {
        match self.knowledge {
            Some(ctx) if ctx.is_not_empty() => ctx.distinct().to_string(),
            _ => NONE_PLACEHOLDER.to_string(),
        }
    }

    /// Tool history in invocation order, or `None.`.
    pub fn render_tools(&self) -> String {
        render_or_none(self.tools)
    }

    /// Conversation history, or `None.` before the first turn.
    pub fn render_conversation(&self) -> String {
        render_or_none(Some(self.conversation))
    }
}

fn render_or_none(context: Option<&Context>) -> String {
    match context {
        Some(ctx) if ctx.is_not_empty() => ctx.to_string(),
        _ => NONE_PLACEHOLDER.to_string(),
    }
}

/// Append a `# title` section followed by its body lines.
pub(crate) fn push_section(out: &mut String, title: &str, body: &[&str]) {
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str("# ");
    out.push_str(title);
    for line in body {
        out.push('\n');
        out.push_str(line);
    }
}
