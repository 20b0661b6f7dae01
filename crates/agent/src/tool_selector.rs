//! ToolSelector — asks a language model which tool, if any, to run next.
//!
//! The model sees the tool list and the histories and must answer with either
//! the literal `null` or a single JSON object:
//!
//! ```text
//! {"name": "<tool name>", "input": { ...arguments shaped like the input example... }}
//! ```
//!
//! The answer is untrusted. Anything that is not a well-formed object naming a
//! registered tool becomes [`Decision::none`], so a confused model can only
//! ever cause "do nothing".

use pipewright_core::message::role_legend;
use pipewright_core::provider::LanguageModel;
use pipewright_core::tool::{Tool, ToolRegistry};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::prompt::{Histories, push_section};

/// The model's literal "no tool" answer.
const NO_TOOL: &str = "null";

/// The outcome of one selection.
#[derive(Clone, Default)]
pub struct Decision {
    /// The selected tool, if any.
    pub tool: Option<Arc<dyn Tool>>,
    /// Canonical JSON arguments for the tool (empty when no tool).
    pub input: String,
}

impl Decision {
    /// Do not call a tool.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.tool.is_none()
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_deref().map(|t| t.name())
    }
}

impl std::fmt::Debug for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decision")
            .field("tool", &self.tool_name())
            .field("input", &self.input)
            .finish()
    }
}

/// The JSON shape the model is asked to produce. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ModelSelection {
    name: String,
    input: serde_json::Value,
}

/// Decides whether a tool should run, by delegating to a language model.
pub struct ToolSelector {
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
}

impl ToolSelector {
    /// Create a selector over a registry. An empty registry is allowed.
    pub fn new(model: Arc<dyn LanguageModel>, tools: ToolRegistry) -> Self {
        Self { model, tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Render the tool-selection prompt.
    pub fn render_prompt(&self, histories: Histories<'_>, input: &str) -> String {
        let legend = role_legend();
        let tool_list = if self.tools.is_empty() {
            "No tools available.".to_string()
        } else {
            self.tools
                .iter()
                .map(|t| t.specification())
                .collect::<Vec<_>>()
                .join("\n\n")
        };
        let conversation = histories.render_conversation();
        let knowledge = histories.render_knowledge();
        let tools = histories.render_tools();

        let mut prompt = String::new();
        push_section(
            &mut prompt,
            "System Instruction",
            &[
                "- You are a **Tool Usage Planner**. Read the [Conversation History] and the [User's Latest Request] and decide whether a tool from the [Tool List] should run next.",
                "- If a tool should run, pick it and plan the arguments (input) to call it with.",
                "- Respond **only** with a single JSON object in this schema:",
                "   {\"name\": \"<Tool Name>\", \"input\": { <JSON object in the same format as the tool's Input Example> }}",
                "- If no tool should run, respond with exactly: null",
                "- Write the JSON in English exactly as in the Input Example; never translate keys.",
                "- Never output free text, explanations or Markdown. Any character outside the JSON is prohibited.",
                "- The roles in the histories mean:",
                legend.as_str(),
            ],
        );
        push_section(&mut prompt, "Tool List", &[tool_list.as_str()]);
        push_section(&mut prompt, "Conversation History", &[conversation.as_str()]);
        push_section(&mut prompt, "Knowledge History", &[knowledge.as_str()]);
        push_section(&mut prompt, "Tool History", &[tools.as_str()]);
        push_section(&mut prompt, "User's Latest Request", &[input]);
        prompt
    }

    /// Ask the model once and turn its answer into a [`Decision`].
    pub async fn select(&self, histories: Histories<'_>, input: &str) -> Decision {
        let prompt = self.render_prompt(histories, input);
        debug!(
            model = %self.model.name(),
            tools = self.tools.len(),
            prompt_len = prompt.len(),
            "Requesting tool selection"
        );

        let output = self.model.complete(&prompt).await;
        let decision = self.parse(&output);

        match decision.tool_name() {
            Some(name) => debug!(tool = %name, input = %decision.input, "Tool selected"),
            None => debug!("No tool selected"),
        }
        decision
    }

    /// Validate raw model output against the decision schema and the registry.
    pub fn parse(&self, output: &str) -> Decision {
        let output = output.trim();
        if output == NO_TOOL {
            return Decision::none();
        }

        let selection: ModelSelection = match serde_json::from_str(output) {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "Tool selection is not valid JSON; selecting no tool");
                return Decision::none();
            }
        };

        if !selection.input.is_object() {
            warn!(tool = %selection.name, "Tool selection input is not a JSON object; selecting no tool");
            return Decision::none();
        }

        let Some(tool) = self.tools.get(&selection.name) else {
            warn!(tool = %selection.name, "Model selected an unregistered tool; selecting no tool");
            return Decision::none();
        };

        match serde_json::to_string(&selection.input) {
            Ok(input) => Decision {
                tool: Some(Arc::clone(tool)),
                input,
            },
            Err(e) => {
                warn!(error = %e, "Could not re-serialize tool input; selecting no tool");
                Decision::none()
            }
        }
    }
}
