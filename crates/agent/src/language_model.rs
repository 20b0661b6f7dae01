//! ContextAwareLanguageModel — a language model with memory of the dialogue.
//!
//! Each call records the request, renders a prompt that carries the whole
//! conversation (plus any knowledge and tool history), and records the reply.
//! It is a `Pipe<String>`, so it slots into any chain.

use async_trait::async_trait;
use pipewright_core::message::{Context, Message, Role, role_legend};
use pipewright_core::pipe::Pipe;
use pipewright_core::provider::LanguageModel;
use std::sync::Arc;
use tracing::debug;

use crate::prompt::{Histories, push_section};

/// A language model stage that accumulates its own conversation.
pub struct ContextAwareLanguageModel {
    /// The raw completion backend.
    model: Arc<dyn LanguageModel>,
    /// USER / ASSISTANT dialogue, appended on every execute.
    context: Context,
    /// Retrieved knowledge, appended by the application.
    knowledge: Option<Context>,
    /// Tool invocations, appended by the application.
    tool_history: Option<Context>,
}

impl ContextAwareLanguageModel {
    /// Create a model with an empty conversation and no side histories.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            context: Context::new(),
            knowledge: None,
            tool_history: None,
        }
    }

    /// Continue an existing conversation.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Track a knowledge history and include it in every prompt.
    pub fn with_knowledge_history(mut self, knowledge: Context) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Track a tool history and include it in every prompt.
    pub fn with_tool_history(mut self, tools: Context) -> Self {
        self.tool_history = Some(tools);
        self
    }

    /// The wrapped completion backend.
    pub fn inner(&self) -> &Arc<dyn LanguageModel> {
        &self.model
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn knowledge_history(&self) -> Option<&Context> {
        self.knowledge.as_ref()
    }

    pub fn knowledge_history_mut(&mut self) -> Option<&mut Context> {
        self.knowledge.as_mut()
    }

    pub fn tool_history(&self) -> Option<&Context> {
        self.tool_history.as_ref()
    }

    pub fn tool_history_mut(&mut self) -> Option<&mut Context> {
        self.tool_history.as_mut()
    }

    /// Borrow every history at once, e.g. to hand to a `ToolSelector`.
    pub fn histories(&self) -> Histories<'_> {
        Histories {
            conversation: &self.context,
            knowledge: self.knowledge.as_ref(),
            tools: self.tool_history.as_ref(),
        }
    }

    /// Render the prompt sent to the backend for `input`.
    ///
    /// Called after `input` has been appended, so the conversation section
    /// already ends with it.
    pub fn render_prompt(&self, input: &str) -> String {
        let histories = self.histories();
        let assistant = format!(
            "- You are the **{}**, responsible for resolving the user's requests.",
            Role::Assistant
        );
        let legend = role_legend();
        let knowledge = histories.render_knowledge();
        let conversation = histories.render_conversation();
        let tools = histories.render_tools();

        let mut prompt = String::new();
        push_section(
            &mut prompt,
            "System Instruction",
            &[
                assistant.as_str(),
                "- Answer the **User's Latest Request** (at the very bottom) using the [Conversation History], [Knowledge History] and [Tool History] below.",
                "- Always respond in the same language the user writes in.",
                "- The roles in the histories mean:",
                legend.as_str(),
            ],
        );
        push_section(
            &mut prompt,
            "Knowledge History",
            &[
                "- Reference information retrieved for the user's requests: facts, background or domain knowledge that may help.",
                knowledge.as_str(),
            ],
        );
        push_section(
            &mut prompt,
            "Conversation History",
            &[
                "- The dialogue between the USER and the ASSISTANT so far, oldest first.",
                conversation.as_str(),
            ],
        );
        push_section(
            &mut prompt,
            "Tool History",
            &[
                "- Tools invoked for the user's requests (commands, queries, API calls) and what they returned.",
                tools.as_str(),
            ],
        );
        push_section(
            &mut prompt,
            "User's Latest Request",
            &[
                "- The **most recent request**. Answer it using everything above.",
                input,
            ],
        );
        prompt
    }
}

#[async_trait]
impl Pipe<String> for ContextAwareLanguageModel {
    type Output = String;

    async fn execute(&mut self, input: String) -> String {
        self.context.append(Message::user(input.as_str()));

        let prompt = self.render_prompt(&input);
        debug!(
            model = %self.model.name(),
            prompt_len = prompt.len(),
            turns = self.context.len(),
            "Sending context-aware prompt"
        );

        let output = self.model.complete(&prompt).await;
        self.context.append(Message::assistant(output.as_str()));

        output
    }
}
