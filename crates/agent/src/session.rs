//! Session — one conversation driven turn by turn.
//!
//! A turn runs three stages in order:
//!
//! 1. **Recall** — retrieve the closest knowledge fragment for the input
//! 2. **Act** — let the tool selector pick a tool, ask for consent, invoke it
//! 3. **Answer** — run the context-aware model over everything gathered
//!
//! Knowledge and tool results land in the model's side histories, so later
//! turns see them too.

use async_trait::async_trait;
use pipewright_core::error::{Error, Result};
use pipewright_core::knowledge::KnowledgeStore;
use pipewright_core::message::{Context, Message};
use pipewright_core::pipe::Pipe;
use pipewright_core::provider::LanguageModel;
use pipewright_core::tool::{Tool, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::language_model::ContextAwareLanguageModel;
use crate::tool_selector::ToolSelector;

/// Text recorded in the tool history when the user refuses an invocation.
pub const DECLINED: &str = "Declined by the user.";

/// Decides whether a consent-requiring tool may run.
#[async_trait]
pub trait ConsentGate: Send + Sync {
    async fn approve(&self, tool: &dyn Tool, input: &str) -> bool;
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl ConsentGate for AutoApprove {
    async fn approve(&self, _tool: &dyn Tool, _input: &str) -> bool {
        true
    }
}

/// Refuses everything. The default gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDeny;

#[async_trait]
impl ConsentGate for AlwaysDeny {
    async fn approve(&self, _tool: &dyn Tool, _input: &str) -> bool {
        false
    }
}

/// What happened to the tool chosen during a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub input: String,
    /// Tool output, `Error: …` on failure, or [`DECLINED`].
    pub output: String,
    pub approved: bool,
}

impl ToolInvocation {
    /// The text appended to the tool history.
    pub fn to_history_text(&self) -> String {
        format!("{}({})\n{}", self.tool_name, self.input, self.output)
    }
}

/// The result of one [`Session::turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub answer: String,
    /// The knowledge fragment retrieved for this turn, if any.
    pub knowledge: Option<String>,
    pub tool: Option<ToolInvocation>,
}

/// Drives a conversation with optional knowledge and tools.
pub struct Session {
    model: ContextAwareLanguageModel,
    selector: Option<ToolSelector>,
    knowledge: Option<Box<dyn KnowledgeStore>>,
    min_similarity: f64,
    consent: Arc<dyn ConsentGate>,
}

impl Session {
    /// A session that only talks: no knowledge store, no tools.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model: ContextAwareLanguageModel::new(model)
                .with_knowledge_history(Context::new())
                .with_tool_history(Context::new()),
            selector: None,
            knowledge: None,
            min_similarity: pipewright_core::DEFAULT_MIN_SIMILARITY,
            consent: Arc::new(AlwaysDeny),
        }
    }

    /// Offer `tools`, selected by the session's own model.
    pub fn with_tools(self, tools: ToolRegistry) -> Self {
        let selector = ToolSelector::new(Arc::clone(self.model.inner()), tools);
        self.with_selector(selector)
    }

    /// Use a dedicated selector, e.g. one backed by a different model.
    pub fn with_selector(mut self, selector: ToolSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Recall from `store`, accepting matches at or above `min_similarity`.
    pub fn with_knowledge(mut self, store: Box<dyn KnowledgeStore>, min_similarity: f64) -> Self {
        self.knowledge = Some(store);
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_consent(mut self, consent: Arc<dyn ConsentGate>) -> Self {
        self.consent = consent;
        self
    }

    /// Add fragments to the knowledge store.
    pub async fn learn(&mut self, knowledge: &[String]) -> Result<()> {
        let Some(store) = self.knowledge.as_mut() else {
            return Err(Error::Config {
                message: "no knowledge store attached to this session".into(),
            });
        };
        store.store(knowledge).await;
        info!(stored = store.len(), "Knowledge loaded");
        Ok(())
    }

    pub fn conversation(&self) -> &Context {
        self.model.context()
    }

    pub fn language_model(&self) -> &ContextAwareLanguageModel {
        &self.model
    }

    /// Run one full turn for `input`.
    pub async fn turn(&mut self, input: &str) -> Result<TurnOutcome> {
        let knowledge = self.recall(input).await?;
        if let Some(text) = &knowledge
            && let Some(history) = self.model.knowledge_history_mut()
        {
            history.append(Message::knowledge(text.as_str()));
        }

        let tool = self.act(input).await;
        if let Some(invocation) = &tool
            && let Some(history) = self.model.tool_history_mut()
        {
            history.append(Message::tool(invocation.to_history_text()));
        }

        let answer = self.model.execute(input.to_string()).await;
        debug!(
            knowledge = knowledge.is_some(),
            tool = tool.as_ref().map(|t| t.tool_name.as_str()),
            "Turn complete"
        );

        Ok(TurnOutcome {
            answer,
            knowledge,
            tool,
        })
    }

    async fn recall(&mut self, input: &str) -> Result<Option<String>> {
        let Some(store) = self.knowledge.as_mut() else {
            return Ok(None);
        };
        if store.is_empty() {
            return Ok(None);
        }
        Ok(store.retrieve(input, self.min_similarity).await?)
    }

    async fn act(&self, input: &str) -> Option<ToolInvocation> {
        let selector = self.selector.as_ref()?;
        let decision = selector.select(self.model.histories(), input).await;
        let tool = decision.tool?;

        if tool.requires_consent() && !self.consent.approve(tool.as_ref(), &decision.input).await {
            info!(tool = %tool.name(), "Tool invocation declined");
            return Some(ToolInvocation {
                tool_name: tool.name().to_string(),
                input: decision.input,
                output: DECLINED.to_string(),
                approved: false,
            });
        }

        let output = match tool.invoke(&decision.input).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %tool.name(), error = %e, "Tool invocation failed");
                format!("Error: {e}")
            }
        };
        info!(tool = %tool.name(), "Tool invoked");

        Some(ToolInvocation {
            tool_name: tool.name().to_string(),
            input: decision.input,
            output,
            approved: true,
        })
    }
}
