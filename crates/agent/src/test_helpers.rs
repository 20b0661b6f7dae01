//! Scripted collaborators for unit tests.

use async_trait::async_trait;
use pipewright_core::error::{ProviderError, ToolError};
use pipewright_core::provider::{Embedder, Embedding, LanguageModel};
use pipewright_core::tool::Tool;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A language model that replays canned outputs and records every prompt.
pub struct ScriptedModel {
    outputs: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(outputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// The prompt sent on call `index` (zero-based).
    pub fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted model ran out of outputs")
    }
}

/// A tool that echoes its arguments and counts invocations.
pub struct StubTool {
    name: String,
    consent: bool,
    fail: bool,
    calls: AtomicUsize,
}

impl StubTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            consent: false,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn needing_consent(mut self) -> Self {
        self.consent = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for StubTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echoes its input."
    }

    fn input_example(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn output_example(&self) -> &str {
        "ran with {}"
    }

    fn requires_consent(&self) -> bool {
        self.consent
    }

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ToolError::ExecutionFailed {
                tool_name: self.name.clone(),
                reason: "stub failure".into(),
            });
        }
        Ok(format!("ran with {arguments}"))
    }
}

/// Embeds by keyword: each axis counts one keyword's occurrences.
pub struct KeywordEmbedder {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&'static str]) -> Self {
        Self {
            keywords: keywords.to_vec(),
        }
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    fn name(&self) -> &str {
        "keywords"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.keywords
                    .iter()
                    .map(|k| lower.matches(k).count() as f64)
                    .collect()
            })
            .collect())
    }
}
