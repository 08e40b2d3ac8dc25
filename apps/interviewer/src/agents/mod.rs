//! Agents: one prompt-building + completion call per extraction or generation task.
//!
//! Every agent goes through `AgentRunner::invoke`, which is the failure boundary:
//! client errors are logged there and turned into `None`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error};

use crate::config::{OutputMode, PipelineConfig};
use crate::llm_client::prompts::{INTERVIEWER_SYSTEM, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{
    strip_json_fences, ChatMessage, ClientError, Completion, CompletionBackend, CompletionRequest,
    ToolSpec,
};
use crate::models::{MismatchNote, Question, QuestionSet, ResumeProfile};

pub mod extraction;
pub mod mismatch;
pub mod prompts;
pub mod questions;
pub mod schemas;

pub use extraction::extract_resume_profile;
pub use mismatch::detect_mismatch;
pub use questions::{generate_general_questions, generate_resume_questions, generate_role_questions};

// ────────────────────────────────────────────────────────────────────────────
// Decoding completions into agent outputs
// ────────────────────────────────────────────────────────────────────────────

/// Conversion from a raw completion into an agent's typed output.
pub trait FromCompletion: Sized {
    fn from_completion(completion: Completion) -> Result<Self, ClientError>;
}

impl FromCompletion for ResumeProfile {
    fn from_completion(completion: Completion) -> Result<Self, ClientError> {
        match completion {
            Completion::Structured(value) => Ok(serde_json::from_value(value)?),
            // Unstructured replies are kept as opaque description text.
            Completion::Text(text) => Ok(serde_json::from_str(strip_json_fences(&text))
                .unwrap_or_else(|_| ResumeProfile::from_description(&text))),
        }
    }
}

impl FromCompletion for MismatchNote {
    fn from_completion(completion: Completion) -> Result<Self, ClientError> {
        match completion {
            Completion::Structured(value) => Ok(serde_json::from_value(value)?),
            Completion::Text(text) => Ok(serde_json::from_str(strip_json_fences(&text))
                .unwrap_or_else(|_| MismatchNote {
                    mismatch_note: text.trim().to_string(),
                })),
        }
    }
}

/// Models answer either `{"questions": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsReply {
    Wrapped(QuestionSet),
    Bare(Vec<Question>),
}

impl From<QuestionsReply> for QuestionSet {
    fn from(reply: QuestionsReply) -> Self {
        match reply {
            QuestionsReply::Wrapped(set) => set,
            QuestionsReply::Bare(questions) => QuestionSet { questions },
        }
    }
}

impl FromCompletion for QuestionSet {
    fn from_completion(completion: Completion) -> Result<Self, ClientError> {
        let reply: QuestionsReply = match completion {
            Completion::Structured(value) => serde_json::from_value(value)?,
            Completion::Text(text) => serde_json::from_str(strip_json_fences(&text))?,
        };
        Ok(reply.into())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Runner
// ────────────────────────────────────────────────────────────────────────────

/// Sends agent prompts to a completion backend in either structured (tool call)
/// or text mode. Agent logic is identical in both modes.
#[derive(Clone)]
pub struct AgentRunner {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    seed: Option<u64>,
    mode: OutputMode,
}

impl AgentRunner {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &PipelineConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            seed: config.seed,
            mode: config.output_mode,
        }
    }

    /// Builds the request for `prompt`. In text mode the tool is not sent and
    /// its schema is inlined into the prompt instead.
    pub fn build_request(&self, prompt: String, tool: ToolSpec) -> CompletionRequest {
        let (content, tool) = match self.mode {
            OutputMode::Structured => (prompt, Some(tool)),
            OutputMode::Text => {
                let schema = serde_json::to_string_pretty(&tool.parameters).unwrap_or_default();
                (
                    format!(
                        "{prompt}\n\n{JSON_ONLY_INSTRUCTION}\nThe JSON must match this schema:\n{schema}"
                    ),
                    None,
                )
            }
        };

        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(INTERVIEWER_SYSTEM),
                ChatMessage::user(content),
            ],
            tool,
            seed: self.seed,
        }
    }

    /// One completion call. Never fails: errors are logged and become `None`.
    pub async fn invoke(&self, prompt: String, tool: ToolSpec) -> Option<Completion> {
        let tool_name = tool.name;
        let request = self.build_request(prompt, tool);
        match self.backend.complete(&request).await {
            Ok(completion) => Some(completion),
            Err(e) => {
                error!("{tool_name}: completion failed: {e}");
                None
            }
        }
    }

    /// `invoke` followed by decoding into `T`. Decode failures are logged and
    /// become `None` as well.
    pub async fn invoke_as<T: FromCompletion>(&self, prompt: String, tool: ToolSpec) -> Option<T> {
        let tool_name = tool.name;
        let completion = self.invoke(prompt, tool).await?;
        debug!("{tool_name}: raw completion {completion:?}");
        match T::from_completion(completion) {
            Ok(output) => Some(output),
            Err(e) => {
                error!("{tool_name}: could not decode reply: {e}");
                None
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scripted backend shared by agent and pipeline tests
// ────────────────────────────────────────────────────────────────────────────
