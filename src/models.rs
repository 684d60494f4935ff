//! Data models and structures used throughout the application

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::System => "system",
        }
    }
}

/// Represents a single chat message shown in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Local>,
}

/// Append-only, ordered list of messages for one session.
///
/// Ids are handed out by the transcript itself and grow strictly, so
/// iteration order is display order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a message and returns its id
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.messages.push(Message {
            id,
            sender,
            text: text.into(),
            created_at: Local::now(),
        });
        id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages appended after the first `seen` entries
    pub fn since(&self, seen: usize) -> &[Message] {
        self.messages.get(seen..).unwrap_or(&[])
    }
}

/// LLM backend family the prompt should be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    VertexAi,
    Huggingface,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::VertexAi => "vertex_ai",
            LlmProvider::Huggingface => "huggingface",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LlmProvider::VertexAi => "Vertex AI",
            LlmProvider::Huggingface => "HuggingFace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertex_ai" | "vertex" | "vertexai" => Some(LlmProvider::VertexAi),
            "huggingface" | "hf" => Some(LlmProvider::Huggingface),
            _ => None,
        }
    }
}

/// Text moderation threshold, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ModerationLevel(u8);

impl ModerationLevel {
    pub const MAX: u8 = 100;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ModerationLevel {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u8> for ModerationLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            Err(format!(
                "Moderation level must be between 0 and {}, got {}",
                Self::MAX,
                value
            ))
        } else {
            Ok(Self(value))
        }
    }
}

impl From<ModerationLevel> for u8 {
    fn from(level: ModerationLevel) -> Self {
        level.0
    }
}

/// Feature toggles attached to every outgoing prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toggles {
    pub dlp_enabled: bool,
    pub moderation_enabled: bool,
    pub moderation_level: ModerationLevel,
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
}

/// Body of `POST /prompt`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    pub prompt: String,
    pub nlp_filter_level_enabled: bool,
    pub nlp_filter_level: u8,
    pub dlp_enabled: bool,
    pub inspect_template: Option<String>,
    pub deidentify_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<LlmProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
}

impl PromptPayload {
    pub fn new(prompt: impl Into<String>, toggles: &Toggles) -> Self {
        Self {
            prompt: prompt.into(),
            nlp_filter_level_enabled: toggles.moderation_enabled,
            nlp_filter_level: toggles.moderation_level.get(),
            dlp_enabled: toggles.dlp_enabled,
            inspect_template: None,
            deidentify_template: None,
            llm_provider: toggles.provider,
            llm_model: toggles.model.clone(),
        }
    }
}

/// Successful `POST /prompt` response
#[derive(Debug, Clone, Deserialize)]
pub struct PromptResponse {
    pub response: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub text: String,
}

/// Structured error body returned with a non-success status
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Whatever the backend attached; only ever logged
    #[serde(default)]
    pub warnings: Option<Value>,
}

impl ApiErrorBody {
    /// Warnings as log lines, one per array item or a single line otherwise
    pub fn warning_lines(&self) -> Vec<String> {
        let text = |value: &Value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match &self.warnings {
            None => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(text).collect(),
            Some(other) => vec![text(other)],
        }
    }
}

/// `GET /get_chat_history` response
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub history_messages: Option<Vec<HistoryEntry>>,
}

/// One stored chat entry as the backend reports it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Text(String),
    Record {
        #[serde(default, alias = "role")]
        sender: Option<String>,
        #[serde(alias = "content")]
        text: String,
    },
}

impl HistoryEntry {
    pub fn into_parts(self) -> (Sender, String) {
        match self {
            HistoryEntry::Text(text) => (Sender::System, text),
            HistoryEntry::Record { sender, text } => {
                let sender = match sender.as_deref() {
                    Some("user") => Sender::User,
                    _ => Sender::System,
                };
                (sender, text)
            }
        }
    }
}
