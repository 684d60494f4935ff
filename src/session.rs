//! Chat session state and its transitions.
//!
//! A [`ChatSession`] is owned by exactly one event loop. Network work happens
//! elsewhere; the loop calls a `begin_*` method to get what must be sent, and
//! later feeds the exchange outcome back through the matching `complete_*`.

use log::{error, info, warn};
use serde_json::Value;

use crate::catalog::find_model;
use crate::gateway::{decode_body, ExchangeError, HISTORY_ENDPOINT, PROMPT_ENDPOINT};
use crate::models::{
    HistoryEntry, HistoryResponse, LlmProvider, ModerationLevel, PromptPayload, PromptResponse,
    Sender, Toggles, Transcript,
};
use crate::upload::UploadFile;

#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Transcript,
    input: String,
    toggles: Toggles,
    pending: bool,
    selected_files: Vec<UploadFile>,
}

impl ChatSession {
    /// Starts a session whose transcript opens with `greeting` (skipped when blank)
    pub fn new(greeting: &str, toggles: Toggles) -> Self {
        let mut transcript = Transcript::new();
        if !greeting.trim().is_empty() {
            transcript.push(Sender::System, greeting);
        }
        Self {
            transcript,
            input: String::new(),
            toggles,
            pending: false,
            selected_files: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn selected_files(&self) -> &[UploadFile] {
        &self.selected_files
    }

    pub fn select_files(&mut self, files: Vec<UploadFile>) {
        self.selected_files = files;
    }

    // Toggles

    pub fn set_dlp_enabled(&mut self, enabled: bool) {
        self.toggles.dlp_enabled = enabled;
    }

    pub fn set_moderation_enabled(&mut self, enabled: bool) {
        self.toggles.moderation_enabled = enabled;
    }

    pub fn set_moderation_level(&mut self, level: ModerationLevel) {
        self.toggles.moderation_level = level;
    }

    /// Switches provider; a selected model the new provider does not offer is dropped
    pub fn set_provider(&mut self, provider: Option<LlmProvider>) {
        self.toggles.provider = provider;
        let keep_model = match (provider, self.toggles.model.as_deref()) {
            (Some(provider), Some(model)) => find_model(provider, model).is_some(),
            _ => false,
        };
        if !keep_model {
            self.toggles.model = None;
        }
    }

    pub fn set_model(&mut self, model: Option<String>) {
        self.toggles.model = model;
    }

    // Prompt submission

    /// Begins submitting the current input.
    ///
    /// Returns `None` without touching the transcript when the input is blank
    /// or another submission is still pending. Otherwise the user message is
    /// appended right away and the payload to send is returned.
    pub fn begin_prompt(&mut self) -> Option<PromptPayload> {
        if self.pending {
            info!("[begin_prompt] Submission already pending, ignoring");
            return None;
        }
        if self.input.trim().is_empty() {
            return None;
        }

        self.pending = true;
        let text = self.input.clone();
        self.transcript.push(Sender::User, text.clone());
        Some(PromptPayload::new(text, &self.toggles))
    }

    /// Applies the outcome of a `/prompt` exchange and returns the appended message id
    pub fn complete_prompt(&mut self, outcome: Result<Value, ExchangeError>) -> u64 {
        let reply = outcome.and_then(|body| decode_body::<PromptResponse>(PROMPT_ENDPOINT, body));

        let id = match reply {
            Ok(reply) => self.transcript.push(Sender::System, reply.response.text),
            Err(e) => {
                error!("[complete_prompt] {}", e);
                self.transcript.push(Sender::System, format!("Error: {}", e))
            }
        };

        self.pending = false;
        self.input.clear();
        id
    }

    // Uploads

    /// Snapshot of the selected batch to upload, `None` when nothing is selected
    pub fn begin_upload(&self) -> Option<Vec<UploadFile>> {
        if self.selected_files.is_empty() {
            None
        } else {
            Some(self.selected_files.clone())
        }
    }

    /// Logs the upload outcome and clears the selected batch
    pub fn complete_upload(&mut self, outcome: &Result<Value, ExchangeError>) {
        match outcome {
            Ok(body) => info!("[complete_upload] {}", body),
            Err(e) => error!("[complete_upload] {}", e),
        }
        self.selected_files.clear();
    }

    // History

    /// Appends each stored history entry as its own message.
    ///
    /// Failures are logged and leave the transcript untouched. Returns the
    /// number of messages appended.
    pub fn apply_history(&mut self, outcome: Result<Value, ExchangeError>) -> usize {
        let history =
            outcome.and_then(|body| decode_body::<HistoryResponse>(HISTORY_ENDPOINT, body));

        let entries = match history {
            Ok(history) => history.history_messages.unwrap_or_default(),
            Err(e) => {
                warn!("[apply_history] Could not load chat history: {}", e);
                return 0;
            }
        };

        let count = entries.len();
        for entry in entries {
            let (sender, text) = HistoryEntry::into_parts(entry);
            self.transcript.push(sender, text);
        }
        info!("[apply_history] Restored {} messages", count);
        count
    }
}
