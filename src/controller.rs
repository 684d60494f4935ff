//! Async driver that runs session transitions against a gateway

use std::sync::Arc;

use log::info;
use serde_json::Value;

use crate::gateway::{
    Exchange, ExchangeError, RequestGateway, HISTORY_ENDPOINT, PROMPT_ENDPOINT, UPLOAD_ENDPOINT,
};
use crate::models::PromptPayload;
use crate::session::ChatSession;
use crate::upload::UploadFile;

/// Sends a prompt payload to `POST /prompt`
pub async fn send_prompt(
    gateway: &dyn RequestGateway,
    payload: &PromptPayload,
) -> Result<Value, ExchangeError> {
    let exchange = Exchange::post_json(PROMPT_ENDPOINT, payload)?;
    gateway.exchange(exchange).await
}

/// Sends a file batch to `POST /upload_documents` as multipart
pub async fn send_upload(
    gateway: &dyn RequestGateway,
    files: Vec<UploadFile>,
) -> Result<Value, ExchangeError> {
    gateway
        .exchange(Exchange::post_multipart(UPLOAD_ENDPOINT, files))
        .await
}

/// Fetches `GET /get_chat_history`
pub async fn fetch_history(gateway: &dyn RequestGateway) -> Result<Value, ExchangeError> {
    gateway.exchange(Exchange::get(HISTORY_ENDPOINT)).await
}

pub struct ChatController {
    session: ChatSession,
    gateway: Arc<dyn RequestGateway>,
}

impl ChatController {
    pub fn new(session: ChatSession, gateway: Arc<dyn RequestGateway>) -> Self {
        Self { session, gateway }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn gateway(&self) -> Arc<dyn RequestGateway> {
        Arc::clone(&self.gateway)
    }

    /// Submits `text` as a prompt. Returns `false` when the submission was rejected.
    pub async fn submit_prompt(&mut self, text: &str) -> bool {
        if self.session.is_pending() {
            return false;
        }
        self.session.set_input(text);
        let Some(payload) = self.session.begin_prompt() else {
            return false;
        };

        let outcome = send_prompt(self.gateway.as_ref(), &payload).await;
        self.session.complete_prompt(outcome);
        true
    }

    /// Uploads `files`. Returns `false` without any exchange when the list is empty.
    pub async fn upload_files(&mut self, files: Vec<UploadFile>) -> bool {
        self.session.select_files(files);
        let Some(batch) = self.session.begin_upload() else {
            return false;
        };

        info!("[upload_files] Uploading {} files", batch.len());
        let outcome = send_upload(self.gateway.as_ref(), batch).await;
        self.session.complete_upload(&outcome);
        true
    }

    /// Restores earlier messages from the backend; returns how many were appended
    pub async fn load_history(&mut self) -> usize {
        let outcome = fetch_history(self.gateway.as_ref()).await;
        self.session.apply_history(outcome)
    }
}
