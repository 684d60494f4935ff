//! HTTP exchange with the chat backend.
//!
//! Every call is a single attempt: no retries, no timeout, no backoff.
//! Failures of any kind come back as an [`ExchangeError`].

use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::ApiErrorBody;
use crate::upload::UploadFile;

pub const PROMPT_ENDPOINT: &str = "/prompt";
pub const UPLOAD_ENDPOINT: &str = "/upload_documents";
pub const HISTORY_ENDPOINT: &str = "/get_chat_history";

/// Multipart field name used for every uploaded file
pub const UPLOAD_FIELD: &str = "files";

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Network unreachable, connection reset, unreadable body
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status with a structured error body
    #[error("{error}\nMessage: {message}")]
    Application {
        endpoint: String,
        status: u16,
        error: String,
        message: String,
    },

    /// Body was not the JSON we can read at all
    #[error("Malformed response from {endpoint} (HTTP {status}): {source}")]
    Malformed {
        endpoint: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Body was JSON but not the expected shape
    #[error("Unexpected response shape from {endpoint}: {source}")]
    Schema {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request for {endpoint}: {message}")]
    Encode { endpoint: String, message: String },
}

/// Request body, which also decides the content type
#[derive(Debug, Clone)]
pub enum ExchangeBody {
    Json(Value),
    Multipart(Vec<UploadFile>),
    Empty,
}

impl ExchangeBody {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            ExchangeBody::Json(_) => Some("application/json"),
            ExchangeBody::Multipart(_) => Some("multipart/form-data"),
            ExchangeBody::Empty => None,
        }
    }
}

/// One request to send
#[derive(Debug, Clone)]
pub struct Exchange {
    pub endpoint: String,
    pub method: Method,
    pub body: ExchangeBody,
}

impl Exchange {
    /// `POST` with a JSON body, the default shape of an exchange
    pub fn post_json<T: Serialize>(
        endpoint: impl Into<String>,
        payload: &T,
    ) -> Result<Self, ExchangeError> {
        let endpoint = endpoint.into();
        let body = serde_json::to_value(payload).map_err(|e| ExchangeError::Encode {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            endpoint,
            method: Method::POST,
            body: ExchangeBody::Json(body),
        })
    }

    /// `POST` with one multipart part per file
    pub fn post_multipart(endpoint: impl Into<String>, files: Vec<UploadFile>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::POST,
            body: ExchangeBody::Multipart(files),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::GET,
            body: ExchangeBody::Empty,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Anything that can carry an [`Exchange`] to the backend
#[async_trait]
pub trait RequestGateway: Send + Sync {
    async fn exchange(&self, exchange: Exchange) -> Result<Value, ExchangeError>;
}

/// Validates a successful body against the shape the caller expects
pub fn decode_body<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, ExchangeError> {
    serde_json::from_value(body).map_err(|source| ExchangeError::Schema {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Gateway backed by a reqwest client and a base URL
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn build_form(
        endpoint: &str,
        files: Vec<UploadFile>,
    ) -> Result<reqwest::multipart::Form, ExchangeError> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)
                .map_err(|e| ExchangeError::Encode {
                    endpoint: endpoint.to_string(),
                    message: format!("Failed to create multipart: {}", e),
                })?;
            form = form.part(UPLOAD_FIELD, part);
        }
        Ok(form)
    }

    fn application_error(endpoint: &str, status: StatusCode, body: &str) -> ExchangeError {
        let parsed: ApiErrorBody = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(source) => {
                return ExchangeError::Malformed {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    source,
                }
            }
        };

        for warning in parsed.warning_lines() {
            warn!("[exchange] {} warning: {}", endpoint, warning);
        }

        ExchangeError::Application {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            error: parsed.error.unwrap_or_else(|| status.to_string()),
            message: parsed.error_message.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn exchange(&self, exchange: Exchange) -> Result<Value, ExchangeError> {
        let Exchange {
            endpoint,
            method,
            body,
        } = exchange;
        let url = self.url(&endpoint);
        info!(
            "[exchange] {} {} ({})",
            method,
            url,
            body.content_type().unwrap_or("no body")
        );

        let mut request = self.client.request(method, &url);
        request = match body {
            ExchangeBody::Json(value) => request.json(&value),
            ExchangeBody::Multipart(files) => {
                request.multipart(Self::build_form(&endpoint, files)?)
            }
            ExchangeBody::Empty => request,
        };

        let transport = |source| ExchangeError::Transport {
            endpoint: endpoint.clone(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let error = Self::application_error(&endpoint, status, &text);
            warn!("[exchange] {} failed with {}: {}", endpoint, status, error);
            return Err(error);
        }

        serde_json::from_str(&text).map_err(|source| ExchangeError::Malformed {
            endpoint: endpoint.clone(),
            status: status.as_u16(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_base_and_endpoint_with_one_slash() {
        let gateway = HttpGateway::new("http://rag.local/");
        assert_eq!(gateway.url("/prompt"), "http://rag.local/prompt");
        assert_eq!(gateway.url("get_chat_history"), "http://rag.local/get_chat_history");
    }

    #[test]
    fn application_error_combines_error_and_message() {
        let body = r#"{"error":"E1","errorMessage":"bad","warnings":["w"]}"#;
        let error =
            HttpGateway::application_error("/prompt", StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(error.to_string(), "E1\nMessage: bad");
        assert!(matches!(error, ExchangeError::Application { status: 500, .. }));
    }

    #[test]
    fn odd_warnings_keep_the_error_text() {
        for body in [
            r#"{"error":"E1","errorMessage":"bad","warnings":null}"#,
            r#"{"error":"E1","errorMessage":"bad","warnings":[{"code":1}, "w"]}"#,
            r#"{"error":"E1","errorMessage":"bad","warnings":"just one"}"#,
            r#"{"error":"E1","errorMessage":"bad"}"#,
        ] {
            let error =
                HttpGateway::application_error("/prompt", StatusCode::INTERNAL_SERVER_ERROR, body);
            assert_eq!(error.to_string(), "E1\nMessage: bad", "body: {}", body);
        }
    }

    #[test]
    fn warning_lines_flatten_any_shape() {
        let parsed: ApiErrorBody =
            serde_json::from_str(r#"{"warnings":[{"code":1}, "w"]}"#).unwrap();
        assert_eq!(
            parsed.warning_lines(),
            vec![r#"{"code":1}"#.to_string(), "w".to_string()]
        );

        let parsed: ApiErrorBody = serde_json::from_str(r#"{"warnings":null}"#).unwrap();
        assert!(parsed.warning_lines().is_empty());
    }

    #[test]
    fn unparseable_error_body_is_malformed() {
        let error = HttpGateway::application_error("/prompt", StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(error, ExchangeError::Malformed { status: 502, .. }));
    }

    #[test]
    fn exchange_shapes_pick_method_and_content_type() {
        let post = Exchange::post_json(PROMPT_ENDPOINT, &json!({"prompt": "x"})).unwrap();
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.body.content_type(), Some("application/json"));

        let upload = Exchange::post_multipart(UPLOAD_ENDPOINT, Vec::new());
        assert_eq!(upload.body.content_type(), Some("multipart/form-data"));

        let get = Exchange::get(HISTORY_ENDPOINT);
        assert_eq!(get.method, Method::GET);
        assert_eq!(get.body.content_type(), None);

        let put = Exchange::get("/x").with_method(Method::PUT);
        assert_eq!(put.method, Method::PUT);
    }

    #[test]
    fn decode_body_reports_schema_mismatch() {
        let err =
            decode_body::<crate::models::PromptResponse>(PROMPT_ENDPOINT, json!({"text": "hi"}))
                .unwrap_err();
        assert!(matches!(err, ExchangeError::Schema { .. }));
    }
}
