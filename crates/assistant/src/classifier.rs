//! The external text classifier seam.
//!
//! [`Classifier`] is the only thing the adapter needs from the LLM side, so
//! tests can script replies without any network. [`OpenAiClassifier`] is the
//! production implementation: an OpenAI-compatible chat-completions call with
//! a bounded timeout, a low deterministic temperature and JSON-only output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ClassifierError;

/// System instruction plus the user's free text.
#[derive(Clone, Debug)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// One transaction candidate extracted from the text.
///
/// The wire shape is loose on purpose: the classifier may send the category
/// under `categoryId` or `category`, and any field except `amount` and `type`
/// may be missing. Defaulting happens here, once, at the adapter boundary.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub description: Option<String>,
    /// Major units, e.g. `22.5`.
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, alias = "category")]
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: LineKind,
}

/// The classifier only ever emits income or expense candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Income,
    Expense,
}

/// The strict JSON object the classifier is asked to produce.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierReply {
    #[serde(default)]
    pub transactions: Vec<LineItem>,
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default)]
    pub clarification_question: Option<String>,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, prompt: &Prompt) -> Result<ClassifierReply, ClassifierError>;
}

/// Configuration for [`OpenAiClassifier`].
#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ClassifierConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct OpenAiClassifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClassifierError::Network(err.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
            model: config.model,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, prompt: &Prompt) -> Result<ClassifierReply, ClassifierError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.3,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ClassifierError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClassifierError::Auth);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClassifierError::RateLimited);
        }
        if status.is_server_error() {
            return Err(ClassifierError::Upstream(format!("status {status}")));
        }
        if !status.is_success() {
            return Err(ClassifierError::Upstream(format!(
                "unexpected status {status}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ClassifierError::Malformed(err.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ClassifierError::Malformed("empty completion".to_string()))?;

        serde_json::from_str(&content)
            .map_err(|err| ClassifierError::Malformed(format!("invalid reply JSON: {err}")))
    }
}
