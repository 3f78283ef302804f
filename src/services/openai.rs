//! OpenAI-compatible chat completions backend.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use super::{
    ServiceError,
    ServiceKind,
    ServiceSettings,
    TResult,
    TService,
    TServiceArgs,
    TString,
};

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    /// Model name.
    model: String,
    /// System and user messages.
    messages: Vec<ChatMessage>,
    /// Requested reply format.
    response_format: ResponseFormat,
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatMessage {
    /// `system`, `user` or `assistant`.
    role: String,
    /// Message text.
    #[serde(default)]
    content: Option<String>,
}

/// `response_format` of a chat request.
#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    /// Always `json_object`.
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    /// Completions; only the first is used.
    choices: Vec<ChatChoice>,
}

/// One completion.
#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    /// Assistant message.
    message: ChatMessage,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    /// Error details.
    error: ErrorDetail,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
struct ErrorDetail {
    /// Human-readable error message.
    message: String,
}

/// Translates batches through an OpenAI-compatible API.
///
/// Batches of `batch_size` strings are sent concurrently. Keys missing from a
/// reply are left out of the results.
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    /// Bearer token.
    api_key: String,
    /// API base URL without a trailing `/`.
    base_url: String,
    /// Model name.
    model: String,
    /// Max strings per request.
    batch_size: usize,
    /// Shared HTTP client.
    http_client: Client,
}

impl OpenAiTranslator {
    /// Creates a translator from the service settings.
    ///
    /// # Errors
    /// - Missing API key
    /// - HTTP client construction failure
    pub fn new(settings: &ServiceSettings) -> Result<Self, ServiceError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ServiceError::MissingCredential(ServiceKind::OpenAi.name().to_string()))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        tracing::info!(model = %settings.model, base_url = %settings.base_url, "Initialized OpenAI translator");

        Ok(Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            batch_size: settings.batch_size.max(1),
            http_client,
        })
    }

    /// Builds the chat request for one batch.
    fn build_request(&self, args: &TServiceArgs, batch: &[TString]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: build_messages(args, batch),
            response_format: ResponseFormat { format_type: "json_object".to_string() },
        }
    }

    /// Sends one batch and parses the reply.
    async fn translate_batch(
        &self,
        args: &TServiceArgs,
        batch: &[TString],
    ) -> Result<Vec<TResult>, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::trace!(url = %url, count = batch.len(), "Sending translation batch");

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.build_request(args, batch))
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ServiceError::Api("Authentication failed".to_string()));
            }
            return Err(match response.json::<ErrorResponse>().await {
                Ok(error) => {
                    tracing::error!(status = %status, message = %error.error.message, "OpenAI API error");
                    ServiceError::Api(error.error.message)
                }
                Err(e) => {
                    tracing::error!(status = %status, parse_error = %e, "Failed to parse error response");
                    ServiceError::Api(format!("HTTP {status}"))
                }
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::InvalidResponse("empty completion".to_string()))?;

        parse_reply(&content, batch)
    }
}

#[async_trait]
impl TService for OpenAiTranslator {
    async fn translate_strings(&self, args: &TServiceArgs) -> Result<Vec<TResult>, ServiceError> {
        let batches = args.strings.chunks(self.batch_size).map(|batch| self.translate_batch(args, batch));

        let mut results = Vec::with_capacity(args.strings.len());
        for batch_result in join_all(batches).await {
            results.extend(batch_result?);
        }

        tracing::info!(requested = args.strings.len(), translated = results.len(), "OpenAI translation finished");
        Ok(results)
    }
}

/// Builds the system and user messages for one batch.
fn build_messages(args: &TServiceArgs, batch: &[TString]) -> Vec<ChatMessage> {
    let mut system = format!(
        "You are a professional translator. Translate every value of the JSON object in the user \
         message from '{}' to '{}'. Reply with a JSON object that has exactly the same keys. Keep \
         tokens like <x id=\"0\"/> unchanged.",
        args.src_lng, args.target_lng
    );
    if !args.prompt.trim().is_empty() {
        system.push_str("\n\n");
        system.push_str(args.prompt.trim());
    }

    let texts: Map<String, Value> =
        batch.iter().map(|s| (s.key.clone(), Value::String(s.value.clone()))).collect();
    let contexts: Map<String, Value> = batch
        .iter()
        .filter_map(|s| s.context.as_ref().map(|c| (s.key.clone(), Value::String(c.clone()))))
        .collect();

    if !contexts.is_empty() {
        system.push_str("\n\nContext for some keys (do not translate it): ");
        system.push_str(&Value::Object(contexts).to_string());
    }
    let user = Value::Object(texts).to_string();

    vec![
        ChatMessage { role: "system".to_string(), content: Some(system) },
        ChatMessage { role: "user".to_string(), content: Some(user) },
    ]
}

/// Extracts translations for the requested keys from a reply.
fn parse_reply(content: &str, batch: &[TString]) -> Result<Vec<TResult>, ServiceError> {
    let trimmed = content.trim();
    let json_text = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    let reply: Map<String, Value> = serde_json::from_str(json_text.trim())
        .map_err(|e| ServiceError::InvalidResponse(format!("reply is not a JSON object: {e}")))?;

    let results: Vec<TResult> = batch
        .iter()
        .filter_map(|s| match reply.get(&s.key) {
            Some(Value::String(text)) if !text.is_empty() => {
                Some(TResult { key: s.key.clone(), translated: text.clone() })
            }
            _ => None,
        })
        .collect();

    if results.len() < batch.len() {
        tracing::warn!(
            missing = batch.len() - results.len(),
            "Translation reply omitted some keys"
        );
    }
    Ok(results)
}
