use crate::models::{AiConfig, AiProvider};
use crate::services::prompts;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur when calling the completion proxy
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider not configured")]
    NotConfigured,

    #[error("Model {model} does not belong to provider {provider:?}")]
    ProviderMismatch { provider: AiProvider, model: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned error: {0}")]
    Provider(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl AiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AiError::Cancelled)
    }
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Openai => "gpt-4o",
            AiProvider::Claude => "claude-3-5-sonnet-20240620",
            AiProvider::Groq => "llama3-70b-8192",
            AiProvider::Gemini => "gemini-1.5-flash",
            AiProvider::Deepseek => "deepseek-chat",
        }
    }

    /// Gemini is reached through its SDK on the proxy side, so it has no base URL
    pub fn default_base_url(&self) -> &'static str {
        match self {
            AiProvider::Openai => "https://api.openai.com/v1",
            AiProvider::Claude => "https://api.anthropic.com/v1",
            AiProvider::Groq => "https://api.groq.com/openai/v1",
            AiProvider::Gemini => "",
            AiProvider::Deepseek => "https://api.deepseek.com/v1",
        }
    }
}

/// Provider config with defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl AiConfig {
    /// Fill in default model and base URL and reject inconsistent setups
    pub fn resolve(&self) -> Result<ResolvedAiConfig, AiError> {
        if self.api_key.trim().is_empty() {
            return Err(AiError::NotConfigured);
        }

        let model = self
            .model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(self.provider.default_model());

        if model.to_lowercase().contains("deepseek") && self.provider != AiProvider::Deepseek {
            tracing::warn!(
                "Model {} configured under provider {:?}, refusing to guess",
                model,
                self.provider
            );
            return Err(AiError::ProviderMismatch {
                provider: self.provider,
                model: model.to_string(),
            });
        }

        let base_url = self
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(self.provider.default_base_url());

        Ok(ResolvedAiConfig {
            provider: self.provider,
            api_key: self.api_key.clone(),
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }
}

/// Single chat message sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    provider: AiProvider,
    api_key: &'a str,
    base_url: &'a str,
    model: &'a str,
    messages: &'a [ChatMessage],
    json_mode: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    success: bool,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the completion proxy that fronts every AI provider
///
/// One request per call, no retries. Every call takes a cancellation token;
/// cancelling it drops the in-flight request and yields `AiError::Cancelled`.
#[derive(Debug, Clone)]
pub struct AiClient {
    client: Client,
    completion_url: String,
}

impl AiClient {
    pub fn new(completion_url: String, timeout: Duration) -> Result<Self, AiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            completion_url,
        })
    }

    pub fn completion_url(&self) -> &str {
        &self.completion_url
    }

    /// Send messages to the configured provider and return the text payload
    pub async fn completion(
        &self,
        config: Option<&AiConfig>,
        messages: &[ChatMessage],
        json_mode: bool,
        cancel: &CancellationToken,
    ) -> Result<String, AiError> {
        let resolved = config.ok_or(AiError::NotConfigured)?.resolve()?;

        if cancel.is_cancelled() {
            return Err(AiError::Cancelled);
        }

        tracing::debug!(
            "Calling completion: provider={:?}, model={}, json_mode={}",
            resolved.provider,
            resolved.model,
            json_mode
        );

        let body = CompletionRequest {
            provider: resolved.provider,
            api_key: &resolved.api_key,
            base_url: &resolved.base_url,
            model: &resolved.model,
            messages,
            json_mode,
        };

        let request = async {
            let response = self.client.post(&self.completion_url).json(&body).send().await?;
            let status = response.status();
            let text = response.text().await?;

            let parsed = serde_json::from_str::<CompletionResponse>(&text).map_err(|e| {
                AiError::InvalidResponse(format!("status {}: {}", status, e))
            })?;
            Ok::<CompletionResponse, AiError>(parsed)
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Completion cancelled before the provider answered");
                return Err(AiError::Cancelled);
            }
            result = request => result?,
        };

        if !response.success {
            return Err(AiError::Provider(
                response.error.unwrap_or_else(|| "unknown provider error".to_string()),
            ));
        }

        response
            .text
            .ok_or_else(|| AiError::InvalidResponse("Missing text payload".into()))
    }

    /// Rewrite a CV section with the user's provider
    ///
    /// Failures are logged and reported as `None`; cancellation propagates.
    pub async fn improve_text(
        &self,
        config: Option<&AiConfig>,
        text: &str,
        section: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, AiError> {
        let prompt = prompts::improve_text_prompt(text, section);

        match self
            .completion(config, &[ChatMessage::user(prompt)], false, cancel)
            .await
        {
            Ok(improved) => Ok(Some(improved.trim().to_string())),
            Err(AiError::Cancelled) => Err(AiError::Cancelled),
            Err(e) => {
                tracing::error!("AI improvement failed: {}", e);
                Ok(None)
            }
        }
    }
}
