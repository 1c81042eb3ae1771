use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::domain::completion_service::{AnalysisServiceError, CompletionService};
use crate::shared::constants::{
    DEFAULT_COMPLETION_BASE_URL, DEFAULT_COMPLETION_MODEL, DEFAULT_COMPLETION_TIMEOUT_SECS,
};

const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Connection settings for an OpenAI-compatible chat completion endpoint.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Read the credential from the environment at startup. A missing key
    /// is fatal before any audio work begins, never mid-request.
    pub fn from_env() -> Result<Self, AnalysisServiceError> {
        Self::from_key(std::env::var(API_KEY_ENV_VAR).ok())
    }

    fn from_key(api_key: Option<String>) -> Result<Self, AnalysisServiceError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(AnalysisServiceError::MissingCredential(API_KEY_ENV_VAR))?;
        Ok(Self {
            api_key,
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Blocking chat-completion client for any OpenAI-compatible backend.
///
/// Docs: https://platform.openai.com/docs/api-reference/chat/create
///
/// One request per `complete` call, explicit timeout, first choice only.
pub struct OpenAiCompletionService {
    client: reqwest::blocking::Client,
    config: OpenAiConfig,
}

impl OpenAiCompletionService {
    pub fn new(config: OpenAiConfig) -> Result<Self, AnalysisServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

impl CompletionService for OpenAiCompletionService {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalysisServiceError> {
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        log::debug!(
            "completion request to {endpoint}, model {}, {} prompt chars",
            self.config.model,
            user_prompt.len()
        );

        let request_body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AnalysisServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json()?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AnalysisServiceError::EmptyCompletion);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_a_credential_error() {
        let err = OpenAiConfig::from_key(None).unwrap_err();
        assert!(matches!(
            err,
            AnalysisServiceError::MissingCredential("OPENAI_API_KEY")
        ));
    }

    #[test]
    fn test_blank_key_is_a_credential_error() {
        let err = OpenAiConfig::from_key(Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::MissingCredential(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::from_key(Some("sk-test".to_string())).unwrap();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_config_overrides() {
        let config = OpenAiConfig::from_key(Some("sk-test".to_string()))
            .unwrap()
            .with_base_url("http://localhost:8080/v1".to_string())
            .with_model("llama-3".to_string())
            .with_timeout(Duration::from_secs(10));
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "llama-3");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_unreachable_backend_is_a_transport_error() {
        let config = OpenAiConfig::from_key(Some("sk-test".to_string()))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/v1".to_string())
            .with_timeout(Duration::from_secs(1));
        let service = OpenAiCompletionService::new(config).unwrap();
        let err = service.complete("system", "user").unwrap_err();
        assert!(matches!(err, AnalysisServiceError::Transport(_)));
    }
}
