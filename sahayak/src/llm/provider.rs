use std::sync::Arc;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{Result, SahayakError};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub stop: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    LlmBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    LlmBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        Self {
            backend,
            config: Some(Arc::new(config.clone())),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        let client = self.client()?;
        client.complete(prompt, system_prompt, options).await
    }

    pub async fn complete_vision(
        &self,
        prompt: &str,
        image_data_url: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        let client = self.client()?;
        client.complete_vision(prompt, image_data_url, options).await
    }

    fn client(&self) -> Result<LlmApiClient> {
        if !self.is_available() {
            return Err(SahayakError::LlmUnavailable(self.unavailable_reason()));
        }

        let config = self
            .config()
            .ok_or_else(|| SahayakError::LlmUnavailable("No config available".to_string()))?;

        LlmApiClient::new(config)
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM completion is not available".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_unavailable_without_config() {
        let provider = LlmProvider::new(None);
        assert!(!provider.is_available());
        assert!(matches!(
            provider.backend(),
            LlmBackend::Unavailable { .. }
        ));
    }

    #[test]
    fn test_provider_backend_detection() {
        let config = LlmConfig {
            model: "openrouter/meta-llama/llama-3-8b".to_string(),
            vision_model: None,
            api_key: Some("key".to_string()),
            base_url: None,
            timeout_secs: 30,
            max_retries: 3,
        };
        let provider = LlmProvider::new(Some(&config));
        assert!(provider.is_available());
        assert_eq!(*provider.backend(), LlmBackend::OpenRouter);
    }

    #[test]
    fn test_provider_openai_compatible_via_base_url() {
        let config = LlmConfig {
            model: "custom-model".to_string(),
            vision_model: None,
            api_key: None,
            base_url: Some("http://inference.local/v1".to_string()),
            timeout_secs: 30,
            max_retries: 3,
        };
        let provider = LlmProvider::new(Some(&config));
        assert_eq!(
            *provider.backend(),
            LlmBackend::OpenAICompatible {
                base_url: "http://inference.local/v1".to_string()
            }
        );
    }
}
