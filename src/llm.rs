use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions client for the Mistral API (OpenAI-compatible wire format).
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Non-streaming chat completion. Sampling parameters are fixed for
    /// reporting use: low temperature, bounded output.
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.1,
            "top_p": 0.9,
            "max_tokens": 1024,
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("LLM request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("Failed to read LLM response")?;
        if !status.is_success() {
            bail!(
                "LLM API returned {}: {}",
                status,
                text.chars().take(300).collect::<String>()
            );
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse LLM JSON")?;

        // An empty content string is a valid (if useless) reply; a body
        // without the field at all is malformed and surfaces as an error.
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .context("LLM response missing choices[0].message.content")?
            .to_string();

        Ok(content)
    }

    /// One-off completion from a single user prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[Message::user(prompt)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(base_url: &str) -> LlmClient {
        LlmClient::new(&LlmSettings {
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            api_key: "test-key".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_from_bare_host() {
        let c = client_with_base("https://api.mistral.ai");
        assert_eq!(c.endpoint(), "https://api.mistral.ai/v1/chat/completions");
    }

    #[test]
    fn test_endpoint_from_v1_base() {
        let c = client_with_base("https://api.mistral.ai/v1/");
        assert_eq!(c.endpoint(), "https://api.mistral.ai/v1/chat/completions");
    }

    #[test]
    fn test_endpoint_already_complete() {
        let c = client_with_base("http://localhost:9999/v1/chat/completions");
        assert_eq!(c.endpoint(), "http://localhost:9999/v1/chat/completions");
    }
}
