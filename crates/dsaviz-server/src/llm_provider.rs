//! Upstream generation capability.
//!
//! [`Generator`] is the seam between the pipeline and whatever produces the
//! trace text; [`HttpGenerator`] is the production implementation speaking
//! either the credentialed gateway protocol or an OpenAI-compatible chat
//! API. The raw response body is returned untouched: interpreting it is the
//! normalizer's job.

use async_trait::async_trait;
use dsaviz_core::Prompt;
use serde_json::{json, Value};

use crate::config::{SamplingParams, UpstreamConfig, UpstreamProvider};

/// Transport-level failures reaching the upstream service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request could not be sent or the body could not be read.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("upstream returned status {status}")]
    Status { status: u16 },
}

/// Produces raw trace text for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &Prompt,
        sampling: &SamplingParams,
    ) -> Result<String, UpstreamError>;

    fn provider_name(&self) -> &'static str;
}

/// HTTP client for the configured upstream.
pub struct HttpGenerator {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpGenerator {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(HttpGenerator { client, config })
    }

    fn endpoint(&self) -> String {
        match self.config.provider {
            UpstreamProvider::Internal => self.config.endpoint_url.clone(),
            UpstreamProvider::OpenAiCompatible => format!(
                "{}/chat/completions",
                self.config.endpoint_url.trim_end_matches('/')
            ),
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        prompt: &Prompt,
        sampling: &SamplingParams,
    ) -> Result<String, UpstreamError> {
        let body = request_body(&self.config, prompt, sampling);
        let mut req = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body);

        if self.config.provider == UpstreamProvider::OpenAiCompatible {
            req = req.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = req.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body_text, "upstream rejected request");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        Ok(body_text)
    }

    fn provider_name(&self) -> &'static str {
        match self.config.provider {
            UpstreamProvider::Internal => "internal",
            UpstreamProvider::OpenAiCompatible => "openai_compatible",
        }
    }
}

fn messages(prompt: &Prompt) -> Value {
    json!([
        { "role": "system", "content": prompt.system_message },
        { "role": "user", "content": prompt.user_message }
    ])
}

/// Builds the JSON request body for the configured provider.
pub fn request_body(config: &UpstreamConfig, prompt: &Prompt, sampling: &SamplingParams) -> Value {
    match config.provider {
        UpstreamProvider::Internal => json!({
            "username": config.username,
            "password": config.password,
            "api": config.api_id,
            "request": {
                "messages": messages(prompt),
                "max_tokens": sampling.max_output_tokens,
                "temperature": sampling.temperature
            },
            "temperature": sampling.temperature
        }),
        UpstreamProvider::OpenAiCompatible => json!({
            "model": config.model,
            "messages": messages(prompt),
            "max_tokens": sampling.max_output_tokens,
            "temperature": sampling.temperature
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn upstream(provider: UpstreamProvider) -> UpstreamConfig {
        UpstreamConfig {
            provider,
            endpoint_url: "http://gateway.local/v1/".to_string(),
            username: "svc".to_string(),
            password: "pw".to_string(),
            api_id: Some(7),
            api_key: "sk-test".to_string(),
            model: "gpt-4".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn prompt() -> Prompt {
        dsaviz_core::prompt::build("stack.push(1)", "[1]")
    }

    #[test]
    fn internal_body_wraps_chat_request() {
        let body = request_body(
            &upstream(UpstreamProvider::Internal),
            &prompt(),
            &SamplingParams::default(),
        );

        assert_eq!(body["username"], "svc");
        assert_eq!(body["password"], "pw");
        assert_eq!(body["api"], 7);
        assert_eq!(body["request"]["max_tokens"], 1000);
        assert_eq!(body["request"]["messages"][0]["role"], "system");
        assert_eq!(body["request"]["messages"][1]["role"], "user");
        assert!(body["request"]["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("stack.push(1)"));
        assert_eq!(body["temperature"], json!(0.3));
        assert_eq!(body["request"]["temperature"], json!(0.3));
    }

    #[test]
    fn default_temperature_serializes_exactly() {
        let body = request_body(
            &upstream(UpstreamProvider::OpenAiCompatible),
            &prompt(),
            &SamplingParams::default(),
        );
        let wire = serde_json::to_string(&body).unwrap();
        assert!(wire.contains("\"temperature\":0.3"), "wire: {wire}");
        assert!(!wire.contains("0.300"), "wire: {wire}");
    }

    #[test]
    fn internal_body_sends_null_api_when_unset() {
        let mut config = upstream(UpstreamProvider::Internal);
        config.api_id = None;
        let body = request_body(&config, &prompt(), &SamplingParams::default());
        assert!(body["api"].is_null());
    }

    #[test]
    fn openai_body_is_plain_chat_completion() {
        let body = request_body(
            &upstream(UpstreamProvider::OpenAiCompatible),
            &prompt(),
            &SamplingParams {
                max_output_tokens: 500,
                temperature: 0.0,
            },
        );
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["max_tokens"], 500);
        assert!(body.get("username").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn endpoints_per_provider() {
        let internal = HttpGenerator::new(upstream(UpstreamProvider::Internal)).unwrap();
        assert_eq!(internal.endpoint(), "http://gateway.local/v1/");
        assert_eq!(internal.provider_name(), "internal");

        let openai = HttpGenerator::new(upstream(UpstreamProvider::OpenAiCompatible)).unwrap();
        assert_eq!(openai.endpoint(), "http://gateway.local/v1/chat/completions");
    }
}
