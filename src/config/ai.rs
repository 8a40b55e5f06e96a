// src/config/ai.rs
use anyhow::{anyhow, Result};

pub const ENV_MODEL_ID: &str = "BEDROCK_MODEL_ID";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_API_KEY: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const ENV_ENDPOINT: &str = "BEDROCK_ENDPOINT";

/// Settings for the generative-text service (Bedrock runtime, Anthropic messages format).
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub model_id: String,
    pub region: String,
    pub api_key: String,
    /// Base URL without trailing slash, e.g. `https://bedrock-runtime.us-east-1.amazonaws.com`.
    pub endpoint: String,
}

impl AiConfig {
    /// All of model id, region and API key are required; the endpoint is derived from the
    /// region unless overridden.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("Missing {key} env var (required when MOCK_AI is off)"))
        };

        let model_id = required(ENV_MODEL_ID)?;
        let region = required(ENV_REGION)?;
        let api_key = required(ENV_API_KEY)?;
        let endpoint = get(ENV_ENDPOINT)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("https://bedrock-runtime.{region}.amazonaws.com"));

        Ok(Self {
            model_id,
            region,
            api_key,
            endpoint,
        })
    }

    /// Full `InvokeModel` URL for the configured model.
    pub fn invoke_url(&self) -> String {
        format!("{}/model/{}/invoke", self.endpoint, self.model_id)
    }
}
