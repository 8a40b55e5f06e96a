// src/explain/bedrock.rs
//! Generative-text provider: Bedrock runtime `InvokeModel` with an Anthropic messages body.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::config::AiConfig;

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const MAX_TOKENS: u32 = 800;

/// Low-level provider: one prompt in, the raw response body out.
///
/// Transport, auth and non-2xx failures are errors. Interpreting the body is the
/// caller's job, so a reply the caller cannot read is not an error here.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<Vec<u8>>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynGenerativeClient = Arc<dyn GenerativeClient>;

pub struct BedrockClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl BedrockClient {
    pub fn new(cfg: &AiConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("movie-rec-explainer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout.min(Duration::from_secs(4)))
            .timeout(timeout)
            .build()
            .context("building bedrock http client")?;
        Ok(Self {
            http,
            url: cfg.invoke_url(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[derive(Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct InvokeBody<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Msg<'a>>,
}

fn invoke_body(prompt: &str) -> InvokeBody<'_> {
    InvokeBody {
        anthropic_version: ANTHROPIC_VERSION,
        max_tokens: MAX_TOKENS,
        temperature: 0.5,
        messages: vec![Msg {
            role: "user",
            content: vec![TextBlock {
                kind: "text",
                text: prompt,
            }],
        }],
    }
}

#[async_trait]
impl GenerativeClient for BedrockClient {
    async fn invoke(&self, prompt: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&invoke_body(prompt))
            .send()
            .await
            .context("generative service request failed")?;

        let status = resp.status();
        if !status.is_success() {
            // Bedrock puts the reason in {"message": "..."}; keep it short.
            let detail = resp.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(200).collect();
            warn!(%status, "generative service returned an error status");
            return Err(anyhow!("generative service returned {status}: {detail}"));
        }

        let bytes = resp
            .bytes()
            .await
            .context("reading generative service response")?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "bedrock"
    }
}
