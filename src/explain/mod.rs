// src/explain/mod.rs
//! Explanation generator: turns candidates into at most `limit` picks with a short "why".

pub mod bedrock;
pub mod parse;

use anyhow::{Context, Result};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::discovery::Candidate;
use crate::prefs::Preferences;

pub use bedrock::{BedrockClient, DynGenerativeClient, GenerativeClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pick {
    pub title: String,
    pub why: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Explanation {
    pub picks: Vec<Pick>,
}

/// How explanations are produced. Fixed for the lifetime of an [`Explainer`].
#[derive(Clone)]
pub enum ExplainMode {
    /// Deterministic local picks; no external call.
    Mock,
    Live(DynGenerativeClient),
}

#[derive(Clone)]
pub struct Explainer {
    mode: ExplainMode,
}

impl Explainer {
    pub fn new(mode: ExplainMode) -> Self {
        Self { mode }
    }

    pub fn mock() -> Self {
        Self::new(ExplainMode::Mock)
    }

    pub fn mode_name(&self) -> &'static str {
        match &self.mode {
            ExplainMode::Mock => "mock",
            ExplainMode::Live(client) => client.name(),
        }
    }

    /// `limit` is expected in `1..=10`; callers clamp before getting here.
    ///
    /// Only a failed service call is an error. A reply that cannot be parsed
    /// yields an empty explanation.
    pub async fn explain(
        &self,
        prefs: &Preferences,
        candidates: &[Candidate],
        limit: usize,
    ) -> Result<Explanation> {
        let picks = match &self.mode {
            ExplainMode::Mock => mock_picks(prefs, candidates, limit),
            ExplainMode::Live(client) => {
                let prompt = build_prompt(prefs, candidates, limit)?;
                let body = client.invoke(&prompt).await?;
                match parse::generated_text(&body).and_then(|t| parse::parse_picks(&t)) {
                    Some(mut picks) => {
                        picks.truncate(limit);
                        picks
                    }
                    None => {
                        warn!(provider = client.name(), "unreadable model reply; returning no picks");
                        counter!("explain_parse_failures_total").increment(1);
                        Vec::new()
                    }
                }
            }
        };

        counter!("explain_picks_total").increment(picks.len() as u64);
        info!(mode = self.mode_name(), picks = picks.len(), limit, "explanation ready");
        Ok(Explanation { picks })
    }
}

/// Pure: the first `limit` candidates, each with a templated reason.
pub fn mock_picks(prefs: &Preferences, candidates: &[Candidate], limit: usize) -> Vec<Pick> {
    candidates
        .iter()
        .take(limit)
        .map(|c| Pick {
            title: c.title.clone(),
            why: mock_why(&prefs.mood, &c.genres),
        })
        .collect()
}

fn mock_why(mood: &str, genres: &[String]) -> String {
    let mood = mood.trim();
    let lead = if mood.is_empty() {
        "Fits your mood".to_string()
    } else {
        format!("Fits a {mood} mood")
    };
    match genres {
        [] => format!("{lead}."),
        [one] => format!("{lead} with {one} elements."),
        [a, b, ..] => format!("{lead} with {a} and {b} elements."),
    }
}

/// Prompt asking for strict JSON picks chosen from the serialized candidates.
pub fn build_prompt(prefs: &Preferences, candidates: &[Candidate], limit: usize) -> Result<String> {
    let prefs_json = serde_json::to_string(prefs).context("serializing preferences")?;
    let cands_json = serde_json::to_string(candidates).context("serializing candidates")?;
    Ok(format!(
        r#"You are a movie recommendation assistant.
User preferences (JSON): {prefs_json}
Candidate movies (JSON): {cands_json}

Choose at most {limit} movies from the candidates only, best match first.
For each, write a "why" under 20 words that ties it to the preferences. No spoilers.
Use the candidate titles exactly as given.
Reply with strict JSON only, no prose, in this shape:
{{"picks":[{{"title":"","why":""}}]}}"#
    ))
}
