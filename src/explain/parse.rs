// src/explain/parse.rs
//! Lenient decoding of the generative service's reply.
//!
//! Everything here returns `Option` and never fails the request: a reply that
//! cannot be read degrades to zero picks. Swap `parse_picks` for a stricter
//! schema-validated parse without touching the call site in `explain`.

use serde::Deserialize;

use super::Pick;

/// Justifications longer than this are cut.
pub const MAX_WHY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PicksDoc {
    picks: Vec<RawPick>,
}

#[derive(Debug, Deserialize)]
struct RawPick {
    title: String,
    #[serde(default)]
    why: String,
}

/// Decode the raw response body and pull out the generated text (all `text` blocks joined).
pub fn generated_text(body: &[u8]) -> Option<String> {
    let raw = std::str::from_utf8(body).ok()?;
    let env: Envelope = serde_json::from_str(raw).ok()?;
    let parts: Vec<&str> = env
        .content
        .iter()
        .filter(|b| b.kind.is_empty() || b.kind == "text")
        .filter_map(|b| b.text.as_deref())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(""))
    }
}

/// First `{` through last `}`, inclusive.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parse `{"picks":[{"title":"","why":""}]}` out of free text.
pub fn parse_picks(text: &str) -> Option<Vec<Pick>> {
    let json = extract_json_object(text)?;
    let doc: PicksDoc = serde_json::from_str(json).ok()?;
    Some(
        doc.picks
            .into_iter()
            .filter(|p| !p.title.trim().is_empty())
            .map(|p| Pick {
                title: p.title.trim().to_string(),
                why: sanitize_why(&p.why),
            })
            .collect(),
    )
}

/// Single line, collapsed whitespace, at most [`MAX_WHY_CHARS`] characters.
pub fn sanitize_why(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(MAX_WHY_CHARS));
    let mut count = 0usize;
    for word in input.split_whitespace() {
        if count > 0 {
            if count + 1 >= MAX_WHY_CHARS {
                break;
            }
            out.push(' ');
            count += 1;
        }
        for ch in word.chars() {
            if count >= MAX_WHY_CHARS {
                return out;
            }
            out.push(ch);
            count += 1;
        }
    }
    out
}
