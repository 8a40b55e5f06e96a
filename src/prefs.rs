// src/prefs.rs
//! Preference resolution: caller overrides shallow-merged onto the defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Year range applied when a preference set has none.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2000, 2025);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub genres: Vec<String>,
    pub mood: String,
    /// Inclusive `[start, end]`; ordering is the caller's responsibility.
    pub year_range: Option<(i32, i32)>,
    /// ISO 639-1 code, passed through to discovery untouched.
    pub language: Option<String>,
    pub avoid: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            genres: vec!["sci-fi".to_string(), "thriller".to_string()],
            mood: "smart and suspenseful".to_string(),
            year_range: Some(DEFAULT_YEAR_RANGE),
            language: Some("en".to_string()),
            avoid: vec!["horror".to_string()],
        }
    }
}

/// Shallow merge: a key present in `overrides` replaces the default wholesale.
///
/// Non-object input yields the defaults. A value of the wrong type for a key
/// keeps that key's default. An explicit `null` keeps the default for the list
/// and text keys, and unsets `yearRange`/`language`.
pub fn resolve(overrides: &Value) -> Preferences {
    let mut prefs = Preferences::default();
    let Some(obj) = overrides.as_object() else {
        return prefs;
    };

    if let Some(Some(v)) = take::<Vec<String>>(obj, "genres") {
        prefs.genres = v;
    }
    if let Some(Some(v)) = take::<String>(obj, "mood") {
        prefs.mood = v;
    }
    if let Some(v) = take::<(i32, i32)>(obj, "yearRange") {
        prefs.year_range = v;
    }
    if let Some(v) = take::<String>(obj, "language") {
        prefs.language = v;
    }
    if let Some(Some(v)) = take::<Vec<String>>(obj, "avoid") {
        prefs.avoid = v;
    }
    prefs
}

/// Outer `None`: keep the default. `Some(None)`: explicit null. `Some(Some(v))`: override.
fn take<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<Option<T>> {
    match obj.get(key)? {
        Value::Null => Some(None),
        raw => match serde_json::from_value::<T>(raw.clone()) {
            Ok(v) => Some(Some(v)),
            Err(e) => {
                debug!(key, error = %e, "ignoring malformed preference override");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_or_non_object_overrides_yield_defaults() {
        assert_eq!(resolve(&json!({})), Preferences::default());
        assert_eq!(resolve(&Value::Null), Preferences::default());
        assert_eq!(resolve(&json!("sci-fi")), Preferences::default());
        assert_eq!(resolve(&json!([1, 2])), Preferences::default());
    }

    #[test]
    fn present_keys_replace_defaults_wholesale() {
        let p = resolve(&json!({ "genres": ["comedy"], "yearRange": [1990, 1999] }));
        assert_eq!(p.genres, vec!["comedy".to_string()]);
        assert_eq!(p.year_range, Some((1990, 1999)));
        // untouched keys keep their defaults
        let d = Preferences::default();
        assert_eq!(p.mood, d.mood);
        assert_eq!(p.language, d.language);
        assert_eq!(p.avoid, d.avoid);
    }

    #[test]
    fn every_key_is_override_or_default() {
        let cases = [
            json!({ "mood": "cozy" }),
            json!({ "language": "fr", "avoid": [] }),
            json!({ "genres": ["drama", "war"], "mood": "bleak", "unknown": 1 }),
            json!({ "genres": null, "mood": null, "avoid": null }),
            json!({ "yearRange": null, "language": null }),
        ];
        let d = Preferences::default();
        for case in cases {
            let p = resolve(&case);
            let out = serde_json::to_value(&p).unwrap();
            let defaults = serde_json::to_value(&d).unwrap();
            for key in ["genres", "mood", "yearRange", "language", "avoid"] {
                let got = &out[key];
                let from_override = case.get(key) == Some(got);
                assert!(
                    from_override || got == &defaults[key],
                    "key {key} in {case}: got {got}, default {}",
                    defaults[key]
                );
                if let Some(v) = case.get(key).filter(|v| !v.is_null()) {
                    assert_eq!(got, v, "key {key} in {case}");
                }
            }
        }
    }

    #[test]
    fn malformed_values_keep_default_and_null_unsets_optionals() {
        let p = resolve(&json!({ "genres": "sci-fi", "yearRange": [2010], "language": null }));
        let d = Preferences::default();
        assert_eq!(p.genres, d.genres);
        assert_eq!(p.year_range, d.year_range);
        assert_eq!(p.language, None);
    }

    #[test]
    fn null_list_and_text_keys_keep_defaults() {
        let p = resolve(&json!({ "genres": null, "mood": null, "avoid": null }));
        assert_eq!(p, Preferences::default());
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(v["yearRange"], json!([2000, 2025]));
        assert_eq!(v["genres"], json!(["sci-fi", "thriller"]));
    }
}
