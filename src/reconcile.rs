// src/reconcile.rs
//! Join explained picks back to their candidate records.

use serde::{Deserialize, Serialize};

use crate::discovery::Candidate;
use crate::explain::Pick;

/// A pick enriched with candidate details. Unmatched picks carry empty details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedPick {
    pub title: String,
    pub why: String,
    pub poster: Option<String>,
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub overview: String,
}

/// Case-insensitive exact title match, first candidate wins. Never drops a pick.
pub fn reconcile(picks: Vec<Pick>, candidates: &[Candidate]) -> Vec<RecommendedPick> {
    picks
        .into_iter()
        .map(|p| {
            let key = p.title.to_lowercase();
            match candidates.iter().find(|c| c.title.to_lowercase() == key) {
                Some(c) => RecommendedPick {
                    title: p.title,
                    why: p.why,
                    poster: c.poster_url.clone(),
                    year: Some(c.year.clone()),
                    genres: c.genres.clone(),
                    overview: c.overview.clone(),
                },
                None => RecommendedPick {
                    title: p.title,
                    why: p.why,
                    poster: None,
                    year: None,
                    genres: Vec::new(),
                    overview: String::new(),
                },
            }
        })
        .collect()
}
