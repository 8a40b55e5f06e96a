// src/genres.rs
//! Genre catalog: fixed name <-> TMDB genre id mapping.

/// Canonical (name, id) pairs for TMDB movie genres.
pub const GENRES: &[(&str, u32)] = &[
    ("action", 28),
    ("adventure", 12),
    ("animation", 16),
    ("comedy", 35),
    ("crime", 80),
    ("documentary", 99),
    ("drama", 18),
    ("family", 10751),
    ("fantasy", 14),
    ("history", 36),
    ("horror", 27),
    ("music", 10402),
    ("mystery", 9648),
    ("romance", 10749),
    ("sci-fi", 878),
    ("tv-movie", 10770),
    ("thriller", 53),
    ("war", 10752),
    ("western", 37),
];

// Accepted spellings that resolve to a canonical entry.
const ALIASES: &[(&str, u32)] = &[
    ("science fiction", 878),
    ("science-fiction", 878),
    ("scifi", 878),
    ("tv movie", 10770),
];

/// Look up the id for a genre name (case-insensitive, surrounding whitespace ignored).
pub fn id_for(name: &str) -> Option<u32> {
    let key = name.trim().to_ascii_lowercase();
    GENRES
        .iter()
        .chain(ALIASES.iter())
        .find(|(n, _)| *n == key)
        .map(|(_, id)| *id)
}

/// Canonical name for a genre id.
pub fn name_for(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|(_, i)| *i == id).map(|(n, _)| *n)
}

/// Comma-joined ids for the names that resolve. `None` means "omit this filter".
pub fn to_identifiers<S: AsRef<str>>(names: &[S]) -> Option<String> {
    let ids: Vec<String> = names
        .iter()
        .filter_map(|n| id_for(n.as_ref()))
        .map(|id| id.to_string())
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(","))
    }
}

/// Known names for the given ids; unknown ids are dropped.
pub fn to_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| name_for(*id))
        .map(str::to_string)
        .collect()
}
