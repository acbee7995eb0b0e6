use std::collections::HashSet;

use crate::wire::{GroundingChunk, WebSource};

/// Citations to display: web sources only, first occurrence of each URI,
/// at most `limit` of them.
pub fn display_citations(chunks: &[GroundingChunk], limit: usize) -> Vec<&WebSource> {
    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter_map(|c| c.web.as_ref())
        .filter(|w| seen.insert(w.uri.as_str()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web(uri: &str, title: &str) -> GroundingChunk {
        GroundingChunk { web: Some(WebSource { uri: uri.into(), title: title.into() }) }
    }

    #[test]
    fn dedupes_by_uri_and_caps() {
        let chunks = vec![
            web("https://a", "A"),
            web("https://a", "A again"),
            GroundingChunk { web: None },
            web("https://b", "B"),
            web("https://c", "C"),
            web("https://b", "B again"),
            web("https://d", "D"),
            web("https://e", "E"),
        ];
        let shown = display_citations(&chunks, 4);
        let uris: Vec<_> = shown.iter().map(|w| w.uri.as_str()).collect();
        assert_eq!(uris, ["https://a", "https://b", "https://c", "https://d"]);
        assert_eq!(shown[0].title, "A");
    }

    #[test]
    fn empty_input_shows_nothing() {
        assert!(display_citations(&[], 4).is_empty());
        assert!(display_citations(&[GroundingChunk { web: None }], 4).is_empty());
    }
}
