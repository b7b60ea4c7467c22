//! Text Chunking
//!
//! Splits text into overlapping character windows.

use crate::config::ChunkConfig;

/// A piece of a source document ready for indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub source: String,
    pub page: usize,
}

/// Split `text` into windows of `chunk_size` characters, each starting
/// `overlap` characters before the previous window ended.
///
/// Windows are trimmed and empty ones dropped. Callers must pass a valid
/// `ChunkConfig` (`overlap < chunk_size`); an invalid one yields no chunks.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if config.validate().is_err() {
        return Vec::new();
    }

    let chars: Vec<char> = text.trim().chars().collect();
    let n = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < n {
        let end = n.min(start + config.chunk_size);
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= n {
            break;
        }
        start = end - config.overlap;
    }

    chunks
}

/// Chunk a whole source, tagging every piece with `source` and `page`
pub fn chunk_source(source: &str, page: usize, text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    chunk_text(text, config)
        .into_iter()
        .map(|content| Chunk {
            content,
            source: source.to_string(),
            page,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let config = ChunkConfig::new(10, 2);
        assert!(chunk_text("", &config).is_empty());
        assert!(chunk_text("   \n\t ", &config).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let config = ChunkConfig::new(100, 10);
        assert_eq!(chunk_text("  hello world  ", &config), vec!["hello world"]);
    }

    #[test]
    fn test_overlapping_windows() {
        let config = ChunkConfig::new(4, 1);
        // windows: [0,4) [3,7) [6,10)
        assert_eq!(chunk_text("abcdefghij", &config), vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_multibyte_characters() {
        let config = ChunkConfig::new(3, 0);
        assert_eq!(chunk_text("äöüßéè", &config), vec!["äöü", "ßéè"]);
    }

    #[test]
    fn test_invalid_config_yields_nothing() {
        assert!(chunk_text("abc", &ChunkConfig::new(2, 2)).is_empty());
    }

    #[test]
    fn test_chunk_source() {
        let chunks = chunk_source("notes.txt", 1, "abcdef", &ChunkConfig::new(3, 0));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].content, "def");
        assert_eq!(chunks[1].source, "notes.txt");
        assert_eq!(chunks[1].page, 1);
    }
}
