//! Document Loading
//!
//! Reads text files from disk and feeds their chunks into an index.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::chunker::{chunk_source, Chunk};
use crate::config::ChunkConfig;
use crate::error::{IndexError, Result};
use crate::vector::{Embedder, EmbeddingIndex, Metadata};

/// File extensions read as plain text
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Outcome of an ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Files that produced at least one chunk
    pub files: usize,
    pub chunks: usize,
    /// Files without extractable text
    pub skipped: usize,
}

impl IngestReport {
    fn merge(&mut self, other: IngestReport) {
        self.files += other.files;
        self.chunks += other.chunks;
        self.skipped += other.skipped;
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively list supported files under `dir`, sorted by path.
///
/// Symlinked directories are not descended into.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|e| IndexError::io(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| IndexError::io(&current, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| IndexError::io(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if is_supported(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Read a text file (lossy UTF-8) and chunk it, using the file name as source
pub fn load_text_file(path: &Path, config: &ChunkConfig) -> Result<Vec<Chunk>> {
    let bytes = fs::read(path).map_err(|e| IndexError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(chunk_source(&source, 1, &text, config))
}

/// Chunks documents and adds them to an index with source metadata
pub struct Ingestor<'a, E: Embedder> {
    index: &'a EmbeddingIndex<E>,
    chunking: ChunkConfig,
}

impl<'a, E: Embedder> Ingestor<'a, E> {
    pub fn new(index: &'a EmbeddingIndex<E>, chunking: ChunkConfig) -> Result<Self> {
        chunking.validate()?;
        Ok(Self { index, chunking })
    }

    /// Chunk raw text and index it. `doc_id` defaults to `source`.
    pub fn ingest_text(&self, source: &str, text: &str, doc_id: Option<&str>) -> Result<usize> {
        let chunks = chunk_source(source, 1, text, &self.chunking);
        self.add_chunks(&chunks, doc_id.unwrap_or(source))
    }

    /// Index a single file
    pub fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let chunks = load_text_file(path, &self.chunking)?;
        if chunks.is_empty() {
            warn!("Skipping {} (no text)", path.display());
            return Ok(IngestReport {
                skipped: 1,
                ..Default::default()
            });
        }

        let doc_id = path.display().to_string();
        let added = self.add_chunks(&chunks, &doc_id)?;
        info!("{}: {} chunks", path.display(), added);
        Ok(IngestReport {
            files: 1,
            chunks: added,
            skipped: 0,
        })
    }

    /// Index every supported file under `dir`
    pub fn ingest_dir(&self, dir: &Path) -> Result<IngestReport> {
        let files = collect_files(dir)?;
        if files.is_empty() {
            warn!("No documents found in {}", dir.display());
        }

        let mut report = IngestReport::default();
        for file in files {
            report.merge(self.ingest_file(&file)?);
        }
        Ok(report)
    }

    /// Index a mix of files and directories
    pub fn ingest_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        for path in paths {
            let path = path.as_ref();
            let part = if path.is_dir() {
                self.ingest_dir(path)?
            } else {
                self.ingest_file(path)?
            };
            report.merge(part);
        }
        info!(
            "Indexed {} chunks from {} files ({} skipped, corpus {})",
            report.chunks,
            report.files,
            report.skipped,
            self.index.len()
        );
        Ok(report)
    }

    fn add_chunks(&self, chunks: &[Chunk], doc_id: &str) -> Result<usize> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let metadatas: Vec<Metadata> = chunks
            .iter()
            .map(|c| {
                Metadata::from([
                    ("source".to_string(), c.source.clone()),
                    ("doc_id".to_string(), doc_id.to_string()),
                    ("page".to_string(), c.page.to_string()),
                ])
            })
            .collect();
        self.index.add_documents(&texts, Some(&metadatas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use tempfile::TempDir;

    fn small_index() -> EmbeddingIndex {
        EmbeddingIndex::new(IndexConfig::default().with_dimension(32)).unwrap()
    }

    #[test]
    fn test_collect_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("nested/c.TXT"), "c").unwrap();
        fs::write(dir.path().join("ignored.pdf"), "x").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.txt", "nested/c.TXT"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_visited_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt")]);

        let index = small_index();
        let ingestor = Ingestor::new(&index, ChunkConfig::default()).unwrap();
        let report = ingestor.ingest_dir(dir.path()).unwrap();
        assert_eq!(report.chunks, 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_ingest_file_attaches_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sky.txt");
        fs::write(&path, "The sky is blue").unwrap();

        let index = small_index();
        let ingestor = Ingestor::new(&index, ChunkConfig::default()).unwrap();
        let report = ingestor.ingest_file(&path).unwrap();
        assert_eq!(report, IngestReport { files: 1, chunks: 1, skipped: 0 });

        let doc = index.document(0).unwrap();
        assert_eq!(doc.text, "The sky is blue");
        assert_eq!(doc.metadata.get("source").map(String::as_str), Some("sky.txt"));
        assert_eq!(doc.metadata.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_empty_file_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.txt"), "   ").unwrap();
        fs::write(dir.path().join("full.txt"), "content").unwrap();

        let index = small_index();
        let ingestor = Ingestor::new(&index, ChunkConfig::default()).unwrap();
        let report = ingestor.ingest_paths(&[dir.path()]).unwrap();
        assert_eq!(report, IngestReport { files: 1, chunks: 1, skipped: 1 });
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let index = small_index();
        let ingestor = Ingestor::new(&index, ChunkConfig::default()).unwrap();
        let err = ingestor
            .ingest_file(Path::new("/nonexistent/semdex.txt"))
            .unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[test]
    fn test_ingest_text_doc_id() {
        let index = small_index();
        let ingestor = Ingestor::new(&index, ChunkConfig::new(5, 0)).unwrap();
        let added = ingestor.ingest_text("inline", "0123456789", Some("doc-7")).unwrap();
        assert_eq!(added, 2);
        let doc = index.document(1).unwrap();
        assert_eq!(doc.metadata.get("doc_id").map(String::as_str), Some("doc-7"));
    }

    #[test]
    fn test_invalid_chunking_rejected() {
        let index = small_index();
        assert!(Ingestor::new(&index, ChunkConfig::new(10, 10)).is_err());
    }
}
