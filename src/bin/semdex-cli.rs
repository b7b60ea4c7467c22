//! SEMDEX CLI
//!
//! Ingests text documents into an in-memory index and runs similarity queries,
//! either once (`--query`) or from an interactive prompt.

use clap::Parser;
use semdex::{ChunkConfig, EmbeddingIndex, IndexConfig, Ingestor, SearchFilter, SearchResult};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// SEMDEX CLI - In-Memory Semantic Retrieval
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Files or directories (.txt/.md) to index
    #[arg(short, long, num_args = 1..)]
    ingest: Vec<PathBuf>,

    /// Run a single query and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Only return chunks from this source file name
    #[arg(long)]
    source: Option<String>,

    /// Maximum number of results (defaults to SEMDEX_DEFAULT_TOP_K or 5)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Embedding dimension (defaults to SEMDEX_EMBEDDING_DIM or 384)
    #[arg(long)]
    dim: Option<usize>,

    /// Minimum similarity score, exclusive (defaults to SEMDEX_SCORE_THRESHOLD or 0.3)
    #[arg(long)]
    threshold: Option<f32>,

    /// Chunk size in characters
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Chunk overlap in characters
    #[arg(long)]
    overlap: Option<usize>,
}

impl Args {
    /// Apply command-line overrides on top of `base`
    fn config(&self, base: IndexConfig) -> anyhow::Result<IndexConfig> {
        let mut config = base;
        if let Some(dim) = self.dim {
            config = config.with_dimension(dim);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if let Some(top_k) = self.top_k {
            config = config.with_top_k(top_k);
        }
        let chunking = ChunkConfig::new(
            self.chunk_size.unwrap_or(config.chunking.chunk_size),
            self.overlap.unwrap_or(config.chunking.overlap),
        );
        config = config.with_chunking(chunking);
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("semdex=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config(IndexConfig::from_env()?)?;
    let index = EmbeddingIndex::new(config)?;

    if !args.ingest.is_empty() {
        let ingestor = Ingestor::new(&index, index.config().chunking)?;
        let report = ingestor.ingest_paths(&args.ingest)?;
        println!(
            "Indexed {} chunks from {} files ({} skipped)",
            report.chunks, report.files, report.skipped
        );
    }

    let mut filter = SearchFilter::default();
    if let Some(source) = &args.source {
        filter = filter.with_source(source.clone());
    }
    let top_k = index.config().default_top_k;

    if let Some(query) = &args.query {
        print_results(&index.search_filtered(query, top_k, &filter));
        return Ok(());
    }

    println!(
        "{} documents indexed. Type 'help' for available commands, 'quit' to exit.\n",
        index.len()
    );

    loop {
        print!("semdex> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        if input.eq_ignore_ascii_case("stats") {
            println!("Documents: {} | Dimension: {}", index.len(), index.dimension());
            println!("{}", index.metrics().summary());
            continue;
        }

        if let Some(text) = input.strip_prefix("add ") {
            index.add_documents(&[text.trim()], None)?;
            println!("Added document {}", index.len() - 1);
            continue;
        }

        print_results(&index.search_filtered(input, top_k, &filter));
    }

    Ok(())
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("(no matches)");
        return;
    }

    for (rank, result) in results.iter().enumerate() {
        let source = result
            .metadata
            .extra
            .get("source")
            .map(String::as_str)
            .unwrap_or("-");
        println!(
            "{}. score={:.4} id={} len={} source={}",
            rank + 1,
            result.score,
            result.metadata.id,
            result.metadata.length,
            source
        );
        println!("   {}", preview(&result.document, 160));
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn print_help() {
    println!(
        r#"
Available commands:

  <query>           - Search the index
  add <text>        - Add a single document
  stats             - Show corpus size and operation metrics

  help              - Show this help
  quit / exit       - Exit the CLI

Examples:
  add The sky is blue
  The sky is blue
"#
    );
}
