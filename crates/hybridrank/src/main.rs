//! hybridrank binary: load a directory, ingest it and run one hybrid query.

use anyhow::{Context, Result};
use clap::Parser;
use hybridrank::{
    args::{Cli, Command},
    init_logging,
    loader::load_documents,
    output::{format_chunks, format_hits},
    HybridRank, HybridRankConfig,
};
use hybridrank_core::Chunker;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = HybridRankConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialise logging")?;

    match cli.command {
        Command::Search {
            dir,
            query,
            json,
            limit,
            backend,
        } => {
            if let Some(backend) = backend {
                config.search.keyword_backend = backend;
            }
            let documents = load_documents(&dir)
                .with_context(|| format!("failed to read documents from {}", dir.display()))?;
            info!(dir = %dir.display(), documents = documents.len(), "Loaded documents");

            let engine = HybridRank::start(config).context("failed to start search engine")?;
            engine
                .ingest_many(documents.iter().map(|doc| (&doc.title, &doc.content)))
                .await
                .context("failed to ingest documents")?;

            let hits = engine.search(&query, limit).await;
            engine.shutdown();
            let hits = hits.context("search failed")?;
            println!("{}", format_hits(&hits, json)?);
        }
        Command::Chunk { file, json } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let chunker = Chunker::new(config.chunking)?;
            println!("{}", format_chunks(&chunker.chunk(&text), json)?);
        }
    }
    Ok(())
}
