//! `runcoach ingest`: Build the knowledge index.

use std::path::Path;

use runcoach_agent::Coach;

pub async fn run(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let coach = Coach::from_config(&config)?;

    println!("📚 Documents: {}", config.knowledge.documents_dir.display());
    println!("   Index:     {}", config.knowledge.index_dir.display());
    println!("   Embedding: {} ({})", config.embedding.model, config.embedding_provider());

    if force {
        coach.index().rebuild().await?;
    } else {
        coach.initialize().await?;
    }

    println!("✅ Knowledge base ready: {:?}", coach.index().status().await);
    Ok(())
}
