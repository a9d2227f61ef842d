//! `runcoach search`: Query the knowledge base directly.

use std::path::Path;

use runcoach_agent::Coach;

pub async fn run(config_path: Option<&Path>, query: &str, k: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let coach = Coach::from_config(&config)?;
    let k = k.filter(|k| *k > 0).unwrap_or(config.knowledge.search_top_k);

    let results = coach.direct_search(query, k).await?;

    println!("{}", results.context);
    if !results.sources.is_empty() {
        println!();
        println!("Sources: {}", results.sources.join(", "));
    }
    Ok(())
}
