//! `runcoach doctor`: Diagnose configuration and knowledge base health.

use std::path::Path;

use runcoach_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 RunCoach Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    if path.exists() {
        println!("  ✅ Config file found at {}", path.display());
    } else {
        println!("  ⚠️  No config file at {} — using defaults", path.display());
    }

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  ⚠️  1 issue found. Fix the config file and run doctor again.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else if config.default_provider == "ollama" {
        println!("  ✅ Local provider, no API key needed");
    } else {
        println!("  ⚠️  No API key configured — set OPENROUTER_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    let docs = &config.knowledge.documents_dir;
    match std::fs::read_dir(docs) {
        Ok(entries) => {
            let count = entries
                .filter_map(Result::ok)
                .filter(|e| runcoach_knowledge::loader::is_loadable(&e.path()))
                .count();
            if count > 0 {
                println!("  ✅ {count} document(s) in {}", docs.display());
            } else {
                println!("  ⚠️  No PDF or text documents in {}", docs.display());
                issues += 1;
            }
        }
        Err(_) => {
            println!("  ❌ Documents directory {} is missing", docs.display());
            issues += 1;
        }
    }

    let index = &config.knowledge.index_dir;
    if runcoach_knowledge::store::is_populated(index) {
        println!("  ✅ Knowledge index present at {}", index.display());
    } else {
        println!("  ⚠️  No knowledge index yet — run `runcoach ingest`");
        issues += 1;
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
