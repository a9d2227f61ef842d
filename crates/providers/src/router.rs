//! Provider router: selects the correct LLM provider based on config.
//!
//! Handles provider creation and lookup, and builds the embedding provider
//! that ingestion and queries share.

use std::collections::HashMap;
use std::sync::Arc;
use runcoach_config::AppConfig;
use runcoach_core::provider::Provider;
use crate::embedder::ProviderEmbedder;
use crate::openai_compat::OpenAiCompatProvider;

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names.
    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

/// Build providers from configuration.
///
/// Every configured provider is registered, plus the default chat provider
/// and the embedding provider even when they have no explicit section.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for name in config.providers.keys() {
        router.register(name.clone(), Arc::new(provider_for(config, name)));
    }

    for name in [config.default_provider.as_str(), config.embedding_provider()] {
        if router.get(name).is_none() {
            router.register(name.to_string(), Arc::new(provider_for(config, name)));
        }
    }

    router
}

/// Build the embedding provider named in `[embedding]`.
pub fn build_embedder(config: &AppConfig, router: &ProviderRouter) -> ProviderEmbedder {
    let name = config.embedding_provider();
    let provider = router
        .get(name)
        .unwrap_or_else(|| Arc::new(provider_for(config, name)));
    ProviderEmbedder::new(provider, config.embedding.model.clone())
}

fn provider_for(config: &AppConfig, name: &str) -> OpenAiCompatProvider {
    let provider_config = config.providers.get(name);

    let api_key = provider_config
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    OpenAiCompatProvider::new(name, base_url, api_key)
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcoach_config::ProviderConfig;
    use runcoach_core::EmbeddingProvider;

    #[test]
    fn router_register_and_lookup() {
        let mut router = ProviderRouter::new("openrouter");
        let provider = Arc::new(OpenAiCompatProvider::openrouter("sk-test"));
        router.register("openrouter", provider);

        assert!(router.get("openrouter").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config_registers_chat_and_embedding() {
        let config = AppConfig::default();
        let router = build_from_config(&config);
        assert!(router.default().is_some());
        assert!(router.get("openai").is_some());
        let mut names = router.list();
        names.sort();
        assert_eq!(names, vec!["openai", "openrouter"]);
    }

    #[test]
    fn configured_provider_uses_custom_url() {
        let mut config = AppConfig {
            default_provider: "local".into(),
            ..AppConfig::default()
        };
        config.embedding.provider = None;
        config.providers.insert(
            "local".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("http://127.0.0.1:9000/v1".into()),
                default_model: None,
            },
        );
        let provider = provider_for(&config, "local");
        assert_eq!(provider.base_url(), "http://127.0.0.1:9000/v1");

        let router = build_from_config(&config);
        assert_eq!(router.list(), vec!["local"]);
    }

    #[test]
    fn embedder_uses_configured_model() {
        let config = AppConfig::default();
        let router = build_from_config(&config);
        let embedder = build_embedder(&config, &router);
        assert_eq!(embedder.model(), "text-embedding-3-small");
    }
}
