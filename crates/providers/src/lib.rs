//! Chat-completion provider implementations for Metodo.
//!
//! All providers implement the `metodo_core::Provider` trait.
//! [`build_from_config`] constructs the one the binary injects.

pub mod openai_compat;

use std::sync::Arc;
use std::time::Duration;

use metodo_core::Provider;
use metodo_core::error::ProviderError;

pub use openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// Every supported backend speaks the OpenAI chat-completions dialect, so
/// the provider name only picks the default base URL.
pub fn build_from_config(
    config: &metodo_config::LlmConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!("no API key set for '{}'", config.provider))
        })?;

    let base_url = match &config.api_url {
        Some(url) => url.clone(),
        None => default_base_url(&config.provider).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{}' and no llm.api_url set",
                config.provider
            ))
        })?,
    };

    let provider = OpenAiCompatProvider::new(&config.provider, base_url, api_key)
        .with_timeout(Duration::from_secs(config.timeout_secs));
    Ok(Arc::new(provider))
}

/// Default base URL for known provider names.
fn default_base_url(provider: &str) -> Option<String> {
    let url = match provider {
        "groq" => "https://api.groq.com/openai/v1",
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        _ => return None,
    };
    Some(url.to_string())
}
