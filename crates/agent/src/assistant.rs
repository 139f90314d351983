//! Prompt assembly and completion.

use std::sync::Arc;

use metodo_config::LlmConfig;
use metodo_core::error::Result;
use metodo_core::message::Message;
use metodo_core::provider::{Provider, ProviderRequest};
use metodo_library::EntryRepository;
use tracing::{debug, info, warn};

use crate::prompts;

/// How many entries are scanned when building library context.
pub const LIBRARY_SCAN_LIMIT: u32 = 50;

/// The joke-writing assistant.
///
/// Builds `[system prompt, library context?, user message]` and sends it
/// to the provider in one non-streaming completion.
pub struct Assistant {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// Where library context comes from
    library: EntryRepository,

    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl Assistant {
    pub fn new(provider: Arc<dyn Provider>, library: EntryRepository) -> Self {
        Self {
            provider,
            library,
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.7,
            max_tokens: Some(2000),
        }
    }

    /// Take model and sampling parameters from the `[llm]` config section.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        library: EntryRepository,
        config: &LlmConfig,
    ) -> Self {
        Self::new(provider, library)
            .with_model(&config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send a message and return the completion text verbatim.
    pub async fn chat(&self, message: &str, include_library: bool) -> Result<String> {
        let mut messages = vec![Message::system(prompts::SYSTEM_PROMPT)];
        if include_library {
            let context = self.library_context().await?;
            messages.push(Message::system(format!(
                "{}{context}",
                prompts::LIBRARY_CONTEXT_PREFIX
            )));
        }
        messages.push(Message::user(message));

        info!(
            provider = self.provider.name(),
            model = %self.model,
            messages = messages.len(),
            include_library,
            "Sending chat"
        );

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }
        Ok(response.message.content)
    }

    /// Build the library context block.
    ///
    /// Scans the first entries of the database, keeps those whose title
    /// contains a library keyword and appends each one's body. A failed
    /// listing is an error; a failed body fetch leaves only the heading.
    pub async fn library_context(&self) -> Result<String> {
        let entries = self.library.list(None, LIBRARY_SCAN_LIMIT).await?;
        let relevant: Vec<_> = entries
            .into_iter()
            .filter(|entry| {
                let title = entry.titulo.to_uppercase();
                prompts::LIBRARY_KEYWORDS.iter().any(|k| title.contains(k))
            })
            .collect();

        if relevant.is_empty() {
            return Ok(prompts::EMPTY_LIBRARY.to_string());
        }

        debug!(entries = relevant.len(), "Building library context");
        let mut context = String::from(prompts::LIBRARY_HEADER);
        for entry in relevant {
            context.push_str(&format!("## {}\n", entry.titulo));
            match self.library.get(&entry.id).await {
                Ok(full) => {
                    context.push_str(&full.contenido.unwrap_or_default());
                    context.push_str("\n\n");
                }
                Err(e) => warn!(id = %entry.id, error = %e, "Skipping library entry body"),
            }
        }
        Ok(context)
    }

    /// Suggest ways to develop a concept.
    pub async fn develop(&self, concepto: &str) -> Result<String> {
        self.chat(&prompts::develop(concepto), true).await
    }

    /// Propose absurd realities from a mechanical element.
    pub async fn suggest_absurd(&self, elemento_mecanico: &str) -> Result<String> {
        self.chat(&prompts::absurd_realities(elemento_mecanico), true)
            .await
    }

    /// Analyze a concept's types, contexts and associations.
    pub async fn analyze(&self, concepto: &str) -> Result<String> {
        self.chat(&prompts::analyze(concepto), true).await
    }

    /// Look for library examples by technique or concept.
    pub async fn find_examples(
        &self,
        tecnica: Option<&str>,
        concepto: Option<&str>,
    ) -> Result<String> {
        self.chat(&prompts::find_examples(tecnica, concepto), true)
            .await
    }
}
