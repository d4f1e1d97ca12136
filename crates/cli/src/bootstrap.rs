//! Startup wiring: resolve providers from configuration and build the pipeline.

use ragline_core::{config::AppConfig, AppResult};
use ragline_knowledge::{create_provider, seed_if_empty, SqliteStore};
use ragline_llm::create_model;
use ragline_pipeline::Pipeline;
use ragline_prompt::PromptLibrary;
use std::sync::Arc;

/// Open the configured collection with the configured embedding backend.
pub fn open_store(config: &AppConfig) -> AppResult<Arc<SqliteStore>> {
    let embeddings = config.resolve_embeddings()?;
    let embedder = create_provider(&embeddings)?;
    let store = SqliteStore::open(&config.store_dir, &config.collection, embedder)?;
    Ok(Arc::new(store))
}

/// Build a ready-to-serve pipeline.
///
/// Every provider is resolved here, once; the stages never look at the
/// environment. An empty store is seeded so a fresh install can answer.
pub async fn build_pipeline(config: &AppConfig) -> AppResult<Pipeline> {
    let llm_settings = config.resolve_llm()?;
    let model = create_model(&llm_settings)?;

    let store = open_store(config)?;
    let seeded = seed_if_empty(store.as_ref()).await?;
    if seeded > 0 {
        tracing::info!("Seeded {} documents into '{}'", seeded, store.collection());
    }

    let prompts = PromptLibrary::load(config.prompts_dir.as_deref())?;
    tracing::debug!("Prompts: {:?}", prompts.ids());

    Pipeline::new(store, model, &prompts, config.top_k)
}
