//! Seed command handler.

use crate::bootstrap::open_store;
use clap::Args;
use ragline_core::{config::AppConfig, AppResult};
use ragline_knowledge::{seed_documents, seed_if_empty, DocumentStore};

/// Seed the document store with the built-in passages
#[derive(Args, Debug)]
pub struct SeedCommand {
    /// Delete every document in the collection before seeding
    #[arg(long)]
    pub reset: bool,
}

impl SeedCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = open_store(config)?;

        let added = if self.reset {
            tracing::info!("Resetting collection '{}'", store.collection());
            store.reset().await?;
            store.add_documents(seed_documents()).await?
        } else {
            seed_if_empty(store.as_ref()).await?
        };

        let total = store.count().await?;
        if added == 0 {
            println!(
                "Collection '{}' already has {} documents; nothing seeded (use --reset to re-seed)",
                store.collection(),
                total
            );
        } else {
            println!(
                "Seeded {} documents into '{}' ({} total) at {}",
                added,
                store.collection(),
                total,
                store.path().display()
            );
        }

        Ok(())
    }
}
