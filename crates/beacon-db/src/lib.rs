pub mod memory;
pub mod migrations;
pub mod queries;
pub mod slug;
pub mod store;

use anyhow::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use memory::MemoryStore;
pub use store::{CampaignStore, StoreError, UserStore};

/// Postgres-backed store. Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects the pool and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        migrations::run(&pool).await?;

        info!("Database pool connected");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
