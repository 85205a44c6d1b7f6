//! Persistence seam for template configs.
//!
//! The controller only sees [`ConfigStore`]. `PgConfigStore` keeps the config in
//! the `resumes.template_config` JSONB column; `InMemoryConfigStore` backs tests
//! and local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::customization::template_config::TemplateConfig;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resume {0} does not exist")]
    ResumeMissing(Uuid),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Loads and stores the saved template config of a resume.
///
/// `fetch_config` returns the raw saved document so the caller can merge it
/// over template defaults; `Ok(None)` means nothing was saved yet.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn fetch_config(&self, resume_id: Uuid) -> Result<Option<Value>, PersistenceError>;

    async fn store_config(
        &self,
        resume_id: Uuid,
        config: &TemplateConfig,
    ) -> Result<(), PersistenceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn fetch_config(&self, resume_id: Uuid) -> Result<Option<Value>, PersistenceError> {
        let saved: Option<Option<Value>> =
            sqlx::query_scalar("SELECT template_config FROM resumes WHERE id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(saved.flatten())
    }

    async fn store_config(
        &self,
        resume_id: Uuid,
        config: &TemplateConfig,
    ) -> Result<(), PersistenceError> {
        let document = serde_json::to_value(config)?;
        let result = sqlx::query(
            "UPDATE resumes SET template_config = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(resume_id)
        .bind(&document)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::ResumeMissing(resume_id));
        }
        info!("Saved template config for resume {resume_id}");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryConfigStore {
    configs: RwLock<HashMap<Uuid, Value>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a raw saved document, bypassing validation.
    pub async fn seed(&self, resume_id: Uuid, document: Value) {
        self.configs.write().await.insert(resume_id, document);
    }

    pub async fn saved(&self, resume_id: Uuid) -> Option<Value> {
        self.configs.read().await.get(&resume_id).cloned()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn fetch_config(&self, resume_id: Uuid) -> Result<Option<Value>, PersistenceError> {
        Ok(self.saved(resume_id).await)
    }

    async fn store_config(
        &self,
        resume_id: Uuid,
        config: &TemplateConfig,
    ) -> Result<(), PersistenceError> {
        let document = serde_json::to_value(config)?;
        self.configs.write().await.insert(resume_id, document);
        Ok(())
    }
}
