use std::sync::Arc;
use std::time::Duration;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::ai_client::AiClient;
use crate::config::Config;
use crate::customization::{ConfigStore, EditorSessions};
use crate::previews::PreviewHistory;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub ai: AiClient,
    pub config: Config,
    /// Where editor sessions load and save template configs.
    pub config_store: Arc<dyn ConfigStore>,
    pub sessions: Arc<EditorSessions>,
    pub previews: PreviewHistory,
}

impl AppState {
    pub fn new(db: PgPool, redis: RedisClient, config: Config, config_store: Arc<dyn ConfigStore>) -> Self {
        Self {
            ai: AiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone()),
            previews: PreviewHistory::new(redis),
            sessions: Arc::new(EditorSessions::new(Duration::from_secs(
                config.session_idle_secs,
            ))),
            db,
            config,
            config_store,
        }
    }
}

/// State wired to an in-memory config store and pools that never connect
/// unless a handler actually touches them.
#[cfg(test)]
pub fn test_state(config_store: Arc<dyn ConfigStore>) -> AppState {
    let config = Config {
        database_url: "postgres://localhost/resume_test".to_string(),
        redis_url: "redis://127.0.0.1/".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: "gemini-1.5-flash".to_string(),
        public_base_url: "https://resumes.example.com".to_string(),
        session_idle_secs: 1800,
        port: 0,
        rust_log: "debug".to_string(),
    };
    let db = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    let redis = RedisClient::open(config.redis_url.clone()).expect("redis client");
    AppState::new(db, redis, config, config_store)
}
