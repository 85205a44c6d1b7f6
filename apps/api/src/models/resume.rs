use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_id: String,
    /// Authored resume sections (personal info, experience, education, ...).
    pub content: Value,
    /// Last saved template config, if the user ever saved one.
    pub template_config: Option<Value>,
    pub is_public: bool,
    pub share_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a public share link exposes: no owner, no timestamps beyond the last edit.
#[derive(Debug, Clone, Serialize)]
pub struct PublicResume {
    pub title: String,
    pub template_id: String,
    pub content: Value,
    pub template_config: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for PublicResume {
    fn from(row: ResumeRow) -> Self {
        PublicResume {
            title: row.title,
            template_id: row.template_id,
            content: row.content,
            template_config: row.template_config,
            updated_at: row.updated_at,
        }
    }
}
