//! Preview history: which templates a user has previewed for each resume.
//!
//! A plain set-membership store on Redis, one set per resume
//! (`preview_history:{resume_id}`). Entries expire with the set after
//! `PREVIEW_TTL_SECS` of inactivity.

pub mod handlers;

use redis::{AsyncCommands, Client as RedisClient, RedisResult};
use tracing::debug;
use uuid::Uuid;

const KEY_PREFIX: &str = "preview_history";
const PREVIEW_TTL_SECS: i64 = 60 * 60 * 24 * 30;

pub fn preview_key(resume_id: Uuid) -> String {
    format!("{KEY_PREFIX}:{resume_id}")
}

#[derive(Clone)]
pub struct PreviewHistory {
    redis: RedisClient,
}

impl PreviewHistory {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    /// Marks `template_id` as previewed. Returns `true` if it was new.
    pub async fn add(&self, resume_id: Uuid, template_id: &str) -> RedisResult<bool> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let key = preview_key(resume_id);
        let added: i64 = conn.sadd(&key, template_id).await?;
        let _: bool = conn.expire(&key, PREVIEW_TTL_SECS).await?;
        debug!("Preview recorded for resume {resume_id}: {template_id} (new: {})", added > 0);
        Ok(added > 0)
    }

    pub async fn contains(&self, resume_id: Uuid, template_id: &str) -> RedisResult<bool> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        conn.sismember(preview_key(resume_id), template_id).await
    }

    /// All previewed template ids for a resume, sorted.
    pub async fn list(&self, resume_id: Uuid) -> RedisResult<Vec<String>> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let mut templates: Vec<String> = conn.smembers(preview_key(resume_id)).await?;
        templates.sort();
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_key_is_namespaced_per_resume() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(preview_key(a), format!("preview_history:{a}"));
        assert_ne!(preview_key(a), preview_key(b));
    }
}
