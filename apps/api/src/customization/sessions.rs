//! Live editor sessions: one controller per open editor, addressed by a
//! session id the client keeps between requests.
//!
//! Sessions idle for longer than the configured timeout are dropped. Expired
//! entries are swept whenever a session is opened, and a lookup of an expired
//! session removes it and reports it missing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::customization::controller::CustomizationController;

pub type SharedController = Arc<Mutex<CustomizationController>>;

struct SessionEntry {
    controller: SharedController,
    last_seen: Instant,
}

pub struct EditorSessions {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl EditorSessions {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Registers a controller and returns its session id.
    pub async fn open(&self, controller: CustomizationController) -> (Uuid, SharedController) {
        let session_id = Uuid::new_v4();
        let shared = Arc::new(Mutex::new(controller));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!("Expired {expired} idle editor sessions");
        }

        sessions.insert(
            session_id,
            SessionEntry {
                controller: Arc::clone(&shared),
                last_seen: now,
            },
        );
        info!(
            "Opened editor session {session_id} ({} active)",
            sessions.len()
        );
        (session_id, shared)
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, session_id: Uuid) -> Option<SharedController> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&session_id)?;

        if now.duration_since(entry.last_seen) >= self.idle_timeout {
            sessions.remove(&session_id);
            debug!("Editor session {session_id} expired");
            return None;
        }
        entry.last_seen = now;
        Some(Arc::clone(&entry.controller))
    }

    /// Drops a session. Returns `false` if it did not exist.
    pub async fn close(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            info!("Closed editor session {session_id}");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::store::InMemoryConfigStore;

    const IDLE: Duration = Duration::from_secs(60);

    fn controller() -> CustomizationController {
        CustomizationController::new(Arc::new(InMemoryConfigStore::new()), "modern-1", None)
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let sessions = EditorSessions::new(IDLE);

        let (session_id, _) = sessions.open(controller()).await;
        assert!(sessions.get(session_id).await.is_some());

        assert!(sessions.close(session_id).await);
        assert!(!sessions.close(session_id).await);
        assert!(sessions.get(session_id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let sessions = EditorSessions::new(IDLE);
        let (session_id, _) = sessions.open(controller()).await;

        tokio::time::advance(IDLE + Duration::from_secs(1)).await;
        assert!(sessions.get(session_id).await.is_none());
        assert!(!sessions.close(session_id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_keeps_session_alive() {
        let sessions = EditorSessions::new(IDLE);
        let (session_id, _) = sessions.open(controller()).await;

        for _ in 0..3 {
            tokio::time::advance(IDLE / 2).await;
            assert!(sessions.get(session_id).await.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_sweeps_expired_sessions() {
        let sessions = EditorSessions::new(IDLE);
        let (stale, _) = sessions.open(controller()).await;

        tokio::time::advance(IDLE * 2).await;
        let (fresh, _) = sessions.open(controller()).await;

        assert_eq!(sessions.sessions.read().await.len(), 1);
        assert!(sessions.sessions.read().await.contains_key(&fresh));
        assert!(!sessions.sessions.read().await.contains_key(&stale));
    }
}
