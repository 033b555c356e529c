use std::{collections::HashMap, sync::Arc};

use axum::extract::FromRef;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    config::Config, error::AppError, models::session::SessionState, utils::gemini::QuizGenerator,
};

/// In-memory registry of live quiz sessions, keyed by session id.
///
/// Each session is only ever touched by its own requests; the lock guards the
/// map itself and is never held across the generation call.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new idle session and returns its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().await.insert(id, SessionState::new());
        id
    }

    /// Runs `f` against one session, refreshing its idle timer.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.lock().await;
        let state = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
        state.touch();
        Ok(f(state))
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.lock().await.contains_key(&id)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    /// Drops sessions idle for longer than `ttl`. Returns how many were evicted.
    pub async fn purge_idle(&self, ttl: Duration) -> usize {
        // A ttl reaching past the representable range means nothing is idle yet.
        let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
            return 0;
        };
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, state| state.last_active() >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub generator: Arc<dyn QuizGenerator>,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn QuizGenerator>) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
            generator,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuizGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}
