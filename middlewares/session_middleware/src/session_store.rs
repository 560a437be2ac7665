use std::{collections::HashMap, fmt, sync::Arc};

use chrono::{DateTime, Local};
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{config::AxumSessionConfig, database_pool::AxumDatabasePool, session_data::SessionData};

/// Two-level session storage: a process-local cache in front of the
/// persistent pool. Every write goes through to the pool.
#[derive(Clone)]
pub struct AxumSessionStore {
    pub(crate) memory_store: Arc<DashMap<Uuid, SessionData>>,
    pub(crate) database_store: Arc<dyn AxumDatabasePool>,
    pub(crate) config: AxumSessionConfig,
    pub(crate) last_purge: Arc<Mutex<DateTime<Local>>>,
}

impl fmt::Debug for AxumSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumSessionStore")
            .field("cached_sessions", &self.memory_store.len())
            .field("database_store", &self.database_store)
            .field("config", &self.config)
            .finish()
    }
}

impl AxumSessionStore {
    pub fn new(database: Arc<dyn AxumDatabasePool>) -> Self {
        Self {
            memory_store: Default::default(),
            database_store: database,
            config: Default::default(),
            last_purge: Arc::new(Mutex::new(Local::now())),
        }
    }

    pub fn with_config(mut self, config: AxumSessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AxumSessionConfig {
        &self.config
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        data: HashMap<String, String>,
    ) -> Result<SessionData, anyhow::Error> {
        let session = SessionData::new(user_id, data, self.config.idle_timeout);
        self.store(&session).await?;
        Ok(session)
    }

    pub async fn store(&self, session_data: &SessionData) -> Result<(), anyhow::Error> {
        self.database_store.store(session_data).await?;
        self.memory_store.insert(session_data.session_id, session_data.clone());
        Ok(())
    }

    /// Returns the live session for `session_id`. Expired sessions are
    /// removed from both levels and reported as absent.
    pub async fn load(&self, session_id: &Uuid) -> Result<Option<SessionData>, anyhow::Error> {
        let now = Local::now();
        let cached = self.memory_store.get(session_id).map(|s| s.clone());
        let session = match cached {
            Some(session) => Some(session),
            None => self.database_store.load(session_id).await?,
        };

        match session {
            Some(session) if session.is_expired(now) => {
                tracing::debug!("session {} expired", session_id);
                self.remove(session_id).await?;
                Ok(None)
            }
            Some(session) => {
                self.memory_store.insert(session.session_id, session.clone());
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Slides the expiry of a live session forward. The pool is only written
    /// when less than `refresh_threshold` remained on the stored expiry.
    pub async fn touch(&self, session: &mut SessionData) -> Result<(), anyhow::Error> {
        let now = Local::now();
        let stored_remaining = session.stored_expiry_time - now;
        session.expiry_time = now + self.config.idle_timeout;

        if stored_remaining < self.config.refresh_threshold {
            session.stored_expiry_time = session.expiry_time;
            self.store(session).await
        } else {
            self.memory_store.insert(session.session_id, session.clone());
            Ok(())
        }
    }

    pub async fn remove(&self, session_id: &Uuid) -> Result<(), anyhow::Error> {
        self.memory_store.remove(session_id);
        self.database_store.delete(session_id).await
    }

    /// Drops expired sessions from the cache and from the pool. Returns the
    /// number of rows the pool removed.
    pub async fn purge_expired(&self) -> Result<usize, anyhow::Error> {
        let now = Local::now();
        self.memory_store.retain(|_k, v| !v.is_expired(now));
        self.database_store.delete_expired(now).await
    }

    /// Runs `purge_expired` at most once per `purge_interval`.
    pub(crate) async fn purge_expired_if_due(&self) -> Result<(), anyhow::Error> {
        let now = Local::now();
        {
            let mut last_purge = self.last_purge.lock().await;
            if now - *last_purge < self.config.purge_interval {
                return Ok(());
            }
            *last_purge = now;
        }

        let removed = self.purge_expired().await?;
        if removed > 0 {
            tracing::debug!("purged {} expired sessions", removed);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use tokio::sync::Mutex;

    #[derive(Debug, Default)]
    pub(crate) struct TestPool {
        pub(crate) sessions: Mutex<HashMap<Uuid, SessionData>>,
        pub(crate) writes: Mutex<usize>,
    }

    #[async_trait]
    impl AxumDatabasePool for TestPool {
        async fn store(&self, session_data: &SessionData) -> Result<(), anyhow::Error> {
            *self.writes.lock().await += 1;
            self.sessions
                .lock()
                .await
                .insert(session_data.session_id, session_data.clone());
            Ok(())
        }

        async fn load(&self, session_id: &Uuid) -> Result<Option<SessionData>, anyhow::Error> {
            Ok(self.sessions.lock().await.get(session_id).cloned())
        }

        async fn delete(&self, session_id: &Uuid) -> Result<(), anyhow::Error> {
            self.sessions.lock().await.remove(session_id);
            Ok(())
        }

        async fn delete_expired(&self, now: DateTime<Local>) -> Result<usize, anyhow::Error> {
            let mut sessions = self.sessions.lock().await;
            let before = sessions.len();
            sessions.retain(|_k, v| !v.is_expired(now));
            Ok(before - sessions.len())
        }
    }

    #[tokio::test]
    async fn created_session_is_loadable_after_cache_loss() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone());
        let user_id = Uuid::new_v4();

        let session = store.create(user_id, HashMap::new()).await.unwrap();
        store.memory_store.clear();

        let loaded = store.load(&session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.user_id, user_id);
        assert!(store.memory_store.contains_key(&session.session_id));
    }

    #[tokio::test]
    async fn expired_session_is_dropped_everywhere() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone());

        let mut session = SessionData::new(Uuid::new_v4(), HashMap::new(), Duration::minutes(5));
        session.expiry_time = Local::now() - Duration::seconds(1);
        store.store(&session).await.unwrap();

        assert!(store.load(&session.session_id).await.unwrap().is_none());
        assert!(pool.sessions.lock().await.is_empty());
        assert!(store.memory_store.is_empty());
    }

    #[tokio::test]
    async fn touch_only_writes_through_near_expiry() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone())
            .with_config(AxumSessionConfig::default().with_idle_timeout(Duration::hours(2)));

        let mut session = store.create(Uuid::new_v4(), HashMap::new()).await.unwrap();
        assert_eq!(*pool.writes.lock().await, 1);

        store.touch(&mut session).await.unwrap();
        assert_eq!(*pool.writes.lock().await, 1);

        session.stored_expiry_time = Local::now() + Duration::minutes(10);
        store.touch(&mut session).await.unwrap();
        assert_eq!(*pool.writes.lock().await, 2);
        assert!(session.expiry_time > Local::now() + Duration::minutes(110));
        assert_eq!(session.stored_expiry_time, session.expiry_time);
    }

    #[tokio::test]
    async fn touch_writes_through_when_stored_expiry_is_near() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone());

        // The cached copy has slid far ahead while the stored row is about
        // to run out.
        let mut session = store.create(Uuid::new_v4(), HashMap::new()).await.unwrap();
        session.stored_expiry_time = Local::now() + Duration::hours(1);
        session.expiry_time = Local::now() + Duration::days(6);
        pool.sessions
            .lock()
            .await
            .get_mut(&session.session_id)
            .unwrap()
            .expiry_time = session.stored_expiry_time;

        store.touch(&mut session).await.unwrap();

        let stored = pool.sessions.lock().await[&session.session_id].expiry_time;
        assert!(stored > Local::now() + Duration::days(6));
        assert_eq!(stored, session.expiry_time);
    }

    #[tokio::test]
    async fn purge_removes_abandoned_sessions() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone());

        let live = store.create(Uuid::new_v4(), HashMap::new()).await.unwrap();
        let mut abandoned = SessionData::new(Uuid::new_v4(), HashMap::new(), Duration::minutes(5));
        abandoned.expiry_time = Local::now() - Duration::minutes(1);
        store.store(&abandoned).await.unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        let sessions = pool.sessions.lock().await;
        assert!(sessions.contains_key(&live.session_id));
        assert!(!sessions.contains_key(&abandoned.session_id));
        assert!(!store.memory_store.contains_key(&abandoned.session_id));
    }

    #[tokio::test]
    async fn purge_runs_once_per_interval() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone())
            .with_config(AxumSessionConfig::default().with_purge_interval(Duration::hours(1)));

        let mut abandoned = SessionData::new(Uuid::new_v4(), HashMap::new(), Duration::minutes(5));
        abandoned.expiry_time = Local::now() - Duration::minutes(1);
        pool.store(&abandoned).await.unwrap();

        store.purge_expired_if_due().await.unwrap();
        assert_eq!(pool.sessions.lock().await.len(), 1);

        *store.last_purge.lock().await = Local::now() - Duration::hours(2);
        store.purge_expired_if_due().await.unwrap();
        assert!(pool.sessions.lock().await.is_empty());
    }
}
