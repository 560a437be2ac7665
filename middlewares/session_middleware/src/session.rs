use async_trait::async_trait;
use axum_core::extract::FromRequestParts;
use http::{request::Parts, StatusCode};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{error::SessionError, session_data::SessionData, session_store::AxumSessionStore};

/// Per-request view of the caller's session, inserted by `AxumSessionLayer`.
#[derive(Clone, Debug)]
pub struct AxumSession {
    pub(crate) store: AxumSessionStore,
    pub(crate) session_data: Option<SessionData>,
}

impl AxumSession {
    pub fn get_logined_user_id(&self) -> Option<Uuid> {
        self.session_data.as_ref().map(|s| s.user_id)
    }

    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.session_data
            .as_ref()
            .and_then(|s| s.data.get(key))
            .map(String::as_str)
    }

    pub fn require_login(&self) -> Result<&SessionData, SessionError> {
        self.session_data.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    /// Starts a new session for `user_id` and returns its bearer token. A
    /// session the request already carried is revoked first.
    pub async fn sign_in(
        &mut self,
        user_id: Uuid,
        data: HashMap<String, String>,
    ) -> Result<Uuid, SessionError> {
        if let Some(previous) = self.session_data.take() {
            self.store.remove(&previous.session_id).await?;
        }
        let session = self.store.create(user_id, data).await?;
        let token = session.session_id;
        self.session_data = Some(session);
        Ok(token)
    }

    pub async fn sign_out(&mut self) -> Result<(), SessionError> {
        match self.session_data.take() {
            Some(session) => Ok(self.store.remove(&session.session_id).await?),
            None => Err(SessionError::NotLoggedIn),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AxumSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AxumSession>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Can't extract AxumSession. Is `AxumSessionLayer` enabled?",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_store::tests::TestPool;
    use std::sync::Arc;

    #[tokio::test]
    async fn sign_in_replaces_previous_session() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone());
        let mut session = AxumSession {
            store: store.clone(),
            session_data: None,
        };

        let user_id = Uuid::new_v4();
        let mut data = HashMap::new();
        data.insert("barber_name".to_string(), "Oxy".to_string());

        let first = session.sign_in(user_id, data.clone()).await.unwrap();
        let second = session.sign_in(user_id, data).await.unwrap();

        assert_ne!(first, second);
        assert!(store.load(&first).await.unwrap().is_none());
        assert_eq!(session.get_logined_user_id(), Some(user_id));
        assert_eq!(session.get_data("barber_name"), Some("Oxy"));
    }

    #[tokio::test]
    async fn sign_out_requires_a_session() {
        let pool = Arc::new(TestPool::default());
        let store = AxumSessionStore::new(pool.clone());
        let mut session = AxumSession {
            store: store.clone(),
            session_data: None,
        };
        assert!(matches!(session.sign_out().await, Err(SessionError::NotLoggedIn)));

        let token = session.sign_in(Uuid::new_v4(), HashMap::new()).await.unwrap();
        session.sign_out().await.unwrap();
        assert!(session.require_login().is_err());
        assert!(store.load(&token).await.unwrap().is_none());
    }
}
