use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::fmt::Debug;
use uuid::Uuid;

use crate::session_data::SessionData;

/// Persistent backing storage for signed-in sessions.
#[async_trait]
pub trait AxumDatabasePool: Debug + Send + Sync {
    /// Inserts the session or replaces the stored one with the same id.
    async fn store(&self, session_data: &SessionData) -> Result<(), anyhow::Error>;

    async fn load(&self, session_id: &Uuid) -> Result<Option<SessionData>, anyhow::Error>;

    async fn delete(&self, session_id: &Uuid) -> Result<(), anyhow::Error>;

    /// Removes every session whose stored expiry is before `now` and returns
    /// how many were removed.
    async fn delete_expired(&self, now: DateTime<Local>) -> Result<usize, anyhow::Error>;
}
