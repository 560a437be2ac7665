use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};
use uuid::Uuid;

/// A signed-in session. The `session_id` doubles as the bearer token handed to
/// the client.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub init_time: DateTime<Local>,
    pub expiry_time: DateTime<Local>,
    /// Expiry as last written to the database pool. `expiry_time` slides on
    /// every request; this one only moves on write-through.
    pub stored_expiry_time: DateTime<Local>,
    pub data: HashMap<String, String>,
}

impl SessionData {
    pub fn new(user_id: Uuid, data: HashMap<String, String>, idle_timeout: Duration) -> SessionData {
        let now = Local::now();
        SessionData {
            session_id: Uuid::new_v4(),
            user_id,
            init_time: now,
            expiry_time: now + idle_timeout,
            stored_expiry_time: now + idle_timeout,
            data,
        }
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        self.expiry_time <= now
    }
}
