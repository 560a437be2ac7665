use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use axum_session_middleware::{AxumDatabasePool, SessionData};
use chrono::{DateTime, Local};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::*;
use crate::store::rows::{NewSession, SessionRow};
use crate::store::PgStore;

#[async_trait]
impl AxumDatabasePool for PgStore {
    async fn store(&self, session_data: &SessionData) -> Result<(), anyhow::Error> {
        let data_str = serde_json::to_string(&session_data.data)
            .map_err(|e| anyhow!("Serialize session data error: {}", e))?;
        let session_data = session_data.clone();

        self.run(move |conn| {
            let new_session = NewSession {
                session_id: &session_data.session_id,
                user_id: &session_data.user_id,
                init_time: session_data.init_time,
                expiry_time: session_data.expiry_time,
                create_time: Local::now(),
                update_time: Local::now(),
                data: Some(data_str.as_str()),
            };
            diesel::insert_into(sessions::table)
                .values(&new_session)
                .on_conflict(sessions::session_id)
                .do_update()
                .set((
                    sessions::expiry_time.eq(session_data.expiry_time),
                    sessions::data.eq(Some(data_str.as_str())),
                    sessions::update_time.eq(Local::now()),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await?;

        Ok(())
    }

    async fn load(&self, session_id: &Uuid) -> Result<Option<SessionData>, anyhow::Error> {
        let session_id = *session_id;
        let session = self
            .run(move |conn| {
                Ok(sessions::table
                    .filter(sessions::session_id.eq(session_id))
                    .first::<SessionRow>(conn)
                    .optional()?)
            })
            .await?;

        Ok(session.map(|session| {
            // Unreadable payloads fall back to an empty map; the identity is
            // still carried by `user_id`.
            let data = session
                .data
                .as_deref()
                .and_then(|d| serde_json::from_str::<HashMap<String, String>>(d).ok())
                .unwrap_or_default();
            SessionData {
                session_id: session.session_id,
                user_id: session.user_id,
                init_time: session.init_time,
                expiry_time: session.expiry_time,
                stored_expiry_time: session.expiry_time,
                data,
            }
        }))
    }

    async fn delete(&self, session_id: &Uuid) -> Result<(), anyhow::Error> {
        let session_id = *session_id;
        self.run(move |conn| {
            diesel::delete(sessions::table.filter(sessions::session_id.eq(session_id)))
                .execute(conn)?;
            Ok(())
        })
        .await?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Local>) -> Result<usize, anyhow::Error> {
        let removed = self
            .run(move |conn| {
                Ok(diesel::delete(sessions::table.filter(sessions::expiry_time.lt(now)))
                    .execute(conn)?)
            })
            .await?;

        Ok(removed)
    }
}
