//! Redis Session Store Adapter
//!
//! Persists serialized sessions under a key prefix with a configurable TTL.
//! A payload that no longer deserializes is treated as absent (and logged),
//! so schema drift restarts the interview instead of failing turns.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

const KEY_PREFIX: &str = "visa_compass:session:";

/// Redis-backed storage for interview sessions.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    /// Connects to Redis and returns a ready store.
    ///
    /// `ttl_secs` of zero disables expiry.
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e: redis::RedisError| SessionStoreError::Backend(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Backend(e.to_string()))?;
        Ok(Self { conn, ttl_secs })
    }

    /// Wraps an existing connection (useful when sharing one pool).
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    fn key(&self, id: SessionId) -> String {
        format!("{KEY_PREFIX}{id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get(self.key(id))
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Backend(e.to_string()))?;

        match payload {
            None => Ok(None),
            Some(json) => match serde_json::from_str(&json) {
                Ok(session) => Ok(Some(session)),
                Err(error) => {
                    tracing::warn!(
                        session_id = %id,
                        %error,
                        "stored session no longer deserializes; treating as absent"
                    );
                    Ok(None)
                }
            },
        }
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(session)
            .map_err(|_| SessionStoreError::SerializationFailed(*session.id()))?;
        let key = self.key(*session.id());
        let mut conn = self.conn.clone();

        if self.ttl_secs > 0 {
            conn.set_ex::<_, _, ()>(key, json, self.ttl_secs)
                .await
                .map_err(|e: redis::RedisError| SessionStoreError::Backend(e.to_string()))?;
        } else {
            conn.set::<_, _, ()>(key, json)
                .await
                .map_err(|e: redis::RedisError| SessionStoreError::Backend(e.to_string()))?;
        }
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(id))
            .await
            .map_err(|e: redis::RedisError| SessionStoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
