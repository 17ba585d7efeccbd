//! # Redis
//!
//! Worker documents live as JSON strings, one key per worker. A sorted set scored by insertion
//! sequence lists every worker id, and one key per claimed contact points at the owning worker.
//!
//! ```text
//! {prefix}:gigconnect:workers:{id}                         JSON document
//! {prefix}:gigconnect:workers:index                        ZSET id -> insertion sequence
//! {prefix}:gigconnect:workers:seq                          insertion sequence counter
//! {prefix}:gigconnect:workers:unique:contact:{contact}     id
//! ```
//!
//! Inserts run as a single Lua script so the contact claim and the document write are atomic.
//! Searches load the documents and evaluate the compiled filter in process, since the stored
//! patterns are regular expressions.

use std::{borrow::Cow, sync::LazyLock};

use chrono::Utc;
use log::info;
use redis::{Script, aio::ConnectionManager};
use serde_json::Value;

use super::WorkerStore;
use crate::{
    errors::RepoError,
    id::generate_worker_id,
    keys::KeyContext,
    model::{FIELD_CONTACT, NewWorker, WORKER_COLLECTION, WorkerRecord},
    search::FilterCondition,
};

const SERVICE: &str = "gigconnect";

pub const WORKER_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/worker_create.lua");

static WORKER_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(WORKER_CREATE_SCRIPT_BODY));

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Opens a connection manager for `url` and wraps it.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, RepoError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        let store = Self::new(conn, prefix);
        info!("Connected to Redis worker store (prefix {})", store.prefix);
        Ok(store)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn keys(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, SERVICE)
    }

    /// Deletes every key this store owns.
    pub async fn clear(&self) -> Result<u64, RepoError> {
        let mut conn = self.conn.clone();
        cleanup_pattern(&mut conn, &self.keys().service_pattern()).await
    }
}

impl WorkerStore for RedisStore {
    async fn find(&self, filter: &FilterCondition) -> Result<Vec<WorkerRecord>, RepoError> {
        let compiled = filter.compile()?;
        let keys = self.keys();
        let mut conn = self.conn.clone();

        let ids: Vec<String> = redis::cmd("ZRANGE")
            .arg(keys.index(WORKER_COLLECTION))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let doc_keys: Vec<String> = ids.iter().map(|id| keys.entity(WORKER_COLLECTION, id)).collect();
        let docs: Vec<Option<String>> = redis::cmd("MGET").arg(&doc_keys).query_async(&mut conn).await?;

        let mut workers = Vec::with_capacity(docs.len());
        for doc in docs.into_iter().flatten() {
            let worker: WorkerRecord = serde_json::from_str(&doc).map_err(|err| RepoError::Other {
                message: Cow::Owned(format!("Failed to deserialize worker document: {err}")),
            })?;
            if compiled.matches(&worker) {
                workers.push(worker);
            }
        }
        Ok(workers)
    }

    async fn insert(&self, worker: NewWorker) -> Result<WorkerRecord, RepoError> {
        let record = WorkerRecord::from_new(generate_worker_id(), Utc::now(), worker)?;
        let payload = serde_json::to_string(&record).map_err(|err| RepoError::Other {
            message: Cow::Owned(format!("failed to serialize worker: {err}")),
        })?;

        let keys = self.keys();
        let mut invocation = WORKER_CREATE_SCRIPT.prepare_invoke();
        invocation
            .key(keys.entity(WORKER_COLLECTION, &record.id))
            .key(keys.index(WORKER_COLLECTION))
            .key(keys.sequence(WORKER_COLLECTION));
        if let Some(contact) = &record.contact {
            invocation.key(keys.unique(WORKER_COLLECTION, FIELD_CONTACT, contact));
        }
        invocation
            .arg(&record.id)
            .arg(payload)
            .arg(record.contact.as_deref().unwrap_or_default());

        let mut conn = self.conn.clone();
        let raw: String = invocation.invoke_async(&mut conn).await?;
        parse_script_response(&raw)?;

        Ok(record)
    }
}

fn parse_script_response(raw: &str) -> Result<Value, RepoError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| RepoError::Other {
        message: Cow::Owned(format!("failed to parse lua response: {err}")),
    })?;

    let Some(error) = value.get("error") else {
        return Ok(value);
    };

    match error.as_str() {
        Some("unique_constraint_violation") => {
            let strings = |key: &str| -> Vec<String> {
                value
                    .get(key)
                    .and_then(|v| v.as_array())
                    .map(|arr| {
                        arr.iter()
                            .map(|v| match v {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            };
            let existing_entity_id = value
                .get("existing_entity_id")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default();
            Err(RepoError::UniqueConstraintViolation {
                fields: strings("fields"),
                values: strings("values"),
                existing_entity_id,
            })
        }
        Some(other) => Err(RepoError::Other {
            message: Cow::Owned(other.to_string()),
        }),
        None => Err(RepoError::Other {
            message: Cow::Borrowed("lua_error"),
        }),
    }
}

/// Delete all keys matching a pattern (for test cleanup).
///
/// This performs a SCAN + DEL operation to safely delete keys without blocking Redis.
pub async fn cleanup_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64, RepoError> {
    const SCAN_COUNT: usize = 1000;
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await?;

        if !keys.is_empty() {
            let deleted: u64 = redis::cmd("DEL").arg(&keys).query_async(conn).await?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    Ok(total_deleted)
}
