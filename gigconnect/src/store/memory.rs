use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;

use super::WorkerStore;
use crate::{
    errors::RepoError,
    id::generate_worker_id,
    model::{FIELD_CONTACT, NewWorker, WorkerRecord},
    search::FilterCondition,
};

#[derive(Debug, Default)]
struct MemoryState {
    workers: Vec<WorkerRecord>,
    /// contact -> id of the worker that owns it
    contacts: HashMap<String, String>,
}

/// In-process store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.workers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl WorkerStore for MemoryStore {
    async fn find(&self, filter: &FilterCondition) -> Result<Vec<WorkerRecord>, RepoError> {
        let compiled = filter.compile()?;
        let state = self.state.read().await;
        Ok(state
            .workers
            .iter()
            .filter(|worker| compiled.matches(*worker))
            .cloned()
            .collect())
    }

    async fn insert(&self, worker: NewWorker) -> Result<WorkerRecord, RepoError> {
        let record = WorkerRecord::from_new(generate_worker_id(), Utc::now(), worker)?;

        let mut state = self.state.write().await;
        if let Some(contact) = &record.contact
            && let Some(existing) = state.contacts.get(contact)
        {
            return Err(RepoError::UniqueConstraintViolation {
                fields: vec![FIELD_CONTACT.to_string()],
                values: vec![contact.clone()],
                existing_entity_id: existing.clone(),
            });
        }

        if let Some(contact) = &record.contact {
            state.contacts.insert(contact.clone(), record.id.clone());
        }
        state.workers.push(record.clone());
        Ok(record)
    }
}
