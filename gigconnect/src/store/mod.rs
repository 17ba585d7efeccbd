//! Worker record stores.
//!
//! A store evaluates [`FilterCondition`]s and owns the sparse uniqueness of `contact`: the
//! check and the write happen atomically inside the store, so two racing inserts of the same
//! contact can never both succeed.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::{RedisStore, cleanup_pattern};

use std::future::Future;

use crate::{
    errors::{RepoError, WorkerError},
    model::{NewWorker, WorkerRecord, WorkerSubmission},
    normalize::validate_and_normalize,
    search::FilterCondition,
};

pub trait WorkerStore: Send + Sync + 'static {
    /// Records matching `filter`, in creation order.
    fn find(&self, filter: &FilterCondition) -> impl Future<Output = Result<Vec<WorkerRecord>, RepoError>> + Send;

    /// Persists a worker, assigning its id and creation time.
    fn insert(&self, worker: NewWorker) -> impl Future<Output = Result<WorkerRecord, RepoError>> + Send;
}

/// Full create operation: validate, normalize, then exactly one insert attempt.
pub async fn create_worker<S: WorkerStore>(
    store: &S,
    submission: WorkerSubmission,
) -> Result<WorkerRecord, WorkerError> {
    let worker = validate_and_normalize(submission)?;
    Ok(store.insert(worker).await?)
}

/// Search operation: build the predicate from raw terms and query the store.
pub async fn search_workers<S: WorkerStore>(
    store: &S,
    name_term: Option<&str>,
    skill_term: Option<&str>,
    city_term: Option<&str>,
) -> Result<Vec<WorkerRecord>, RepoError> {
    let filter = crate::filters::build_filter(name_term, skill_term, city_term);
    log::debug!("worker search filter: {}", filter.to_document());
    store.find(&filter).await
}
