use std::sync::Arc;

use crate::store::WorkerStore;

pub struct AppState<S> {
    pub store: S,
}

impl<S: WorkerStore> AppState<S> {
    pub fn new(store: S) -> Arc<Self> {
        Arc::new(Self { store })
    }
}
