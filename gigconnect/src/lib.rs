//! GigConnect core library.
//!
//! Worker registration and discovery: input validation and sanitization, case-insensitive
//! search predicates, pluggable worker stores (in-memory and Redis), the HTTP API, and a
//! client mirroring the browser search and registration flows.

pub mod client;
pub mod errors;
pub mod filters;
pub mod id;
pub mod keys;
pub mod model;
pub mod normalize;
pub mod sanitize;
pub mod search;
pub mod server;
pub mod store;
pub mod validators;

pub use errors::*;
pub use filters::build_filter;
pub use model::{InputValue, NewWorker, WorkerRecord, WorkerSubmission};
pub use search::FilterCondition;
pub use store::{MemoryStore, RedisStore, WorkerStore, create_worker, search_workers};

// Re-export redis so dependents can build connections without a direct dependency.
pub use redis;
