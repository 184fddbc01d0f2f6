//! Hybrid database facade.
//!
//! Two simulated backends behind one service object:
//! - `sql`: relational-style content catalog (in memory, latency-delayed)
//! - `nosql`: document-style activity log (persisted to local storage)
//!
//! Build one [`Database`] and pass it to whoever needs it.

pub mod nosql;
pub mod sql;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ResolvedConfig;
use crate::storage::LocalStorage;

pub use nosql::{ActivityLogStore, DEFAULT_LOG_CAPACITY, LOG_COLLECTION};
pub use sql::ContentStore;

/// Simulated network latency of the content store
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(800);

/// Tunables for the facade
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub latency: Duration,
    pub log_capacity: usize,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl DatabaseOptions {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.simulation.latency_ms),
            log_capacity: config.simulation.log_capacity,
        }
    }

    /// No latency, default capacity
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            ..Default::default()
        }
    }
}

/// The `sql` + `nosql` pair
pub struct Database {
    pub sql: ContentStore,
    pub nosql: ActivityLogStore,
}

impl Database {
    pub fn new(storage: Arc<dyn LocalStorage>, options: &DatabaseOptions) -> Self {
        Self {
            sql: ContentStore::new(options.latency),
            nosql: ActivityLogStore::with_capacity(storage, options.log_capacity),
        }
    }
}
