//! User persistence
//!
//! [`UserStore`] is the only seam that touches durable state. Two backends:
//!
//! - [`MemoryStore`]: a locked `HashMap`, lost on exit
//! - [`DocumentStore`]: the append-only document file in [`crate::storage`]
//!
//! Both assign a UUID v4 to records saved without an id.

mod document;
mod errors;
mod memory;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::User;

pub use document::{DocumentStore, USERS_COLLECTION};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

/// Keyed persistence for user records.
///
/// Implementations must be safe to share across request tasks.
pub trait UserStore: Send + Sync {
    /// Inserts or overwrites `user`, assigning an id if it has none.
    /// Returns the record as persisted.
    fn save(&self, user: User) -> StoreResult<User>;

    fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    fn exists_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Removes the record. Missing ids are a no-op.
    fn delete_by_id(&self, id: &str) -> StoreResult<()>;

    /// Every stored record, in no particular order.
    fn find_all(&self) -> StoreResult<Vec<User>>;
}

/// Fresh identifier for a record being inserted.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the record's id, generating one if it is missing or empty.
fn assign_id(user: User) -> (String, User) {
    match user.persisted_id() {
        Some(id) => (id.to_string(), user),
        None => {
            let id = new_id();
            (id.clone(), user.with_id(id))
        }
    }
}

/// Which backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    #[default]
    Document,
}

/// Opens the configured backend. `data_dir` is only used by the document store.
pub fn open_store(kind: StoreKind, data_dir: &Path) -> StoreResult<Arc<dyn UserStore>> {
    let store: Arc<dyn UserStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Document => Arc::new(DocumentStore::open(data_dir)?),
    };
    Ok(store)
}
