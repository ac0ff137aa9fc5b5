//! In-memory user store

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use super::{assign_id, StoreResult, UserStore};
use crate::users::User;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn save(&self, user: User) -> StoreResult<User> {
        let (id, user) = assign_id(user);
        self.users.write()?.insert(id.clone(), user.clone());
        debug!(user_id = %id, "saved user in memory");
        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read()?.get(id).cloned())
    }

    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        Ok(self.users.read()?.contains_key(id))
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        self.users.write()?.remove(id);
        Ok(())
    }

    fn find_all(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read()?.values().cloned().collect())
    }
}
