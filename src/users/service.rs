//! User service
//!
//! Thin orchestration over a [`UserStore`]. The only rules applied here are
//! the existence checks in front of update and delete.
//!
//! # Check-then-act
//!
//! `update` and `delete` call `exists_by_id` and then `save`/`delete_by_id`
//! as two separate store calls. A delete that lands between the check and
//! the save of a concurrent update brings the deleted id back. Nothing here
//! prevents that; closing it needs a conditional write in the store.

use std::sync::Arc;

use tracing::{debug, info};

use super::User;
use crate::store::{StoreResult, UserStore};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Persists `user` as given. No field validation; empty strings are fine.
    pub fn create(&self, user: User) -> StoreResult<User> {
        let created = self.store.save(user)?;
        info!(user_id = created.id.as_deref().unwrap_or_default(), "user created");
        Ok(created)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<User>> {
        self.store.find_by_id(id)
    }

    /// Replaces the record at `id` wholesale. `None` if there is none.
    ///
    /// Any id carried by `user` is discarded in favour of `id`.
    pub fn update(&self, id: &str, user: User) -> StoreResult<Option<User>> {
        if !self.store.exists_by_id(id)? {
            debug!(user_id = %id, "update skipped, no such user");
            return Ok(None);
        }

        let updated = self.store.save(user.with_id(id))?;
        info!(user_id = %id, "user updated");
        Ok(Some(updated))
    }

    /// Returns whether a record was there to delete.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        if !self.store.exists_by_id(id)? {
            debug!(user_id = %id, "delete skipped, no such user");
            return Ok(false);
        }

        self.store.delete_by_id(id)?;
        info!(user_id = %id, "user deleted");
        Ok(true)
    }

    pub fn list(&self) -> StoreResult<Vec<User>> {
        self.store.find_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    /// Counts mutating calls so tests can assert nothing was written.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl UserStore for CountingStore {
        fn save(&self, user: User) -> StoreResult<User> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.save(user)
        }
        fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
            self.inner.find_by_id(id)
        }
        fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
            self.inner.exists_by_id(id)
        }
        fn delete_by_id(&self, id: &str) -> StoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id)
        }
        fn find_all(&self) -> StoreResult<Vec<User>> {
            self.inner.find_all()
        }
    }

    struct BrokenStore;

    impl UserStore for BrokenStore {
        fn save(&self, _: User) -> StoreResult<User> {
            Err(StoreError::Poisoned)
        }
        fn find_by_id(&self, _: &str) -> StoreResult<Option<User>> {
            Err(StoreError::Poisoned)
        }
        fn exists_by_id(&self, _: &str) -> StoreResult<bool> {
            Err(StoreError::Poisoned)
        }
        fn delete_by_id(&self, _: &str) -> StoreResult<()> {
            Err(StoreError::Poisoned)
        }
        fn find_all(&self) -> StoreResult<Vec<User>> {
            Err(StoreError::Poisoned)
        }
    }

    #[test]
    fn test_create_accepts_empty_fields() {
        let created = service().create(User::new("", "")).unwrap();
        assert!(created.persisted_id().is_some());
        assert_eq!(created.name, "");
    }

    #[test]
    fn test_update_overwrites_body_id() {
        let service = service();
        let created = service.create(User::new("A", "a@x.com")).unwrap();
        let id = created.id.unwrap();

        let updated = service
            .update(&id, User::new("B", "b@x.com").with_id("drift"))
            .unwrap()
            .unwrap();

        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert!(service.get("drift").unwrap().is_none());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_id_does_not_mutate() {
        let store = Arc::new(CountingStore::default());
        let service = UserService::new(store.clone());

        assert!(service.update("ghost", User::new("A", "a")).unwrap().is_none());
        assert!(!service.delete("ghost").unwrap());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert!(store.inner.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_store_failures_propagate() {
        let service = UserService::new(Arc::new(BrokenStore));

        assert!(service.create(User::new("A", "a")).is_err());
        assert!(service.get("x").is_err());
        assert!(service.update("x", User::new("A", "a")).is_err());
        assert!(service.delete("x").is_err());
        assert!(service.list().is_err());
    }
}
