//! In-memory user record store.
//!
//! Identifiers come from a counter that only moves forward. Removing a
//! record never gives its identifier back, so an `id` seen by a client
//! always refers to the same user or to nobody.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Store-assigned key of a user record.
pub type Id = u64;

/// A user record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(Id),
}

/// The record store.
///
/// All state sits behind one mutex and every operation is a single critical
/// section, so concurrent `add` calls can never hand out the same id.
///
/// Records live in a `BTreeMap` keyed by id. Ids are issued in increasing
/// order, so key order is insertion order and [`list`](UserStore::list)
/// stays deterministic.
#[derive(Debug, Default)]
pub struct UserStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<Id, User>,
    next_id: Id,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `user` under the next free id and returns that id.
    pub fn add(&self, user: User) -> Id {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        info!(id, name = %user.name, email = %user.email, "user created");
        inner.users.insert(id, user);
        inner.next_id += 1;
        id
    }

    pub fn get(&self, id: Id) -> Result<User, StoreError> {
        self.inner
            .lock()
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// All live users, oldest first.
    pub fn list(&self) -> Vec<User> {
        self.inner.lock().users.values().cloned().collect()
    }

    /// Deletes the user stored under `id`. A miss leaves the store untouched.
    pub fn remove(&self, id: Id) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        match inner.users.remove(&id) {
            Some(_) => {
                info!(id, "user removed");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next [`add`](UserStore::add) will return.
    pub fn next_id(&self) -> Id {
        self.inner.lock().next_id
    }
}
