use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::database::UserStore;
use crate::models::{NewUser, SyncOutcome, User};
use crate::utils::error::StoreError;

/// Process-local store for development (`STORE_BACKEND=memory`) and tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_if_absent(&self, new_user: NewUser) -> Result<SyncOutcome, StoreError> {
        // Lookup and insert happen under one write lock.
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.clerk_id) {
            return Ok(SyncOutcome::AlreadyExists);
        }

        let mut user = User::from_new(new_user);
        user.id = Some(ObjectId::new());
        users.insert(user.clerk_id.clone(), user);

        Ok(SyncOutcome::Created)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(clerk_id).cloned())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.users.read().await.len() as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Store whose writes and counts always fail.
#[cfg(test)]
pub(crate) struct FailingUserStore;

#[cfg(test)]
fn connection_reset() -> StoreError {
    StoreError::Encode(<mongodb::bson::ser::Error as serde::ser::Error>::custom(
        "connection reset",
    ))
}

#[cfg(test)]
#[async_trait]
impl UserStore for FailingUserStore {
    async fn create_if_absent(&self, _new_user: NewUser) -> Result<SyncOutcome, StoreError> {
        Err(connection_reset())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_by_clerk_id(&self, _clerk_id: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Err(connection_reset())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
