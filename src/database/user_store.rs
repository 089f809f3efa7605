use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Collection;

use crate::database::{MongoDB, USERS_COLLECTION};
use crate::models::{NewUser, SyncOutcome, User};
use crate::utils::error::StoreError;

const DUPLICATE_KEY: i32 = 11000;

/// Persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts `new_user` unless a record with the same `clerk_id` exists.
    /// Existing records are left untouched.
    async fn create_if_absent(&self, new_user: NewUser) -> Result<SyncOutcome, StoreError>;

    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<Option<User>, StoreError>;

    /// Number of stored users. Also serves as the health probe.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Backend name reported by `/health`.
    fn backend(&self) -> &'static str;
}

pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            users: db.collection::<User>(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create_if_absent(&self, new_user: NewUser) -> Result<SyncOutcome, StoreError> {
        let clerk_id = new_user.clerk_id.clone();
        let mut document = mongodb::bson::to_document(&User::from_new(new_user))?;
        // Seeded from the filter on insert.
        document.remove("clerkId");

        // $setOnInsert never touches a matching document; the unique index
        // turns a concurrent second upsert into a duplicate-key error.
        let result = self
            .users
            .update_one(doc! { "clerkId": &clerk_id }, doc! { "$setOnInsert": document })
            .upsert(true)
            .await;

        match result {
            Ok(update) if update.upserted_id.is_some() => {
                log::info!("✅ Created user {}", clerk_id);
                Ok(SyncOutcome::Created)
            }
            Ok(_) => {
                log::info!("ℹ️  User {} already exists, skipping", clerk_id);
                Ok(SyncOutcome::AlreadyExists)
            }
            Err(e) if is_duplicate_key(&e) => {
                log::info!("ℹ️  User {} created concurrently, skipping", clerk_id);
                Ok(SyncOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "clerkId": clerk_id }).await?)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.users.estimated_document_count().await?)
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
