pub mod memory;
pub mod user_store;

pub use memory::InMemoryUserStore;
pub use user_store::{MongoUserStore, UserStore};

use mongodb::{Client, Collection, Database};

use crate::utils::error::StoreError;

pub const USERS_COLLECTION: &str = "users";
pub const CLERK_ID_INDEX: &str = "by_clerk_id";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, StoreError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Database name comes from the URI path, e.g. mongodb://host/interviews
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| "interviews".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// The unique `clerkId` index backs create-if-absent; failing to build it is fatal.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let clerk_id_index = IndexModel::builder()
            .keys(doc! { "clerkId": 1 })
            .options(
                IndexOptions::builder()
                    .name(CLERK_ID_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        users.create_index(clerk_id_index).await?;
        log::info!("   ✅ Index ready: users(clerkId) unique");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
