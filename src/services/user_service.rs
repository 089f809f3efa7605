// ==================== USER ACCESSORS ====================
// Idempotent sync plus read-only lookups over the users collection.

use crate::{
    database::UserStore,
    models::{NewUser, RoleInfo, SyncOutcome, User},
    services::auth_service::Claims,
    utils::error::AppError,
};

/// Creates the user unless one with the same `clerk_id` already exists.
pub async fn sync_user(store: &dyn UserStore, new_user: NewUser) -> Result<SyncOutcome, AppError> {
    if new_user.clerk_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("clerkId is required".to_string()));
    }

    let outcome = store.create_if_absent(new_user).await?;
    if outcome == SyncOutcome::Created {
        crate::api::metrics::increment_users_created();
    }
    Ok(outcome)
}

/// Every user record. Callers must present a verified identity.
pub async fn list_users(store: &dyn UserStore, caller: Option<&Claims>) -> Result<Vec<User>, AppError> {
    let caller = caller.ok_or_else(|| AppError::Unauthorized("User is not authenticated".to_string()))?;
    log::debug!("📋 Listing users for {}", caller.sub);

    Ok(store.list_all().await?)
}

pub async fn get_user_by_clerk_id(store: &dyn UserStore, clerk_id: &str) -> Result<Option<User>, AppError> {
    Ok(store.find_by_clerk_id(clerk_id).await?)
}

/// Role flags for the given identity; unknown ids have no role.
pub async fn get_user_role(store: &dyn UserStore, clerk_id: &str) -> Result<RoleInfo, AppError> {
    let user = store.find_by_clerk_id(clerk_id).await?;
    Ok(RoleInfo::from_role(user.map(|u| u.role)))
}
