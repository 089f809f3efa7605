// ==================== CLERK WEBHOOK PROCESSING ====================
// verify signature -> decode envelope -> dispatch on event type

use crate::{
    database::UserStore,
    models::{SyncOutcome, WebhookEvent},
    utils::{
        error::WebhookError,
        signature::{SvixHeaders, WebhookVerifier},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    UserSynced(SyncOutcome),
    Ignored(String),
}

pub async fn process_webhook(
    verifier: &WebhookVerifier,
    store: &dyn UserStore,
    headers: &SvixHeaders,
    body: &[u8],
) -> Result<WebhookOutcome, WebhookError> {
    verifier.verify(headers, body)?;
    dispatch(store, body).await
}

/// Runs an already-verified payload.
async fn dispatch(store: &dyn UserStore, body: &[u8]) -> Result<WebhookOutcome, WebhookError> {
    let event = WebhookEvent::parse(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

    match event {
        WebhookEvent::UserCreated(data) => {
            let new_user = data
                .into_new_user()
                .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

            log::info!("👤 user.created for {}", new_user.clerk_id);
            let outcome = store.create_if_absent(new_user).await?;
            if outcome == SyncOutcome::Created {
                crate::api::metrics::increment_users_created();
            }
            Ok(WebhookOutcome::UserSynced(outcome))
        }
        WebhookEvent::Unhandled { event_type } => {
            log::debug!("Ignoring webhook event {}", event_type);
            Ok(WebhookOutcome::Ignored(event_type))
        }
    }
}
