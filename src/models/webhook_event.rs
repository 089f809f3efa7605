use serde::Deserialize;

use crate::models::user::{display_name, NewUser};

pub const USER_CREATED: &str = "user.created";

/// Outer shape shared by every Clerk webhook delivery.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCreatedData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    UserCreated(UserCreatedData),
    Unhandled { event_type: String },
}

#[derive(Debug, thiserror::Error)]
pub enum EventParseError {
    #[error("malformed envelope: {0}")]
    Envelope(serde_json::Error),
    #[error("malformed {event_type} data: {source}")]
    Data {
        event_type: String,
        source: serde_json::Error,
    },
    #[error("user {0} has no email addresses")]
    NoEmailAddress(String),
}

impl WebhookEvent {
    pub fn parse(body: &[u8]) -> Result<Self, EventParseError> {
        let RawEnvelope { event_type, data } =
            serde_json::from_slice(body).map_err(EventParseError::Envelope)?;

        if event_type != USER_CREATED {
            return Ok(WebhookEvent::Unhandled { event_type });
        }

        serde_json::from_value(data)
            .map(WebhookEvent::UserCreated)
            .map_err(|source| EventParseError::Data { event_type, source })
    }
}

impl UserCreatedData {
    /// The first listed address is taken as the account email.
    pub fn into_new_user(self) -> Result<NewUser, EventParseError> {
        let name = display_name(self.first_name.as_deref(), self.last_name.as_deref());
        let email = match self.email_addresses.into_iter().next() {
            Some(address) => address.email_address,
            None => return Err(EventParseError::NoEmailAddress(self.id)),
        };

        Ok(NewUser {
            clerk_id: self.id,
            email,
            name,
            image: self.image_url,
        })
    }
}
