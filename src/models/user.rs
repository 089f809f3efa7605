use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Interviewer,
}

/// Document in the "users" collection. `clerk_id` is unique (index `by_clerk_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub clerk_id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime>,
}

/// JSON view of a `User`: hex object id and RFC 3339 creation time instead
/// of extended-JSON wrappers.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: Option<String>,
    pub clerk_id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-03-13T09:21:45Z")]
    pub created_at: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()),
            clerk_id: user.clerk_id,
            email: user.email,
            name: user.name,
            image: user.image,
            role: user.role,
            created_at: user
                .created_at
                .and_then(|created| created.try_to_rfc3339_string().ok()),
        }
    }
}

/// Normalized input for create-if-absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub clerk_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    /// A fresh record; new users always start as candidates.
    pub fn from_new(new_user: NewUser) -> Self {
        Self {
            id: None,
            clerk_id: new_user.clerk_id,
            email: new_user.email,
            name: new_user.name,
            image: new_user.image,
            role: Role::Candidate,
            created_at: Some(DateTime::now()),
        }
    }
}

/// Builds the display name from the provider's optional given/family names.
pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    format!("{} {}", first_name.unwrap_or(""), last_name.unwrap_or(""))
        .trim()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub role: Option<Role>,
    pub is_interviewer: bool,
    pub is_candidate: bool,
}

impl RoleInfo {
    pub fn from_role(role: Option<Role>) -> Self {
        Self {
            role,
            is_interviewer: role == Some(Role::Interviewer),
            is_candidate: role == Some(Role::Candidate),
        }
    }
}
