use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{gravatar_url, Email};

/// Registered account
///
/// The password hash is never serialized, so a `User` can be returned
/// from handlers as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh id and a Gravatar avatar
    ///
    /// `password_hash` must already be hashed.
    pub fn new(name: impl Into<String>, email: Email, password_hash: String) -> Self {
        let avatar = gravatar_url(&email);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            password_hash,
            avatar,
            date: Utc::now(),
        }
    }

    /// The `{_id, name, avatar}` subset other documents embed
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Public projection of a user used when populating references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}
