use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::data::UserId;

/// Registered platform user
///
/// A user is the canonical artist identity whenever a name in a song's
/// artist credit matches their username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user id
    pub id: UserId,
    /// Unique display name
    pub username: String,
    /// Avatar URL, if the user uploaded one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: UserId, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            avatar: None,
        }
    }

    pub fn with_avatar(id: UserId, username: &str, avatar: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            avatar: Some(avatar.to_string()),
        }
    }
}

// Users compare and hash by id, the username is display data
impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}
