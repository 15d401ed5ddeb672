use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{User, UserId};
use crate::helpers::normalize::normalize;

/// Canonical contributor to a song
///
/// Either a registered platform user or a freestanding name that never
/// matched an account. Derived at query time, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArtistIdentity {
    /// A registered user, keyed by user id
    Registered {
        user_id: UserId,
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        avatar: Option<String>,
    },
    /// A name with no matching account, keyed by its normalized form
    ///
    /// `name` keeps the trimmed original spelling for display.
    Unregistered { name: String },
}

/// Key under which an identity's stats are accumulated
///
/// Registered identities key by user id, unregistered ones by normalized
/// name. Derived `Ord` gives registered identities a stable position
/// before unregistered ones, which makes ranking tie-breaks
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    User(UserId),
    Name(String),
}

impl ArtistIdentity {
    /// Build a registered identity from a user row
    pub fn from_user(user: &User) -> Self {
        ArtistIdentity::Registered {
            user_id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }

    /// Build a registered identity from a collaborator row (no avatar
    /// available there)
    pub fn registered(user_id: UserId, username: &str) -> Self {
        ArtistIdentity::Registered {
            user_id,
            username: username.to_string(),
            avatar: None,
        }
    }

    /// Build an unregistered identity, keeping the trimmed spelling
    pub fn unregistered(name: &str) -> Self {
        ArtistIdentity::Unregistered {
            name: name.trim().to_string(),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, ArtistIdentity::Registered { .. })
    }

    /// Name shown to visitors
    pub fn display_name(&self) -> &str {
        match self {
            ArtistIdentity::Registered { username, .. } => username,
            ArtistIdentity::Unregistered { name } => name,
        }
    }

    /// Normalized comparison form of the display name
    pub fn normalized_name(&self) -> String {
        normalize(self.display_name())
    }

    /// Stat-accumulation key for this identity
    pub fn key(&self) -> IdentityKey {
        match self {
            ArtistIdentity::Registered { user_id, .. } => IdentityKey::User(*user_id),
            ArtistIdentity::Unregistered { name } => IdentityKey::Name(normalize(name)),
        }
    }
}

// The one identity-equality rule used everywhere deduplication happens:
// two registered identities are the same artist iff they share a user
// id; in every other pairing the normalized names decide. The mixed
// case matters when a lookup failure degraded one side to an
// unregistered identity.
impl PartialEq for ArtistIdentity {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ArtistIdentity::Registered { user_id: a, .. },
                ArtistIdentity::Registered { user_id: b, .. },
            ) => a == b,
            _ => self.normalized_name() == other.normalized_name(),
        }
    }
}

impl fmt::Display for ArtistIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_equality_is_by_user_id() {
        let a = ArtistIdentity::registered(7, "Ben");
        let b = ArtistIdentity::registered(7, "ben (renamed)");
        let c = ArtistIdentity::registered(8, "Ben");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unregistered_equality_is_by_normalized_name() {
        let a = ArtistIdentity::unregistered("  Ben   K ");
        let b = ArtistIdentity::unregistered("ben k");
        let c = ArtistIdentity::unregistered("ben kay");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_mixed_equality_is_by_normalized_name() {
        let registered = ArtistIdentity::registered(7, "Ben");
        let unregistered = ArtistIdentity::unregistered("BEN");
        assert_eq!(registered, unregistered);
        assert_eq!(unregistered, registered);
    }

    #[test]
    fn test_display_keeps_original_spelling() {
        let identity = ArtistIdentity::unregistered("  Kay ");
        assert_eq!(identity.display_name(), "Kay");
        assert_eq!(identity.normalized_name(), "kay");
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            ArtistIdentity::registered(7, "Ben").key(),
            IdentityKey::User(7)
        );
        assert_eq!(
            ArtistIdentity::unregistered("Ben K").key(),
            IdentityKey::Name("ben k".to_string())
        );
        // Registered keys order before unregistered ones
        assert!(IdentityKey::User(999) < IdentityKey::Name("a".to_string()));
    }
}
