use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{SongId, UserId};

/// Explicit collaborator row linking a registered user to a song
///
/// Independent of the free-text artist credit: a user listed here
/// contributes to the song's stats even when the credit string does not
/// mention them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongCollaborator {
    pub song_id: SongId,
    pub user_id: UserId,
    /// Username at query time, joined in from the users table
    pub username: String,
    /// When the collaborator was added, unix seconds
    pub added_at: i64,
}

impl SongCollaborator {
    /// The `added_at` timestamp as a chrono datetime, for display layers
    pub fn added_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.added_at, 0)
    }
}
