/// Song row as stored by the platform
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::data::{SongId, UserId};

/// Moderation status of a song
///
/// The database stores this as free text; unrecognized values are
/// treated as not visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SongStatus {
    /// Live on the site
    Active,
    /// Approved by moderation, equivalent to active for listings
    Approved,
    /// Awaiting moderation
    Pending,
    /// Rejected by moderation
    Rejected,
    /// Taken down (songs are never hard-deleted, only status-flagged)
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Song {
    /// Unique song id
    pub id: SongId,

    /// Display title
    pub title: String,

    /// Free-text artist credit as entered at upload time, e.g. "A x B"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Id of the user that uploaded the song, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserId>,

    /// Stored collaboration flag; may be stale, see
    /// `AttributionEngine::stale_collaboration_flags`
    #[serde(default)]
    pub is_collaboration: bool,

    /// Play counter
    #[serde(default)]
    pub plays: u64,

    /// Download counter
    #[serde(default)]
    pub downloads: u64,

    /// Raw status column; empty or missing means visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Song {
    /// Parse the raw status column, if it holds a recognized value
    pub fn parsed_status(&self) -> Option<SongStatus> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| SongStatus::from_str(s).ok())
    }

    /// Whether the song shows up in listings and counts toward stats
    ///
    /// Active, approved, empty and null statuses are all visible; any
    /// other value (pending, rejected, removed, or unrecognized text)
    /// hides the song.
    pub fn is_visible(&self) -> bool {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(raw) => matches!(
                SongStatus::from_str(raw),
                Ok(SongStatus::Active) | Ok(SongStatus::Approved)
            ),
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) if !artist.trim().is_empty() => {
                write!(f, "{} by {}", self.title, artist)
            }
            _ => write!(f, "{}", self.title),
        }
    }
}
