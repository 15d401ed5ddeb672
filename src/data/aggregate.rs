use serde::{Deserialize, Serialize};

use crate::data::{ArtistIdentity, Song};

/// Per-artist stats rolled up across all songs attributed to an identity
///
/// Rebuilt from current rows on every listing request; never cached or
/// persisted, so it is always consistent with the underlying songs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistAggregate {
    pub identity: ArtistIdentity,
    /// Number of visible songs attributed to this identity
    pub songs_count: u64,
    /// Summed plays of those songs, full count per song
    pub total_plays: u64,
    /// Summed downloads of those songs, full count per song
    pub total_downloads: u64,
}

impl ArtistAggregate {
    pub fn new(identity: ArtistIdentity) -> Self {
        Self {
            identity,
            songs_count: 0,
            total_plays: 0,
            total_downloads: 0,
        }
    }

    /// Fold one attributed song into the running totals
    ///
    /// A song contributes its full play and download counts to every
    /// identity it is attributed to, not a split share.
    pub fn add_song(&mut self, song: &Song) {
        self.songs_count += 1;
        self.total_plays = self.total_plays.saturating_add(song.plays);
        self.total_downloads = self.total_downloads.saturating_add(song.downloads);
    }
}

/// One page of the ranked artist directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistPage {
    pub items: Vec<ArtistAggregate>,
    /// Number of artists across all pages
    pub total_count: usize,
    /// Number of pages at the requested page size
    pub total_pages: usize,
    /// 1-based page number this page was requested with
    pub page: usize,
    pub per_page: usize,
}

impl ArtistPage {
    /// The "no artists found" page shown when the store is unavailable
    pub fn empty(page: usize, per_page: usize) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            page,
            per_page,
        }
    }
}
