use std::sync::Arc;

use log::{error, warn};

use crate::attribution::stats::{paginate, StatsRollup};
use crate::config::AttributionConfig;
use crate::data::{ArtistAggregate, ArtistIdentity, ArtistPage, Song, SongId, User};
use crate::helpers::artistsplitter::split_artist_field_with_extra;
use crate::helpers::resolver::resolve_artist;
use crate::stores::{CollaboratorStore, SongStore, UserStore};

/// The attribution engine
///
/// One instance per process, shared across requests: it holds no state
/// of its own beyond the store handles and configuration, and every
/// query recomputes from current rows. Failures inside the per-song
/// attribution step are isolated to that song; a listing degrades, it
/// never errors out to the visitor.
pub struct AttributionEngine {
    songs: Arc<dyn SongStore>,
    users: Arc<dyn UserStore>,
    collaborators: Arc<dyn CollaboratorStore>,
    config: AttributionConfig,
}

impl AttributionEngine {
    /// Create an engine with default configuration
    pub fn new(
        songs: Arc<dyn SongStore>,
        users: Arc<dyn UserStore>,
        collaborators: Arc<dyn CollaboratorStore>,
    ) -> Self {
        Self::with_config(songs, users, collaborators, AttributionConfig::default())
    }

    /// Create an engine with explicit configuration
    pub fn with_config(
        songs: Arc<dyn SongStore>,
        users: Arc<dyn UserStore>,
        collaborators: Arc<dyn CollaboratorStore>,
        config: AttributionConfig,
    ) -> Self {
        Self {
            songs,
            users,
            collaborators,
            config,
        }
    }

    /// The uploader's user row, when the song has one and the lookup
    /// succeeds
    fn uploader(&self, song: &Song) -> Option<User> {
        let user_id = song.uploaded_by?;
        match self.users.find_by_id(user_id) {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    "Uploader lookup failed for song {} (user {}): {}",
                    song.id, user_id, e
                );
                None
            }
        }
    }

    fn unknown_artist(&self) -> ArtistIdentity {
        ArtistIdentity::unregistered(&self.config.unknown_artist)
    }

    /// The canonical, deduplicated artist list of a song
    ///
    /// Order is display order: uploader first, then the credit string's
    /// names in order of appearance, then explicit collaborators by the
    /// time they were added. Each identity appears once under the
    /// identity-equality rule, so an uploader also named in the credit
    /// string does not show up twice. A song nothing can be attributed
    /// to is credited to the configured unknown artist.
    pub fn attributed_artists(&self, song: &Song) -> Vec<ArtistIdentity> {
        let uploader = self.uploader(song);
        let mut identities: Vec<ArtistIdentity> = Vec::new();

        if let Some(user) = &uploader {
            identities.push(ArtistIdentity::from_user(user));
        }

        if let Some(field) = song.artist.as_deref() {
            for name in split_artist_field_with_extra(field, &self.config.extra_separators) {
                let identity = resolve_artist(&name, uploader.as_ref(), self.users.as_ref());
                if !identities.contains(&identity) {
                    identities.push(identity);
                }
            }
        }

        match self.collaborators.collaborators_for_song(song.id) {
            Ok(rows) => {
                for row in rows {
                    let identity = ArtistIdentity::registered(row.user_id, &row.username);
                    if !identities.contains(&identity) {
                        identities.push(identity);
                    }
                }
            }
            Err(e) => {
                // Degrade to uploader + credit-string attribution for
                // this one song
                warn!("Collaborator lookup failed for song {}: {}", song.id, e);
            }
        }

        if identities.is_empty() {
            identities.push(self.unknown_artist());
        }

        identities
    }

    /// The display credit line of a song, names joined with " x "
    pub fn attribution_line(&self, song: &Song) -> String {
        self.attributed_artists(song)
            .iter()
            .map(|identity| identity.display_name().to_string())
            .collect::<Vec<_>>()
            .join(" x ")
    }

    /// Whether a song is credited to more than one artist
    ///
    /// The unknown-artist fallback never counts as a collaboration.
    pub fn is_collaboration(&self, song: &Song) -> bool {
        self.attributed_artists(song).len() > 1
    }

    /// The ranked, paginated artist directory
    ///
    /// `page` is 1-based; a `per_page` of 0 uses the configured default
    /// page size. If the song store is down the result is an empty page,
    /// not an error: the directory renders its "no artists found" state.
    pub fn list_artists(&self, page: usize, per_page: usize) -> ArtistPage {
        let per_page = if per_page == 0 {
            self.config.default_page_size
        } else {
            per_page
        };

        let songs = match self.songs.visible_songs() {
            Ok(songs) => songs,
            Err(e) => {
                error!("Artist listing unavailable, song store failed: {}", e);
                return ArtistPage::empty(page.max(1), per_page.max(1));
            }
        };

        let mut rollup = StatsRollup::new();
        for song in &songs {
            let identities = self.attributed_artists(song);
            rollup.add_attributed_song(song, &identities);
        }

        paginate(rollup.into_ranked(), page, per_page)
    }

    /// Roll-up for a single identity, `None` when no visible song is
    /// attributed to it
    pub fn artist_profile(&self, identity: &ArtistIdentity) -> Option<ArtistAggregate> {
        let songs = self.songs_for_artist(identity);
        if songs.is_empty() {
            return None;
        }

        let mut aggregate = ArtistAggregate::new(identity.clone());
        for song in &songs {
            aggregate.add_song(song);
        }
        Some(aggregate)
    }

    /// The visible songs attributed to an identity, in store order
    pub fn songs_for_artist(&self, identity: &ArtistIdentity) -> Vec<Song> {
        let songs = match self.songs.visible_songs() {
            Ok(songs) => songs,
            Err(e) => {
                error!("Song listing for artist profile failed: {}", e);
                return Vec::new();
            }
        };

        songs
            .into_iter()
            .filter(|song| self.attributed_artists(song).contains(identity))
            .collect()
    }

    /// Visible songs whose stored collaboration flag disagrees with the
    /// computed attribution
    ///
    /// The flag is denormalized at upload time and goes stale when
    /// collaborators are added or credits edited later. This audit only
    /// reports; fixing the rows is a moderation decision.
    pub fn stale_collaboration_flags(&self) -> Vec<SongId> {
        let songs = match self.songs.visible_songs() {
            Ok(songs) => songs,
            Err(e) => {
                error!("Collaboration audit failed, song store unavailable: {}", e);
                return Vec::new();
            }
        };

        songs
            .iter()
            .filter(|song| song.is_collaboration != self.is_collaboration(song))
            .map(|song| song.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SongCollaborator, UserId};
    use crate::stores::{MemoryLibrary, StoreError};

    fn engine_over(library: Arc<MemoryLibrary>) -> AttributionEngine {
        AttributionEngine::new(library.clone(), library.clone(), library)
    }

    fn song(id: SongId, artist: Option<&str>, uploaded_by: Option<UserId>) -> Song {
        Song {
            id,
            title: format!("Song {}", id),
            artist: artist.map(|s| s.to_string()),
            uploaded_by,
            ..Song::default()
        }
    }

    #[test]
    fn test_uploader_and_credit_dedup() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Ben"));
        library.add_song(song(1, Some("ben"), Some(1)));
        let engine = engine_over(library);

        let identities = engine.attributed_artists(&song(1, Some("ben"), Some(1)));
        assert_eq!(identities.len(), 1, "uploader and credit are one artist");
        assert_eq!(identities[0], ArtistIdentity::registered(1, "Ben"));
    }

    #[test]
    fn test_mixed_registered_and_unregistered_credit() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        let engine = engine_over(library);

        let s = song(1, Some("Jo x Kay"), Some(1));
        let identities = engine.attributed_artists(&s);
        assert_eq!(identities.len(), 2);
        assert!(identities[0].is_registered());
        assert_eq!(identities[0].display_name(), "Jo");
        assert!(!identities[1].is_registered());
        assert_eq!(identities[1].display_name(), "Kay");
        assert_eq!(identities[1].normalized_name(), "kay");

        assert_eq!(engine.attribution_line(&s), "Jo x Kay");
    }

    #[test]
    fn test_attribution_is_idempotent() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        let engine = engine_over(library);

        let s = song(1, Some("Jo feat. Kay"), Some(1));
        assert_eq!(engine.attributed_artists(&s), engine.attributed_artists(&s));
    }

    #[test]
    fn test_unknown_artist_fallback() {
        let library = Arc::new(MemoryLibrary::new());
        let engine = engine_over(library);

        let s = song(1, None, None);
        let identities = engine.attributed_artists(&s);
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].display_name(), "Unknown Artist");
        assert_eq!(engine.attribution_line(&s), "Unknown Artist");
        assert!(!engine.is_collaboration(&s));
    }

    #[test]
    fn test_explicit_collaborator_joins_the_credit() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        library.add_user(User::new(2, "Mel"));
        let s = song(1, Some("Jo"), Some(1));
        library.add_song(s.clone());
        // Mel is a collaborator even though the credit string never
        // mentions them
        library.add_collaborator(SongCollaborator {
            song_id: 1,
            user_id: 2,
            username: "Mel".to_string(),
            added_at: 100,
        });
        let engine = engine_over(library);

        let identities = engine.attributed_artists(&s);
        assert_eq!(identities.len(), 2);
        assert_eq!(identities[1], ArtistIdentity::registered(2, "Mel"));
        assert!(engine.is_collaboration(&s));
    }

    #[test]
    fn test_collaborator_already_in_credit_not_duplicated() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        library.add_user(User::new(2, "Mel"));
        let s = song(1, Some("Jo x Mel"), Some(1));
        library.add_song(s.clone());
        library.add_collaborator(SongCollaborator {
            song_id: 1,
            user_id: 2,
            username: "Mel".to_string(),
            added_at: 100,
        });
        let engine = engine_over(library);

        assert_eq!(engine.attributed_artists(&s).len(), 2);
    }

    #[test]
    fn test_list_artists_ranking_and_stats() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        library.add_song(Song {
            plays: 100,
            downloads: 2,
            ..song(1, Some("Jo x Kay"), Some(1))
        });
        library.add_song(Song {
            plays: 30,
            ..song(2, Some("Kay"), None)
        });
        let engine = engine_over(library);

        let page = engine.list_artists(1, 10);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 1);

        // Kay: 130 plays over 2 songs; Jo: 100 plays over 1 song
        assert_eq!(page.items[0].identity.display_name(), "Kay");
        assert_eq!(page.items[0].total_plays, 130);
        assert_eq!(page.items[0].songs_count, 2);
        assert_eq!(page.items[1].identity.display_name(), "Jo");
        assert_eq!(page.items[1].total_plays, 100);
        assert_eq!(page.items[1].total_downloads, 2);
    }

    #[test]
    fn test_list_artists_skips_hidden_songs() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_song(Song {
            status: Some("pending".to_string()),
            ..song(1, Some("Kay"), None)
        });
        let engine = engine_over(library);

        let page = engine.list_artists(1, 10);
        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_per_page_zero_uses_config_default() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_song(song(1, Some("Kay"), None));
        let engine = engine_over(library);

        let page = engine.list_artists(1, 0);
        assert_eq!(page.per_page, 50);
    }

    #[test]
    fn test_artist_profile_and_songs() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_song(Song {
            plays: 10,
            ..song(1, Some("Kay"), None)
        });
        library.add_song(Song {
            plays: 5,
            ..song(2, Some("Kay feat. Mo"), None)
        });
        library.add_song(song(3, Some("Someone Else"), None));
        let engine = engine_over(library);

        let kay = ArtistIdentity::unregistered("Kay");
        let songs = engine.songs_for_artist(&kay);
        assert_eq!(songs.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);

        let profile = engine.artist_profile(&kay).unwrap();
        assert_eq!(profile.songs_count, 2);
        assert_eq!(profile.total_plays, 15);

        assert!(engine
            .artist_profile(&ArtistIdentity::unregistered("Nobody"))
            .is_none());
    }

    #[test]
    fn test_stale_collaboration_flags() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        // Flag says solo, credit says collaboration
        library.add_song(Song {
            is_collaboration: false,
            ..song(1, Some("Jo x Kay"), Some(1))
        });
        // Flag says collaboration, credit is solo
        library.add_song(Song {
            is_collaboration: true,
            ..song(2, Some("Jo"), Some(1))
        });
        // Flag and credit agree
        library.add_song(Song {
            is_collaboration: true,
            ..song(3, Some("Jo & Kay"), Some(1))
        });
        let engine = engine_over(library);

        assert_eq!(engine.stale_collaboration_flags(), vec![1, 2]);
    }

    // Stores that fail on demand, for the degradation paths
    struct FailingCollaborators;

    impl CollaboratorStore for FailingCollaborators {
        fn collaborators_for_song(
            &self,
            _song_id: SongId,
        ) -> Result<Vec<SongCollaborator>, StoreError> {
            Err(StoreError::Unavailable("collaborators down".to_string()))
        }
    }

    struct FailingSongs;

    impl SongStore for FailingSongs {
        fn visible_songs(&self) -> Result<Vec<Song>, StoreError> {
            Err(StoreError::Unavailable("songs down".to_string()))
        }

        fn song_by_id(&self, _id: SongId) -> Result<Option<Song>, StoreError> {
            Err(StoreError::Unavailable("songs down".to_string()))
        }

        fn record_play(&self, _id: SongId) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("songs down".to_string()))
        }

        fn record_download(&self, _id: SongId) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("songs down".to_string()))
        }
    }

    #[test]
    fn test_collaborator_failure_degrades_to_credit_only() {
        let library = Arc::new(MemoryLibrary::new());
        library.add_user(User::new(1, "Jo"));
        let engine = AttributionEngine::new(
            library.clone(),
            library.clone(),
            Arc::new(FailingCollaborators),
        );

        let s = song(1, Some("Jo x Kay"), Some(1));
        let identities = engine.attributed_artists(&s);
        assert_eq!(identities.len(), 2, "credit attribution still works");
    }

    #[test]
    fn test_total_song_store_failure_gives_empty_page() {
        let library = Arc::new(MemoryLibrary::new());
        let engine =
            AttributionEngine::new(Arc::new(FailingSongs), library.clone(), library.clone());

        let page = engine.list_artists(1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }
}
