use std::collections::HashMap;
use std::sync::Mutex;

use crate::data::{Song, SongCollaborator, SongId, User, UserId};
use crate::helpers::normalize::normalize;
use crate::stores::{CollaboratorStore, SongStore, StoreError, UserStore};

/// In-memory library implementing all three store traits
///
/// Backs unit and integration tests, and is enough for small
/// single-process deployments. Rows live behind one mutex; every query
/// clones out of it, mirroring the per-request snapshot the database
/// stores hand back.
pub struct MemoryLibrary {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    songs: Vec<Song>,
    users: Vec<User>,
    collaborators: HashMap<SongId, Vec<SongCollaborator>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Seed a user row
    pub fn add_user(&self, user: User) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.users.push(user);
        }
    }

    /// Seed a song row
    pub fn add_song(&self, song: Song) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.songs.push(song);
        }
    }

    /// Seed a collaborator row
    pub fn add_collaborator(&self, row: SongCollaborator) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.collaborators.entry(row.song_id).or_default().push(row);
        }
    }

    fn locked<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> Result<T, StoreError> {
        match self.inner.lock() {
            Ok(mut inner) => Ok(f(&mut inner)),
            Err(e) => Err(StoreError::Unavailable(format!(
                "library lock poisoned: {}",
                e
            ))),
        }
    }
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl SongStore for MemoryLibrary {
    fn visible_songs(&self) -> Result<Vec<Song>, StoreError> {
        self.locked(|inner| {
            inner
                .songs
                .iter()
                .filter(|song| song.is_visible())
                .cloned()
                .collect()
        })
    }

    fn song_by_id(&self, id: SongId) -> Result<Option<Song>, StoreError> {
        self.locked(|inner| inner.songs.iter().find(|song| song.id == id).cloned())
    }

    fn record_play(&self, id: SongId) -> Result<(), StoreError> {
        self.locked(|inner| {
            inner
                .songs
                .iter_mut()
                .find(|song| song.id == id)
                .map(|song| song.plays = song.plays.saturating_add(1))
                .ok_or(StoreError::SongNotFound(id))
        })?
    }

    fn record_download(&self, id: SongId) -> Result<(), StoreError> {
        self.locked(|inner| {
            inner
                .songs
                .iter_mut()
                .find(|song| song.id == id)
                .map(|song| song.downloads = song.downloads.saturating_add(1))
                .ok_or(StoreError::SongNotFound(id))
        })?
    }
}

impl UserStore for MemoryLibrary {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.locked(|inner| inner.users.iter().find(|user| user.id == id).cloned())
    }

    fn find_by_normalized_username(&self, normalized: &str) -> Result<Option<User>, StoreError> {
        self.locked(|inner| {
            inner
                .users
                .iter()
                .find(|user| normalize(&user.username) == normalized)
                .cloned()
        })
    }
}

impl CollaboratorStore for MemoryLibrary {
    fn collaborators_for_song(&self, song_id: SongId) -> Result<Vec<SongCollaborator>, StoreError> {
        self.locked(|inner| {
            let mut rows: Vec<SongCollaborator> = inner
                .collaborators
                .get(&song_id)
                .map(|rows| rows.to_vec())
                .unwrap_or_default();
            rows.sort_by_key(|row| row.added_at);
            rows
        })
    }
}
