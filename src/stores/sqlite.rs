use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use log::{debug, info};
use rusqlite::{params, Connection, Row};

use crate::data::{Song, SongCollaborator, SongId, User, UserId};
use crate::helpers::normalize::normalize;
use crate::stores::{CollaboratorStore, SongStore, StoreError, UserStore};

/// SQLite-backed library over the platform schema
///
/// The schema is created and verified once when the store is opened;
/// after that every query assumes it. Application code never probes for
/// columns at request time.
///
/// Usernames are stored together with their normalized form so the
/// resolver's exact-match lookup is a single indexed query.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    username_normalized TEXT NOT NULL,
    avatar TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_normalized
    ON users(username_normalized);

CREATE TABLE IF NOT EXISTS songs (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    artist TEXT,
    uploaded_by INTEGER,
    is_collaboration INTEGER NOT NULL DEFAULT 0,
    plays INTEGER NOT NULL DEFAULT 0,
    downloads INTEGER NOT NULL DEFAULT 0,
    status TEXT
);

CREATE TABLE IF NOT EXISTS song_collaborators (
    song_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    added_at INTEGER NOT NULL,
    PRIMARY KEY (song_id, user_id)
);
CREATE INDEX IF NOT EXISTS idx_collaborators_song
    ON song_collaborators(song_id, added_at);
";

// Mirrors Song::is_visible: active, approved, empty and null are visible
const VISIBLE_WHERE: &str =
    "status IS NULL OR TRIM(status) = '' OR LOWER(TRIM(status)) IN ('active', 'approved')";

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl SqliteLibrary {
    /// Open (or create) the library database at the given path
    pub fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, StoreError> {
        let conn = Connection::open(db_file.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        info!(
            "Opened songcredits library database at {:?}",
            db_file.as_ref()
        );
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory library, mainly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn locked<T>(&self, f: impl FnOnce(&Connection) -> Result<T, StoreError>) -> Result<T, StoreError> {
        match self.conn.lock() {
            Ok(conn) => f(&conn),
            Err(e) => Err(StoreError::Unavailable(format!(
                "database lock poisoned: {}",
                e
            ))),
        }
    }

    /// Insert or replace a user row
    pub fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.locked(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO users (id, username, username_normalized, avatar)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.id,
                    user.username,
                    normalize(&user.username),
                    user.avatar
                ],
            )?;
            Ok(())
        })
    }

    /// Insert or replace a song row
    pub fn insert_song(&self, song: &Song) -> Result<(), StoreError> {
        self.locked(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO songs
                 (id, title, artist, uploaded_by, is_collaboration, plays, downloads, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    song.id,
                    song.title,
                    song.artist,
                    song.uploaded_by,
                    song.is_collaboration,
                    song.plays as i64,
                    song.downloads as i64,
                    song.status
                ],
            )?;
            Ok(())
        })
    }

    /// Link a collaborator to a song, stamped with the current time
    pub fn add_collaborator(&self, song_id: SongId, user_id: UserId) -> Result<(), StoreError> {
        self.add_collaborator_at(song_id, user_id, Utc::now().timestamp())
    }

    /// Link a collaborator to a song with an explicit `added_at`
    pub fn add_collaborator_at(
        &self,
        song_id: SongId,
        user_id: UserId,
        added_at: i64,
    ) -> Result<(), StoreError> {
        self.locked(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO song_collaborators (song_id, user_id, added_at)
                 VALUES (?1, ?2, ?3)",
                params![song_id, user_id, added_at],
            )?;
            Ok(())
        })
    }

    fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            uploaded_by: row.get(3)?,
            is_collaboration: row.get(4)?,
            plays: row.get::<_, i64>(5)?.max(0) as u64,
            downloads: row.get::<_, i64>(6)?.max(0) as u64,
            status: row.get(7)?,
        })
    }

    fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            avatar: row.get(2)?,
        })
    }
}

impl SongStore for SqliteLibrary {
    fn visible_songs(&self) -> Result<Vec<Song>, StoreError> {
        self.locked(|conn| {
            let sql = format!(
                "SELECT id, title, artist, uploaded_by, is_collaboration, plays, downloads, status
                 FROM songs WHERE {} ORDER BY id",
                VISIBLE_WHERE
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], Self::song_from_row)?;
            let mut songs = Vec::new();
            for row in rows {
                songs.push(row?);
            }
            debug!("Loaded {} visible songs", songs.len());
            Ok(songs)
        })
    }

    fn song_by_id(&self, id: SongId) -> Result<Option<Song>, StoreError> {
        self.locked(|conn| {
            let result = conn.query_row(
                "SELECT id, title, artist, uploaded_by, is_collaboration, plays, downloads, status
                 FROM songs WHERE id = ?1",
                params![id],
                Self::song_from_row,
            );
            match result {
                Ok(song) => Ok(Some(song)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn record_play(&self, id: SongId) -> Result<(), StoreError> {
        self.locked(|conn| {
            // Single atomic increment, never read-modify-write
            let changed = conn.execute(
                "UPDATE songs SET plays = plays + 1 WHERE id = ?1",
                params![id],
            )?;
            if changed == 0 {
                return Err(StoreError::SongNotFound(id));
            }
            Ok(())
        })
    }

    fn record_download(&self, id: SongId) -> Result<(), StoreError> {
        self.locked(|conn| {
            let changed = conn.execute(
                "UPDATE songs SET downloads = downloads + 1 WHERE id = ?1",
                params![id],
            )?;
            if changed == 0 {
                return Err(StoreError::SongNotFound(id));
            }
            Ok(())
        })
    }
}

impl UserStore for SqliteLibrary {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.locked(|conn| {
            let result = conn.query_row(
                "SELECT id, username, avatar FROM users WHERE id = ?1",
                params![id],
                Self::user_from_row,
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn find_by_normalized_username(&self, normalized: &str) -> Result<Option<User>, StoreError> {
        self.locked(|conn| {
            let result = conn.query_row(
                "SELECT id, username, avatar FROM users WHERE username_normalized = ?1",
                params![normalized],
                Self::user_from_row,
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}

impl CollaboratorStore for SqliteLibrary {
    fn collaborators_for_song(&self, song_id: SongId) -> Result<Vec<SongCollaborator>, StoreError> {
        self.locked(|conn| {
            let mut stmt = conn.prepare(
                "SELECT sc.song_id, sc.user_id, u.username, sc.added_at
                 FROM song_collaborators sc
                 JOIN users u ON u.id = sc.user_id
                 WHERE sc.song_id = ?1
                 ORDER BY sc.added_at ASC",
            )?;
            let rows = stmt.query_map(params![song_id], |row| {
                Ok(SongCollaborator {
                    song_id: row.get(0)?,
                    user_id: row.get(1)?,
                    username: row.get(2)?,
                    added_at: row.get(3)?,
                })
            })?;
            let mut collaborators = Vec::new();
            for row in rows {
                collaborators.push(row?);
            }
            Ok(collaborators)
        })
    }
}
