// Common helpers for integration tests
//
// Seeds the same small catalog into both store implementations so the
// engine can be checked for identical behavior over each.

use std::sync::Arc;

use songcredits::{
    AttributionEngine, MemoryLibrary, Song, SongCollaborator, SqliteLibrary, User,
};

/// Catalog summary:
/// - Jo (user 1) uploads "Night Drive" credited "Jo x Kay"; Kay has no
///   account
/// - "Solo Ride" is credited to Kay alone, uploaded by nobody
/// - Mel (user 2) uploads "Duet" credited "Mel feat. Ben K" (Ben K is
///   user 3); Jo is attached as an explicit collaborator
/// - "Unreleased" is pending and must stay out of every stat
/// - "Open Mic" is credited "Jo & Mel" but its stored collaboration
///   flag was never set
pub fn users() -> Vec<User> {
    vec![
        User::with_avatar(1, "Jo", "https://cdn/avatars/jo.png"),
        User::new(2, "Mel"),
        User::new(3, "Ben K"),
    ]
}

pub fn songs() -> Vec<Song> {
    vec![
        Song {
            id: 1,
            title: "Night Drive".to_string(),
            artist: Some("Jo x Kay".to_string()),
            uploaded_by: Some(1),
            is_collaboration: true,
            plays: 100,
            downloads: 2,
            status: Some("active".to_string()),
            ..Song::default()
        },
        Song {
            id: 2,
            title: "Solo Ride".to_string(),
            artist: Some("Kay".to_string()),
            plays: 30,
            ..Song::default()
        },
        Song {
            id: 3,
            title: "Duet".to_string(),
            artist: Some("Mel feat. Ben K".to_string()),
            uploaded_by: Some(2),
            is_collaboration: true,
            plays: 50,
            downloads: 5,
            status: Some("approved".to_string()),
            ..Song::default()
        },
        Song {
            id: 4,
            title: "Unreleased".to_string(),
            artist: Some("Jo".to_string()),
            uploaded_by: Some(1),
            plays: 9999,
            status: Some("pending".to_string()),
            ..Song::default()
        },
        Song {
            id: 5,
            title: "Open Mic".to_string(),
            artist: Some("Jo & Mel".to_string()),
            is_collaboration: false,
            ..Song::default()
        },
    ]
}

pub fn seed_memory() -> Arc<MemoryLibrary> {
    let library = Arc::new(MemoryLibrary::new());
    for user in users() {
        library.add_user(user);
    }
    for song in songs() {
        library.add_song(song);
    }
    library.add_collaborator(SongCollaborator {
        song_id: 3,
        user_id: 1,
        username: "Jo".to_string(),
        added_at: 1_700_000_000,
    });
    library
}

pub fn seed_sqlite() -> Arc<SqliteLibrary> {
    let library = Arc::new(SqliteLibrary::open_in_memory().expect("in-memory library opens"));
    for user in users() {
        library.insert_user(&user).expect("user inserts");
    }
    for song in songs() {
        library.insert_song(&song).expect("song inserts");
    }
    library
        .add_collaborator_at(3, 1, 1_700_000_000)
        .expect("collaborator inserts");
    library
}

pub fn memory_engine() -> AttributionEngine {
    let library = seed_memory();
    AttributionEngine::new(library.clone(), library.clone(), library)
}

pub fn sqlite_engine() -> AttributionEngine {
    let library = seed_sqlite();
    AttributionEngine::new(library.clone(), library.clone(), library)
}
