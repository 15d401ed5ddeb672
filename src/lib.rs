/// Data model for songs, users, collaborators and artist identities
pub mod data;

/// Attribution engine facade and stats roll-up
pub mod attribution;

/// Helper utilities: name normalization, credit splitting, artist
/// resolution
pub mod helpers;

/// Store interfaces and the in-memory and SQLite implementations
pub mod stores;

/// Engine configuration
pub mod config;

/// Logging setup for embedding applications
pub mod logging;

// Re-export the types most callers need
pub use attribution::AttributionEngine;
pub use config::AttributionConfig;
pub use data::{
    ArtistAggregate, ArtistIdentity, ArtistPage, Song, SongCollaborator, SongStatus, User,
};
pub use stores::{
    CollaboratorStore, MemoryLibrary, SongStore, SqliteLibrary, StoreError, UserStore,
};
