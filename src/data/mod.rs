// Data structures for the songcredits attribution engine

pub mod aggregate;
pub mod collaborator;
pub mod identity;
pub mod song;
pub mod user;

/// Numeric row id of a song in the platform database
pub type SongId = i64;

/// Numeric row id of a registered user
pub type UserId = i64;

// Re-export the core types so callers can use `crate::data::Song` etc.
pub use aggregate::{ArtistAggregate, ArtistPage};
pub use collaborator::SongCollaborator;
pub use identity::{ArtistIdentity, IdentityKey};
pub use song::{Song, SongStatus};
pub use user::User;
