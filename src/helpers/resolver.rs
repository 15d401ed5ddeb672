/// Artist name resolution
///
/// Maps one candidate name from a split artist credit to its canonical
/// identity: the song's uploader when the names match, otherwise a
/// registered user found by exact normalized-username lookup, otherwise
/// an unregistered identity carrying just the name.

use log::warn;

use crate::data::{ArtistIdentity, User};
use crate::helpers::normalize::normalize;
use crate::stores::UserStore;

/// Resolve a candidate artist name to an identity
///
/// The uploader is checked before the user table so that a case or
/// whitespace mismatch between the credit and the uploader's username
/// cannot produce a spurious second identity for the same person.
///
/// A failed lookup degrades to an unregistered identity instead of
/// propagating: one bad query must not take down a whole page of
/// attributions.
///
/// # Arguments
/// * `candidate` - One name as produced by the artist splitter
/// * `uploader` - The song's uploader, when known
/// * `users` - User lookup store
pub fn resolve_artist(
    candidate: &str,
    uploader: Option<&User>,
    users: &dyn UserStore,
) -> ArtistIdentity {
    let normalized = normalize(candidate);

    if let Some(user) = uploader {
        if normalize(&user.username) == normalized {
            return ArtistIdentity::from_user(user);
        }
    }

    match users.find_by_normalized_username(&normalized) {
        Ok(Some(user)) => ArtistIdentity::from_user(&user),
        Ok(None) => ArtistIdentity::unregistered(candidate),
        Err(e) => {
            warn!(
                "User lookup for '{}' failed, treating as unregistered: {}",
                candidate, e
            );
            ArtistIdentity::unregistered(candidate)
        }
    }
}
