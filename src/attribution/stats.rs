/// Stats roll-up: accumulation, ranking and pagination of per-artist
/// aggregates
///
/// Aggregates are rebuilt from scratch on every request, so the result
/// is always consistent with the song rows the caller handed in.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::data::{ArtistAggregate, ArtistIdentity, ArtistPage, IdentityKey, Song};

/// Accumulator for one aggregation pass over the visible songs
#[derive(Default)]
pub struct StatsRollup {
    aggregates: HashMap<IdentityKey, ArtistAggregate>,
}

impl StatsRollup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one song and its attributed identities into the roll-up
    ///
    /// Every attributed identity receives the song's full play and
    /// download counts; nothing is split between collaborators. The
    /// first-seen spelling of an identity is the one kept for display.
    pub fn add_attributed_song(&mut self, song: &Song, identities: &[ArtistIdentity]) {
        for identity in identities {
            self.aggregates
                .entry(identity.key())
                .or_insert_with(|| ArtistAggregate::new(identity.clone()))
                .add_song(song);
        }
    }

    /// Finish the pass: rank all aggregates deterministically
    pub fn into_ranked(self) -> Vec<ArtistAggregate> {
        let mut aggregates: Vec<ArtistAggregate> = self.aggregates.into_values().collect();
        warn_on_split_identities(&aggregates);
        rank(&mut aggregates);
        aggregates
    }
}

/// Sort aggregates by plays desc, songs desc, then name asc
///
/// The final key comparison keeps the order deterministic even for
/// distinct identities with the same display name, so a listing cannot
/// reshuffle between two requests over unchanged data.
pub fn rank(aggregates: &mut [ArtistAggregate]) {
    aggregates.sort_by(|a, b| {
        b.total_plays
            .cmp(&a.total_plays)
            .then_with(|| b.songs_count.cmp(&a.songs_count))
            .then_with(|| {
                a.identity
                    .normalized_name()
                    .cmp(&b.identity.normalized_name())
            })
            .then_with(|| a.identity.key().cmp(&b.identity.key()))
    });
}

/// Cut one page out of the ranked list
///
/// `page` is 1-based; totals are computed from the full list length,
/// never re-queried. Zero page or page size is clamped to 1.
pub fn paginate(ranked: Vec<ArtistAggregate>, page: usize, per_page: usize) -> ArtistPage {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_count = ranked.len();
    let total_pages = (total_count + per_page - 1) / per_page;

    let items: Vec<ArtistAggregate> = ranked
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    ArtistPage {
        items,
        total_count,
        total_pages,
        page,
        per_page,
    }
}

/// Log a data-quality warning when the same name shows up both as a
/// registered user and as an unregistered credit
///
/// This usually means a credit string missed the account by a typo at
/// some point, or a lookup failed mid-pass. Not automatically
/// correctable; flagged for manual review, never merged.
fn warn_on_split_identities(aggregates: &[ArtistAggregate]) {
    let registered_names: HashSet<String> = aggregates
        .iter()
        .filter(|agg| agg.identity.is_registered())
        .map(|agg| agg.identity.normalized_name())
        .collect();

    for agg in aggregates {
        if !agg.identity.is_registered() && registered_names.contains(&agg.identity.normalized_name())
        {
            warn!(
                "Data quality: '{}' is credited both as a registered user and as a plain name; stats are split",
                agg.identity.display_name()
            );
        }
    }
}
