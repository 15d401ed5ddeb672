/// Artist credit splitting
///
/// This module is the one source of truth for turning a free-text artist
/// credit like "Alice x Bob" or "Alice feat. Bob" into the ordered list
/// of individual artist names. Separators are matched case-insensitively
/// and in a fixed precedence so the same credit always splits the same
/// way, wherever in the platform the split happens.

use log::debug;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Separators recognized in artist credits, in match precedence order
///
/// Longer dotted forms come before their undotted variants so that
/// " feat. " is never half-consumed by " feat ".
pub static ARTIST_SEPARATORS: &[&str] = &[
    " x ",
    " & ",
    " feat. ",
    " feat ",
    " ft. ",
    " ft ",
    " featuring ",
];

static SEPARATOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ARTIST_SEPARATORS
        .iter()
        .map(|sep| literal_pattern(sep))
        .collect()
});

/// Compile a separator literal into a case-insensitive pattern
fn literal_pattern(separator: &str) -> Regex {
    RegexBuilder::new(&regex::escape(separator))
        .case_insensitive(true)
        .build()
        .expect("escaped separator literal always compiles")
}

/// Split an artist credit into individual artist names
///
/// Each resulting name is trimmed, empty segments are dropped, and the
/// order of first appearance is preserved (the primary artist stays
/// first). A credit without any separator comes back as a single-element
/// list; an empty credit as an empty list. Performs no database access
/// and cannot fail.
///
/// # Arguments
/// * `field` - The raw artist credit from the song row
///
/// # Returns
/// * `Vec<String>` - Individual artist names in display order
///
/// # Examples
/// ```
/// use songcredits::helpers::artistsplitter::split_artist_field;
///
/// assert_eq!(split_artist_field("Alice x Bob"), vec!["Alice", "Bob"]);
/// assert_eq!(split_artist_field("Alice feat. Bob"), vec!["Alice", "Bob"]);
/// assert_eq!(split_artist_field("Solo Artist"), vec!["Solo Artist"]);
/// ```
pub fn split_artist_field(field: &str) -> Vec<String> {
    split_with_patterns(field, &SEPARATOR_PATTERNS)
}

/// Split an artist credit with additional site-configured separators
///
/// Extra separators are matched after the built-in set, so they can only
/// split segments the defaults left whole.
///
/// # Arguments
/// * `field` - The raw artist credit from the song row
/// * `extra` - Extra separator literals from the attribution config
pub fn split_artist_field_with_extra(field: &str, extra: &[String]) -> Vec<String> {
    if extra.is_empty() {
        return split_artist_field(field);
    }
    let mut patterns: Vec<Regex> = SEPARATOR_PATTERNS.clone();
    patterns.extend(extra.iter().map(|sep| literal_pattern(sep)));
    split_with_patterns(field, &patterns)
}

/// Iteratively split by each pattern in precedence order
fn split_with_patterns(field: &str, patterns: &[Regex]) -> Vec<String> {
    let mut result: Vec<String> = vec![field.to_string()];

    for pattern in patterns {
        let mut refined = Vec::new();

        for part in result {
            if part.trim().is_empty() {
                continue;
            }

            if pattern.is_match(&part) {
                for segment in pattern.split(&part) {
                    let trimmed = segment.trim();
                    if !trimmed.is_empty() {
                        refined.push(trimmed.to_string());
                    }
                }
            } else {
                refined.push(part);
            }
        }

        result = refined;
    }

    let names: Vec<String> = result
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    debug!("Split artist credit '{}' into {:?}", field, names);
    names
}
