//! Name normalization for comparison keys
//!
//! Artist names arrive with inconsistent casing and whitespace ("Ben K",
//! "ben  k ", " BEN K"). Every comparison in the crate goes through this
//! one function so the same real name always produces the same key.
//! Normalized output is never shown to visitors.

/// Produce the comparison key for a name
///
/// Lower-cases, trims leading/trailing whitespace and collapses interior
/// whitespace runs to a single space. Pure and total: empty input gives
/// an empty string.
///
/// # Examples
/// ```
/// use songcredits::helpers::normalize::normalize;
///
/// assert_eq!(normalize("  Ben   K "), "ben k");
/// assert_eq!(normalize("ben k"), "ben k");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
