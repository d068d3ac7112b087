//! Canonicalization of raw variable names into tree path segments.
//!
//! A raw key such as `databaseOneUrl` or `DATABASE__ONE_URL` is normalized into
//! the ordered segments `["database", "one", "url"]`:
//!
//! 1. A `_` boundary is inserted wherever an ASCII lowercase letter is
//!    immediately followed by an ASCII uppercase letter.
//! 2. The whole key is lowercased.
//! 3. Runs of `_` collapse into one.
//! 4. The key is split on `_` and empty segments are dropped.
//!
//! A key made only of underscores maps to the single segment [`SELF_KEY`].

/// Reserved segment holding the value of a namespace itself.
///
/// Used both for all-underscore keys at the root and for scalars demoted
/// when a longer key passes through their location.
pub const SELF_KEY: &str = "_";

/// Splits a raw key into canonical path segments.
///
/// # Examples
///
/// ```rust
/// use envtmpl_cli::context::canonical_segments;
///
/// assert_eq!(canonical_segments("databaseTwoUrl"), ["database", "two", "url"]);
/// assert_eq!(canonical_segments("__TEST_VARIABLE__SEVEN__"), ["test", "variable", "seven"]);
/// assert_eq!(canonical_segments("______"), ["_"]);
/// ```
pub fn canonical_segments(raw_key: &str) -> Vec<String> {
    let canonical = canonical_key(raw_key);

    if canonical == SELF_KEY {
        return vec![SELF_KEY.to_string()];
    }

    canonical.split('_').filter(|segment| !segment.is_empty()).map(str::to_string).collect()
}

/// Returns the lowercase, single-underscore-delimited form of a raw key.
pub fn canonical_key(raw_key: &str) -> String {
    let mut split = String::with_capacity(raw_key.len() + 4);
    let mut previous: Option<char> = None;

    for ch in raw_key.chars() {
        if ch.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            split.push('_');
        }
        split.push(ch);
        previous = Some(ch);
    }

    let lowered = split.to_lowercase();
    let mut canonical = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch == '_' && canonical.ends_with('_') {
            continue;
        }
        canonical.push(ch);
    }

    canonical
}
