//! Identifier sanitizers

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Longest identifier either sanitizer produces
pub const MAX_IDENT_LEN: usize = 300;

/// Table names that collide with SQL keywords get a `db_` prefix
const RESERVED_WORDS: [&str; 5] = ["SELECT", "TABLE", "DELETE", "INSERT", "UPDATE"];

/// Names shorter than this get a `db_` prefix
const MIN_TABLE_NAME_LEN: usize = 3;

/// Sanitize column headers, keyed by original name
///
/// Every original maps to a legal, unique column identifier. When the same
/// original appears more than once the later assignment replaces the earlier
/// one, use [`prep_header_pairs`] when every occurrence matters.
pub fn prep_headers<I, S>(names: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    prep_header_pairs(names).into_iter().collect()
}

/// Sanitize column headers, one `(original, clean)` pair per input
///
/// Collisions are resolved on the generated name: the first occurrence keeps
/// the clean name, later ones get `_2`, `_3`, ... in input order.
pub fn prep_header_pairs<I, S>(names: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut used = HashSet::new();
    let mut pairs = Vec::new();

    for (index, name) in names.into_iter().enumerate() {
        let original = match &name {
            None => "null".to_string(),
            Some(s) if s.as_ref().is_empty() => format!("empty_index_{index}"),
            Some(s) => s.as_ref().to_string(),
        };

        let clean = sanitize_header(&original);
        let unique = disambiguate(&clean, &used);
        used.insert(unique.clone());
        pairs.push((original, unique));
    }

    pairs
}

/// Sanitize a single column header (no collision handling)
pub fn sanitize_header(name: &str) -> String {
    let mut clean = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            clean.push(c);
        } else {
            // one underscore per UTF-16 unit, so astral characters take two
            for _ in 0..c.len_utf16() {
                clean.push('_');
            }
        }
    }

    if !clean.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        clean.insert(0, '_');
    }

    clean.truncate(MAX_IDENT_LEN);
    clean
}

fn disambiguate(clean: &str, used: &HashSet<String>) -> String {
    if !used.contains(clean) {
        return clean.to_string();
    }

    (2usize..)
        .map(|n| {
            let suffix = format!("_{n}");
            let mut base = clean.to_string();
            base.truncate(MAX_IDENT_LEN - suffix.len());
            base + &suffix
        })
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| clean.to_string())
}

/// Sanitize a table name
///
/// Stricter than [`sanitize_header`]: lower-case, no leading digits or
/// underscores, no repeated or trailing underscores. Never fails; a missing
/// name yields `db_unknown_<random>`.
pub fn clean_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return unknown_name();
    };

    let mut collapsed = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            collapsed.push(c);
        } else if !collapsed.ends_with('_') {
            collapsed.push('_');
        }
    }

    let mut clean = collapsed
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '_')
        .trim_end_matches('_')
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase();
    clean.truncate(MAX_IDENT_LEN);

    let upper = clean.to_ascii_uppercase();
    if RESERVED_WORDS.contains(&upper.as_str()) || clean.len() < MIN_TABLE_NAME_LEN {
        clean.insert_str(0, "db_");
    }

    clean
}

fn unknown_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("db_unknown_{suffix}")
}
