//! Storage-safe, collision-free names for model entities.
//!
//! Babbage addresses measures and dimensions by name, and the names end up as
//! SQL identifiers. [`database_name`] turns an arbitrary label into a slug that
//! is a valid PostgreSQL identifier and is not already taken in a given set.
//!
//! # Rules
//!
//! 1. Transliterate to ASCII and lowercase; every run of characters other than
//!    `a-z` and `0-9` becomes `_`.
//! 2. An empty slug becomes `_`; a slug starting with a digit gets a `_` prefix.
//! 3. Slugs longer than [`MAX_IDENTIFIER_LEN`] bytes are truncated and tagged
//!    with a short SHA-256 digest of the full slug.
//! 4. Taken names are suffixed `_2`, `_3`, ... until free.
//!
//! Names derived from already allocated ones (the `base_keypart` levels of a
//! composite-key dimension) are claimed with [`NameAllocator::reserve`], which
//! keeps the name verbatim unless it is taken.
//!
//! # Example
//!
//! ```
//! use fdp2babbage::naming::{NameAllocator, NameKind};
//!
//! let mut measures = NameAllocator::new(NameKind::Measure);
//! assert_eq!(measures.allocate("Approved Amount"), "approved_amount");
//! assert_eq!(measures.allocate("approved amount"), "approved_amount_2");
//! assert_eq!(measures.allocate("Município"), "municipio");
//! ```

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// PostgreSQL truncates identifiers beyond 63 bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Hex digits of the digest appended to truncated slugs.
const DIGEST_LEN: usize = 8;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

/// Kind of entity a name is allocated for.
///
/// Only used for diagnostics; it never appears in the allocated name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Measure,
    Dimension,
    Table,
}

impl NameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKind::Measure => "measure",
            NameKind::Dimension => "dimension",
            NameKind::Table => "table",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Naive slug of `label`, without length limit or collision handling.
pub fn slugify(label: &str) -> String {
    let lowered = deunicode(label).to_lowercase();
    let slug = SEPARATORS.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');

    match slug.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", slug),
        Some(_) => slug.to_string(),
    }
}

/// Unique storage name for `label` that is not in `existing`.
///
/// Pure: `existing` is not modified, the caller records the returned name.
pub fn database_name(label: &str, existing: &HashSet<String>, kind: NameKind) -> String {
    let base = shorten(slugify(label));

    if !existing.contains(&base) {
        debug!(kind = %kind, label, name = %base, "allocated name");
        return base;
    }

    let name = next_free(&base, existing);
    debug!(kind = %kind, label, name = %name, "allocated name after collision");
    name
}

/// First of `base_2`, `base_3`, ... not in `existing`, capped at [`MAX_IDENTIFIER_LEN`].
fn next_free(base: &str, existing: &HashSet<String>) -> String {
    let mut counter: usize = 2;
    loop {
        let suffix = format!("_{}", counter);
        let stem = truncate_to(base, MAX_IDENTIFIER_LEN.saturating_sub(suffix.len()));
        let candidate = format!("{}{}", stem, suffix);
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Caps `slug` at [`MAX_IDENTIFIER_LEN`] bytes, tagging truncated slugs with a digest.
fn shorten(slug: String) -> String {
    if slug.len() <= MAX_IDENTIFIER_LEN {
        return slug;
    }

    let mut hasher = Sha256::new();
    hasher.update(slug.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    let stem = truncate_to(&slug, MAX_IDENTIFIER_LEN - DIGEST_LEN - 1).trim_end_matches('_');
    format!("{}_{}", stem, &digest[..DIGEST_LEN])
}

/// Longest prefix of `s` that fits in `max` bytes and ends on a char boundary.
fn truncate_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Allocates unique names for one kind of entity.
///
/// Each allocator owns its own set, so measures and dimensions never collide
/// with each other, only among themselves.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    kind: NameKind,
    allocated: HashSet<String>,
}

impl NameAllocator {
    pub fn new(kind: NameKind) -> Self {
        Self {
            kind,
            allocated: HashSet::new(),
        }
    }

    /// Allocate a fresh name for `label` and record it.
    pub fn allocate(&mut self, label: &str) -> String {
        let name = database_name(label, &self.allocated, self.kind);
        self.allocated.insert(name.clone());
        name
    }

    /// Claim `name` as is, or its first free `_N` variant when it is taken.
    ///
    /// Unlike [`allocate`](Self::allocate) the name is not slugified, so
    /// names built from allocated parts keep their shape.
    pub fn reserve(&mut self, name: &str) -> String {
        let name = if self.allocated.contains(name) {
            let free = next_free(name, &self.allocated);
            debug!(kind = %self.kind, requested = name, name = %free, "reserved name after collision");
            free
        } else {
            name.to_string()
        };
        self.allocated.insert(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Total Amount"), "total_amount");
        assert_eq!(slugify("  functional-classification / level 1 "), "functional_classification_level_1");
        assert_eq!(slugify("already_fine"), "already_fine");
    }

    #[test]
    fn test_slugify_transliterates_to_ascii() {
        assert_eq!(slugify("Über Größe"), "uber_grosse");
        assert_eq!(slugify("Município"), "municipio");
    }

    #[test]
    fn test_slugify_edge_cases() {
        assert_eq!(slugify(""), "_");
        assert_eq!(slugify("!!!"), "_");
        assert_eq!(slugify("2015 budget"), "_2015_budget");
    }

    #[test]
    fn test_database_name_does_not_touch_existing() {
        let mut existing = HashSet::new();
        existing.insert("amount".to_string());

        let first = database_name("Amount", &existing, NameKind::Measure);
        let second = database_name("Amount", &existing, NameKind::Measure);

        assert_eq!(first, "amount_2");
        assert_eq!(first, second);
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn test_allocator_suffixes_collisions() {
        let mut names = NameAllocator::new(NameKind::Dimension);
        assert_eq!(names.allocate("Country"), "country");
        assert_eq!(names.allocate("country"), "country_2");
        assert_eq!(names.allocate("COUNTRY!"), "country_3");
        assert_eq!(names.allocate("Country 2"), "country_2_2");
    }

    #[test]
    fn test_reserve_keeps_free_names_verbatim() {
        let mut names = NameAllocator::new(NameKind::Dimension);
        assert_eq!(names.allocate("Date"), "date");
        assert_eq!(names.reserve("date_fiscal-year"), "date_fiscal-year");
        assert_eq!(names.reserve("date_month"), "date_month");
    }

    #[test]
    fn test_reserve_and_allocate_share_one_set() {
        let mut names = NameAllocator::new(NameKind::Dimension);
        assert_eq!(names.reserve("date_year"), "date_year");
        assert_eq!(names.allocate("Date Year"), "date_year_2");
        assert_eq!(names.reserve("date_year"), "date_year_3");
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut measures = NameAllocator::new(NameKind::Measure);
        let mut dimensions = NameAllocator::new(NameKind::Dimension);

        assert_eq!(measures.allocate("Year"), "year");
        assert_eq!(dimensions.allocate("Year"), "year");
    }

    #[test]
    fn test_long_names_are_capped_and_distinct() {
        let prefix = "a very long label describing a budget line ".repeat(3);
        let first = database_name(&format!("{}one", prefix), &HashSet::new(), NameKind::Measure);
        let second = database_name(&format!("{}two", prefix), &HashSet::new(), NameKind::Measure);

        assert!(first.len() <= MAX_IDENTIFIER_LEN);
        assert!(second.len() <= MAX_IDENTIFIER_LEN);
        assert_ne!(first, second);
    }

    #[test]
    fn test_long_name_collision_stays_within_limit() {
        let label = "x".repeat(200);
        let mut names = NameAllocator::new(NameKind::Measure);
        let first = names.allocate(&label);
        let second = names.allocate(&label);

        assert_ne!(first, second);
        assert!(second.ends_with("_2"));
        assert!(second.len() <= MAX_IDENTIFIER_LEN);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let s = "ééé";
        assert_eq!(truncate_to(s, 3), "é");
        assert_eq!(truncate_to(s, 10), s);
    }
}
