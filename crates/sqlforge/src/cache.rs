//! Memoized identifier quoting.
//!
//! A [`ColumnCache`] turns raw, possibly dotted or aliased column lists into
//! their dialect-quoted form, and memoizes the result so identical inputs
//! skip re-parsing. One cache exists per engine, shared process-wide by
//! every builder targeting that engine, so the store is lock-protected and
//! concurrent identical-key inserts are idempotent.
//!
//! The map is keyed by the raw input string itself, not a hash of it, so a
//! lookup can never return the normalization of a different input.

use crate::dialect::Dialect;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters for one cache, readable without locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Caches dialect-quoted column lists keyed by their raw text.
#[derive(Debug)]
pub struct ColumnCache {
    dialect: &'static Dialect,
    lists: RwLock<HashMap<String, String>>,
    singles: RwLock<HashMap<String, String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ColumnCache {
    /// Create an empty cache quoting per `dialect`.
    pub fn new(dialect: &'static Dialect) -> Self {
        Self {
            dialect,
            lists: RwLock::new(HashMap::new()),
            singles: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Normalize a comma-separated (possibly aliased) column list.
    ///
    /// Total over non-null input: malformed text is transformed best-effort,
    /// never rejected. Memoized on the whole raw list.
    pub fn safe_columns(&self, columns_csv: &str) -> String {
        if let Some(cached) = self.lists.read().unwrap().get(columns_csv) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(input = columns_csv, "column list cache hit");
            return cached.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let normalized = split_top_level(columns_csv)
            .map(|entry| normalize_entry(self.dialect, entry))
            .collect::<Vec<_>>()
            .join(", ");

        self.lists
            .write()
            .unwrap()
            .entry(columns_csv.to_string())
            .or_insert_with(|| normalized.clone());
        normalized
    }

    /// Normalize a single identifier, independently memoized.
    pub fn safe_column(&self, column: &str) -> String {
        if let Some(cached) = self.singles.read().unwrap().get(column) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let normalized = normalize_entry(self.dialect, column);
        self.singles
            .write()
            .unwrap()
            .entry(column.to_string())
            .or_insert_with(|| normalized.clone());
        normalized
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Split a csv at commas outside parentheses, so function arguments like
/// `Round(price, 2)` stay in one entry.
fn split_top_level(csv: &str) -> impl Iterator<Item = &str> {
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut pieces = Vec::new();
    for (i, ch) in csv.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&csv[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&csv[start..]);
    pieces.into_iter()
}

/// Normalize one select-list entry: `col`, `t.col`, `t.col As alias`.
///
/// Expressions (anything containing `(`), `*`, parameter tokens, and
/// already-quoted identifiers pass through untouched.
fn normalize_entry(dialect: &'static Dialect, entry: &str) -> String {
    let entry = entry.trim();
    if entry.is_empty() || entry.contains('(') {
        return entry.to_string();
    }

    if let Some((head, alias)) = split_alias(entry) {
        let mut out = normalize_path(dialect, head);
        out.push_str(" As ");
        out.push_str(&normalize_segment(dialect, alias));
        return out;
    }
    normalize_path(dialect, entry)
}

/// Split `expr As alias` (case-insensitive keyword) into head and alias.
fn split_alias(entry: &str) -> Option<(&str, &str)> {
    let lower = entry.to_ascii_lowercase();
    let pos = lower.rfind(" as ")?;
    let head = entry[..pos].trim_end();
    let alias = entry[pos + 4..].trim_start();
    if head.is_empty() || alias.is_empty() {
        return None;
    }
    Some((head, alias))
}

/// Quote each dot-separated segment of an identifier path.
fn normalize_path(dialect: &'static Dialect, path: &str) -> String {
    if path.starts_with(dialect.parameter_prefix) {
        return path.to_string();
    }
    path.split('.')
        .map(|segment| normalize_segment(dialect, segment))
        .collect::<Vec<_>>()
        .join(".")
}

fn normalize_segment(dialect: &'static Dialect, segment: &str) -> String {
    let segment = segment.trim();
    if segment.is_empty() || segment == "*" || dialect.is_quoted(segment) {
        return segment.to_string();
    }
    dialect.quote(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> ColumnCache {
        ColumnCache::new(&Dialect::SQL_SERVER)
    }

    #[test]
    fn wraps_each_identifier_once() {
        let c = cache();
        assert_eq!(c.safe_columns("id, name, email"), "[id], [name], [email]");
    }

    #[test]
    fn requoting_does_not_double_wrap() {
        let c = cache();
        let once = c.safe_column("col");
        assert_eq!(once, "[col]");
        assert_eq!(c.safe_column(&once), "[col]");
    }

    #[test]
    fn dotted_paths_quote_each_segment() {
        let c = cache();
        assert_eq!(c.safe_columns("u.id, u.name"), "[u].[id], [u].[name]");
        let pg = ColumnCache::new(&Dialect::POSTGRESQL);
        assert_eq!(pg.safe_column("public.users"), "\"public\".\"users\"");
    }

    #[test]
    fn star_and_expressions_pass_through() {
        let c = cache();
        assert_eq!(c.safe_columns("*"), "*");
        assert_eq!(c.safe_columns("t.*"), "[t].*");
        assert_eq!(c.safe_columns("Count(*)"), "Count(*)");
        assert_eq!(c.safe_columns("Round(price, 2), name"), "Round(price, 2), [name]");
    }

    #[test]
    fn aliases_are_preserved_and_quoted() {
        let c = cache();
        assert_eq!(c.safe_columns("u.name As author"), "[u].[name] As [author]");
        assert_eq!(c.safe_columns("id, name as n"), "[id], [name] As [n]");
    }

    #[test]
    fn parameter_tokens_pass_through() {
        let c = cache();
        assert_eq!(c.safe_column("@p0"), "@p0");
    }

    #[test]
    fn identical_input_hits_the_cache() {
        let c = cache();
        let first = c.safe_columns("id, name");
        let before = c.stats();
        let second = c.safe_columns("id, name");
        let after = c.stats();

        assert_eq!(first, second);
        assert_eq!(after.misses, before.misses);
        assert_eq!(after.hits, before.hits + 1);
    }

    #[test]
    fn list_and_single_caches_are_independent() {
        let c = cache();
        c.safe_column("id");
        let before = c.stats();
        c.safe_columns("id");
        assert_eq!(c.stats().misses, before.misses + 1);
    }

    #[test]
    fn concurrent_identical_inserts_agree() {
        use std::sync::Arc;
        let c = Arc::new(cache());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || c.safe_columns("id, name, email"))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), "[id], [name], [email]");
        }
    }

    #[test]
    fn malformed_input_is_best_effort() {
        let c = cache();
        // Never panics, never errors; output is a best-effort transform.
        assert_eq!(c.safe_columns(""), "");
        assert_eq!(c.safe_columns(",,a"), ", , [a]");
    }
}
