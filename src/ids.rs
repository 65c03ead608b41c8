//! Collision-free identifier allocation.

use log::debug;
use std::collections::HashMap;

/// Slug used when transliteration produces nothing
pub const FALLBACK_SLUG: &str = "unknown";

/// Hands out `<prefix>.<slug>` identifiers, suffixing repeats with `_2`, `_3`, ...
///
/// State lives only as long as the allocator, so every canonicalization
/// run starts from a clean slate.
#[derive(Debug, Default)]
pub struct IdAllocator {
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an identifier for `slug` under `prefix`.
    ///
    /// An empty slug is replaced by [`FALLBACK_SLUG`] before allocation.
    pub fn allocate(&mut self, prefix: &str, slug: &str) -> String {
        let slug = if slug.is_empty() { FALLBACK_SLUG } else { slug };
        let base = format!("{}.{}", prefix, slug);

        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            base
        } else {
            debug!("id collision on {}, occurrence {}", base, count);
            format!("{}_{}", base, count)
        }
    }

    /// Number of distinct bases allocated so far
    pub fn base_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allocation_is_bare() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("fstu1.lex", "kitab"), "fstu1.lex.kitab");
    }

    #[test]
    fn test_collisions_suffixed_in_order() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("fstu1.lex", "kitab"), "fstu1.lex.kitab");
        assert_eq!(ids.allocate("fstu1.lex", "kitab"), "fstu1.lex.kitab_2");
        assert_eq!(ids.allocate("fstu1.lex", "kitab"), "fstu1.lex.kitab_3");
    }

    #[test]
    fn test_prefixes_are_independent() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("fstu1.lex", "ism"), "fstu1.lex.ism");
        assert_eq!(ids.allocate("fstu1.term", "ism"), "fstu1.term.ism");
        assert_eq!(ids.base_count(), 2);
    }

    #[test]
    fn test_empty_slug_falls_back() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("fstu1.lex", ""), "fstu1.lex.unknown");
        assert_eq!(ids.allocate("fstu1.lex", ""), "fstu1.lex.unknown_2");
        assert_eq!(ids.allocate("fstu1.lex", "unknown"), "fstu1.lex.unknown_3");
    }

    #[test]
    fn test_fresh_allocator_has_no_memory() {
        let mut first = IdAllocator::new();
        first.allocate("p", "x");
        let mut second = IdAllocator::new();
        assert_eq!(second.allocate("p", "x"), "p.x");
    }
}
