//! Query matcher: multi-field, case-insensitive substring search.
//!
//! A customer matches when the query occurs in its name, address, postcode,
//! or the name of any linked tag. One pass over the store produces both the
//! unbounded match count and the bounded page, so the two can never disagree.

use crate::config::SearchConfig;
use crate::error::StoreError;
use crate::store::CustomerStore;
use crate::types::{Customer, SearchPage};

/// Stateless matcher carrying the server-side limits. Cheap to copy; safe to
/// share across concurrent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    max_limit: usize,
    min_characters: usize,
}

impl Matcher {
    /// Both limits are floored at 1.
    pub fn new(max_limit: usize, min_characters: usize) -> Self {
        Self {
            max_limit: max_limit.max(1),
            min_characters: min_characters.max(1),
        }
    }

    pub fn from_config(cfg: &SearchConfig) -> Self {
        Self::new(cfg.results_limit, cfg.min_characters)
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    pub fn min_characters(&self) -> usize {
        self.min_characters
    }

    /// Page size actually applied: the caller's limit as a tighter cap,
    /// clamped to `[1, max_limit]`. No limit means the ceiling.
    pub fn effective_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.max_limit,
            Some(n) => n.clamp(1, self.max_limit as i64) as usize,
        }
    }

    /// Whether `query` is long enough to reach the store.
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_characters
    }

    /// Run `query` against `store`.
    ///
    /// Short queries return [`SearchPage::empty`] without calling the store.
    /// Store faults propagate unchanged.
    pub fn search(
        &self,
        store: &dyn CustomerStore,
        query: &str,
        requested_limit: Option<i64>,
    ) -> Result<SearchPage, StoreError> {
        if !self.is_searchable(query) {
            return Ok(SearchPage::empty());
        }

        let limit = self.effective_limit(requested_limit);
        let needle = query.trim().to_lowercase();

        let mut customers = Vec::with_capacity(limit);
        let mut total_count = 0usize;
        store.scan(&mut |customer| {
            if matches(customer, &needle) {
                total_count += 1;
                if customers.len() < limit {
                    customers.push(customer.clone());
                }
            }
        })?;

        Ok(SearchPage { customers, total_count })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

/// OR across the four fields. `needle` must already be lowercase.
pub fn matches(customer: &Customer, needle: &str) -> bool {
    contains_folded(&customer.name, needle)
        || contains_folded(&customer.address, needle)
        || contains_folded(&customer.postcode, needle)
        || customer.tags.iter().any(|tag| contains_folded(tag, needle))
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
