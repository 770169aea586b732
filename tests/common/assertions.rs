//! Domain-specific assertion macros for custsearch harnesses.
//!
//! These add context to failures: which page invariant broke and what the
//! page actually held.

// ---------------------------------------------------------------------------
// Page assertions
// ---------------------------------------------------------------------------

/// Assert the structural invariants of a result page: bounded by `limit`,
/// `total_count` covers the page, ids strictly ascending.
///
/// ```rust
/// assert_page_invariants!(page, 10);
/// ```
#[macro_export]
macro_rules! assert_page_invariants {
    ($page:expr, $limit:expr) => {{
        let page: &custsearch_core::SearchPage = &$page;
        let limit: usize = $limit;
        let ids: Vec<u64> = page.customers.iter().map(|c| c.id).collect();
        if page.len() > limit {
            panic!(
                "assert_page_invariants! failed: page holds {} customers, limit is {}",
                page.len(),
                limit
            );
        }
        if page.total_count < page.len() {
            panic!(
                "assert_page_invariants! failed: total_count {} < page length {}",
                page.total_count,
                page.len()
            );
        }
        if !ids.windows(2).all(|w| w[0] < w[1]) {
            panic!("assert_page_invariants! failed: ids not ascending: {:?}", ids);
        }
    }};
}

/// Assert the exact customer names on a page, in order.
///
/// ```rust
/// assert_names!(page, ["Microsoft UK Ltd", "Amazon Web Services"]);
/// ```
#[macro_export]
macro_rules! assert_names {
    ($page:expr, [$($name:expr),* $(,)?]) => {{
        let page: &custsearch_core::SearchPage = &$page;
        let actual: Vec<&str> = page.customers.iter().map(|c| c.name.as_str()).collect();
        let expected: Vec<&str> = vec![$($name),*];
        pretty_assertions::assert_eq!(actual, expected, "customer names on page");
    }};
}
