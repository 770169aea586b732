//! Core types for custsearch-core.
//!
//! This module defines the data shared by the server, the transport client
//! and the terminal UI: the read-only [`Customer`] view, the [`Tag`] it is
//! associated with, and the [`SearchPage`] that travels over the wire.

use serde::{Deserialize, Serialize};

/// Opaque customer identity. Ascending id is the matcher's result order.
pub type CustomerId = u64;

/// Opaque tag identity.
pub type TagId = u64;

/// A customer record as seen by the search system.
///
/// Customers are owned by the external store; everything here is a transient
/// read copy. `tags` holds the names of every tag linked to the customer,
/// ordered by tag id so rendering is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Free-text postal address.
    pub address: String,
    pub postcode: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A named label with a many-to-many association to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// One page of search results.
///
/// `total_count` is the size of the full match set before truncation, so
/// `total_count >= customers.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub customers: Vec<Customer>,
    pub total_count: usize,
}

impl SearchPage {
    /// The `(0, [])` page returned for short queries and zero matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// True when the page holds fewer customers than matched.
    pub fn is_truncated(&self) -> bool {
        self.total_count > self.customers.len()
    }
}

/// A search as issued by a client: the query text and an optional tighter
/// page size. Sequence numbers used for staleness checks are a controller
/// concern and never part of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), limit: None }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn search_page_uses_camel_case_total() {
        let page = SearchPage {
            customers: vec![Customer {
                id: 6,
                name: "Amazon Web Services".into(),
                address: "Principal Place, London".into(),
                postcode: "EC2A 2FA".into(),
                tags: vec!["Corporate".into()],
            }],
            total_count: 4,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 4);
        assert_eq!(json["customers"][0]["postcode"], "EC2A 2FA");
        assert!(page.is_truncated());
    }

    #[test]
    fn missing_tags_deserialize_as_empty() {
        let customer: Customer = serde_json::from_str(
            r#"{"id":1,"name":"John Smith","address":"123 High Street, London","postcode":"SW1A 1AA"}"#,
        )
        .unwrap();
        assert!(customer.tags.is_empty());
    }
}
