//! custsearch-core: customer search core library.
//!
//! This crate holds everything the search service and its clients share:
//! the customer data model, the read-only store boundary, configuration, and
//! the query matcher itself.
//!
//! # Architecture
//!
//! ```text
//! CustomerStore ──► Matcher ──► HTTP service ──► SearchClient ──► Controller ──► TUI
//! ```
//!
//! The matcher is a pure function over the store; it holds no mutable state
//! and needs no locking when the service runs it for concurrent requests.

pub mod config;
pub mod error;
pub mod matcher;
pub mod store;
pub mod types;

pub use error::{DatasetError, StoreError};
pub use matcher::Matcher;
pub use store::{CustomerStore, Dataset, InMemoryStore};
pub use types::{Customer, CustomerId, SearchPage, SearchRequest, Tag, TagId};
