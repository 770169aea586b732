//! Error types shared by the store and the matcher.

use crate::types::{CustomerId, TagId};
use thiserror::Error;

/// A fault reading from the customer store.
///
/// Always surfaced to the caller; a failed read is never reported as an empty
/// result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("customer store unavailable: {0}")]
    Unavailable(String),
    #[error("customer store returned corrupt data: {0}")]
    Corrupt(String),
}

/// A dataset that cannot be loaded into the in-memory store.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate customer id {0}")]
    DuplicateCustomer(CustomerId),
    #[error("duplicate tag id {0}")]
    DuplicateTag(TagId),
    #[error("customer {customer} references unknown tag {tag}")]
    UnknownTag { customer: CustomerId, tag: TagId },
}
