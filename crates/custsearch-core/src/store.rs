//! Store: the read-only boundary between the matcher and the customer data.
//!
//! The matcher only ever sees [`CustomerStore::scan`]. [`InMemoryStore`] is
//! the implementation the service ships with: it keeps tags, customers and
//! their association separately, as a relational store would, and hydrates
//! tag names onto each customer once at load time.

use crate::error::{DatasetError, StoreError};
use crate::types::{Customer, CustomerId, Tag, TagId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Read access to the externally owned customer dataset.
///
/// Implementations must visit customers in ascending id order so that result
/// pages are deterministic. Any fault is returned, never swallowed.
pub trait CustomerStore: Send + Sync {
    fn scan(&self, visit: &mut dyn FnMut(&Customer)) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Dataset (load format)
// ---------------------------------------------------------------------------

/// A customer row as stored: scalar fields plus the ids of linked tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub postcode: String,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// The on-disk dataset: tags, customers, and the many-to-many links carried
/// on each customer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub customers: Vec<CustomerRecord>,
}

impl Dataset {
    pub fn from_json_file(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The demonstration dataset: ten tags and twelve UK customers.
    pub fn seed() -> Self {
        const TAGS: &[&str] = &[
            "VIP",
            "Premium",
            "Corporate",
            "Residential",
            "Business",
            "New Customer",
            "Long Term",
            "High Volume",
            "Priority Support",
            "International",
        ];

        // (name, address, postcode, tag ids)
        type Row = (&'static str, &'static str, &'static str, &'static [TagId]);
        const CUSTOMERS: &[Row] = &[
            ("John Smith", "123 High Street, London", "SW1A 1AA", &[1, 4]),
            ("Sarah Johnson", "45 Victoria Road, Manchester", "M1 2AB", &[2, 5]),
            ("Microsoft UK Ltd", "Thames Valley Park, Reading", "RG6 1WG", &[3, 8, 9]),
            ("Emily Davis", "78 Queen Street, Birmingham", "B1 3CD", &[6, 4]),
            ("Robert Wilson", "92 King's Road, Edinburgh", "EH1 4EF", &[7, 1]),
            ("Amazon Web Services", "Principal Place, London", "EC2A 2FA", &[3, 10, 9]),
            ("Lisa Thompson", "156 Castle Street, Cardiff", "CF10 1BH", &[2, 5]),
            ("David Brown", "23 Market Square, Leeds", "LS1 5GH", &[4, 7]),
            ("TechStart Solutions", "89 Innovation Drive, Cambridge", "CB4 0WS", &[5, 6, 8]),
            ("Jennifer Martinez", "67 Elm Grove, Brighton", "BN1 7IJ", &[1, 10]),
            ("GlobalTech Industries", "Central Business Park, Glasgow", "G2 8KL", &[3, 7, 9]),
            ("Michael O'Connor", "34 Phoenix Street, Belfast", "BT1 2MN", &[4, 2]),
        ];

        let tags = TAGS
            .iter()
            .zip(1..)
            .map(|(name, id)| Tag { id, name: name.to_string() })
            .collect();

        let customers = CUSTOMERS
            .iter()
            .zip(1..)
            .map(|((name, address, postcode, tag_ids), id)| CustomerRecord {
                id,
                name: name.to_string(),
                address: address.to_string(),
                postcode: postcode.to_string(),
                tag_ids: tag_ids.to_vec(),
            })
            .collect();

        Self { tags, customers }
    }
}

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

/// Immutable in-memory customer store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    customers: BTreeMap<CustomerId, Customer>,
}

impl InMemoryStore {
    /// Validate a dataset and hydrate it into searchable customers.
    ///
    /// Fails on duplicate ids or a link to a tag that does not exist. Tag
    /// names on each customer are ordered by tag id.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, DatasetError> {
        let mut tags: BTreeMap<TagId, String> = BTreeMap::new();
        for tag in dataset.tags {
            if tags.insert(tag.id, tag.name).is_some() {
                return Err(DatasetError::DuplicateTag(tag.id));
            }
        }

        let mut customers = BTreeMap::new();
        for record in dataset.customers {
            let linked: BTreeSet<TagId> = record.tag_ids.iter().copied().collect();
            let mut names = Vec::with_capacity(linked.len());
            for tag in linked {
                let name = tags
                    .get(&tag)
                    .ok_or_else(|| DatasetError::UnknownTag { customer: record.id, tag })?;
                names.push(name.clone());
            }

            let customer = Customer {
                id: record.id,
                name: record.name,
                address: record.address,
                postcode: record.postcode,
                tags: names,
            };
            if customers.insert(customer.id, customer).is_some() {
                return Err(DatasetError::DuplicateCustomer(record.id));
            }
        }

        tracing::debug!(customers = customers.len(), tags = tags.len(), "store loaded");
        Ok(Self { customers })
    }

    /// Store preloaded with [`Dataset::seed`].
    pub fn seeded() -> Self {
        Self::from_dataset(Dataset::seed()).expect("seed dataset must be consistent")
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }
}

impl FromIterator<Customer> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = Customer>>(iter: I) -> Self {
        Self {
            customers: iter.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}

impl CustomerStore for InMemoryStore {
    fn scan(&self, visit: &mut dyn FnMut(&Customer)) -> Result<(), StoreError> {
        self.customers.values().for_each(|c| visit(c));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
