//! Test builders: customers, stores and transports with scripted behaviour.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use custsearch_client::{SearchTransport, TransportError};
use custsearch_core::{Customer, CustomerStore, InMemoryStore, SearchPage, SearchRequest, StoreError};
use fake::faker::address::en::{CityName, PostCode, StreetName};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CustomerBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Customer`] fixtures.
///
/// ```rust
/// let c = CustomerBuilder::new(7, "Acme Ltd").postcode("SL1 1AA").tag("VIP").build();
/// ```
pub struct CustomerBuilder {
    customer: Customer,
}

impl CustomerBuilder {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            customer: Customer {
                id,
                name: name.into(),
                address: format!("{id} Test Street, Testville"),
                postcode: "TE1 1ST".to_string(),
                tags: vec![],
            },
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.customer.address = address.into();
        self
    }

    pub fn postcode(mut self, postcode: impl Into<String>) -> Self {
        self.customer.postcode = postcode.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.customer.tags.push(tag.into());
        self
    }

    pub fn build(self) -> Customer {
        self.customer
    }
}

/// `n` synthetic customers with ids `1..=n`, every name ending in
/// " Holdings" so one query matches them all.
pub fn holdings(n: u64) -> InMemoryStore {
    (1..=n)
        .map(|id| {
            let company: String = CompanyName().fake();
            let street: String = StreetName().fake();
            let city: String = CityName().fake();
            let postcode: String = PostCode().fake();
            CustomerBuilder::new(id, format!("{company} Holdings"))
                .address(format!("{id} {street}, {city}"))
                .postcode(postcode)
                .build()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// A store whose every scan fails. Counts scans so retries are observable.
#[derive(Clone, Default)]
pub struct UnavailableStore {
    scans: Arc<AtomicUsize>,
}

impl UnavailableStore {
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl CustomerStore for UnavailableStore {
    fn scan(&self, _: &mut dyn FnMut(&Customer)) -> Result<(), StoreError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("database connection refused".into()))
    }
}

// ---------------------------------------------------------------------------
// ScriptedTransport
// ---------------------------------------------------------------------------

/// One scripted attempt: wait `delay`, then yield `result`.
pub type Step = (Duration, Result<SearchPage, TransportError>);

/// Transport that plays back a script of attempts and records every request.
/// Once the script runs out, each attempt answers with a one-customer page
/// named after the query.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    seen: Arc<Mutex<Vec<SearchRequest>>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            seen: Arc::default(),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|r| r.query.clone()).collect()
    }

    pub fn attempts(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl SearchTransport for ScriptedTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        let (delay, result) =
            step.unwrap_or_else(|| (Duration::from_millis(5), Ok(named_page(&request.query))));
        tokio::time::sleep(delay).await;
        result
    }
}

/// A one-customer page whose only customer is named `name`.
pub fn named_page(name: &str) -> SearchPage {
    SearchPage {
        customers: vec![CustomerBuilder::new(1, name).build()],
        total_count: 1,
    }
}
