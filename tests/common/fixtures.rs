//! Static datasets and servers used across harnesses.

use custsearch::server::{router, AppState};
use custsearch_core::{CustomerStore, InMemoryStore, Matcher};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A small dataset in the on-disk JSON shape, with tag links out of id order.
pub const DATASET_JSON: &str = r#"{
  "tags": [
    { "id": 1, "name": "VIP" },
    { "id": 2, "name": "Wholesale" },
    { "id": 3, "name": "Northern" }
  ],
  "customers": [
    { "id": 10, "name": "Harbour Fisheries", "address": "2 Quay Road, Hull", "postcode": "HU1 1AA", "tagIds": [3, 2] },
    { "id": 11, "name": "Pennine Textiles",  "address": "9 Mill Lane, Halifax", "postcode": "HX1 2BB", "tagIds": [3] },
    { "id": 12, "name": "Solent Marine",     "address": "1 Dock Street, Southampton", "postcode": "SO14 3CC", "tagIds": [1] }
  ]
}"#;

/// Names in the seed dataset, in id order.
pub const SEED_NAMES: &[&str] = &[
    "John Smith",
    "Sarah Johnson",
    "Microsoft UK Ltd",
    "Emily Davis",
    "Robert Wilson",
    "Amazon Web Services",
    "Lisa Thompson",
    "David Brown",
    "TechStart Solutions",
    "Jennifer Martinez",
    "GlobalTech Industries",
    "Michael O'Connor",
];

/// Server state over the seed dataset with default limits.
pub fn seeded_state() -> AppState {
    AppState::new(Arc::new(InMemoryStore::seeded()), Matcher::default())
}

pub fn state_with(store: impl CustomerStore + 'static) -> AppState {
    AppState::new(Arc::new(store), Matcher::default())
}

/// Serve `state` on an ephemeral loopback port. Returns the API base URL,
/// e.g. `http://127.0.0.1:41234/api`.
pub async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}/api")
}
