//! custsearch-client: talking to the search service from an interactive
//! surface.
//!
//! Three layers, each usable on its own:
//!
//! - [`transport`]: one raw attempt ([`SearchTransport`], [`HttpTransport`]);
//! - [`client`]: timeout, retry and short-query guard ([`SearchClient`]);
//! - [`controller`]: debounce, distinct-until-changed and the staleness gate
//!   that turns keystrokes into a [`SearchState`].

pub mod client;
pub mod controller;
pub mod error;
pub mod transport;

pub use client::{RetryPolicy, SearchClient};
pub use controller::{
    spawn as spawn_controller, ControllerEvent, ControllerHandle, ControllerSettings, SearchState,
};
pub use error::TransportError;
pub use transport::{HttpTransport, SearchTransport};
