//! custsearch: incremental customer search.
//!
//! The workspace is split along the request path:
//!
//! ```text
//! keystrokes ──► Controller ──► SearchClient ──► HTTP ──► server ──► Matcher ──► Store
//!  (tui)          (client)        (client)                (here)      (core)      (core)
//! ```
//!
//! This crate holds the HTTP service and the `custsearch` binary.

pub mod server;

pub use server::{router, serve, AppState};
