#![allow(unused)]
//! Incremental search controller harness.
//!
//! # What this covers
//!
//! Every test runs on paused tokio time against a [`ScriptedTransport`], so
//! delays are exact and nothing touches the network.
//!
//! - **Debounce**: a burst of keystrokes produces one request for the last
//!   value, and nothing is sent before the quiet period ends.
//! - **Staleness**: a slow response for an older value never replaces the
//!   state produced by a newer one.
//! - **Retry under the controller**: timeouts are retried by the client and
//!   the controller stays `Loading` until the final outcome.
//! - **Failure**: a non-retryable failure surfaces as a user message.
//!
//! # Running
//!
//! ```sh
//! cargo test --test controller_harness
//! ```

mod common;

use common::*;
use custsearch_client::{
    spawn_controller, ControllerEvent, ControllerHandle, ControllerSettings, RetryPolicy,
    SearchClient, SearchState, TransportError,
};
use custsearch_core::SearchPage;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::sleep;

fn controller(transport: ScriptedTransport, policy: RetryPolicy) -> ControllerHandle {
    let (handle, _events) = spawn_controller(
        SearchClient::new(transport, policy),
        ControllerSettings::default(),
    );
    handle
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_secs(30),
        retries: 2,
        delay: Duration::from_secs(1),
    }
}

fn first_name(state: &SearchState) -> Option<String> {
    match state {
        SearchState::Results(page) => page.customers.first().map(|c| c.name.clone()),
        _ => None,
    }
}

#[tokio::test(start_paused = true)]
async fn burst_sends_only_the_last_value() {
    let transport = ScriptedTransport::default();
    let handle = controller(transport.clone(), policy());

    for text in ["a", "ac", "acm", "acme"] {
        handle.push(text);
        sleep(Duration::from_millis(100)).await;
    }
    sleep(Duration::from_millis(150)).await;
    assert_eq!(transport.attempts(), 0, "sent before the quiet period ended");

    sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.queries(), vec!["acme"]);
    assert_eq!(first_name(&handle.state()).as_deref(), Some("acme"));
}

#[tokio::test(start_paused = true)]
async fn slow_old_response_never_overwrites_a_newer_one() {
    let transport = ScriptedTransport::new(vec![
        (Duration::from_secs(2), Ok(named_page("old"))),
        (Duration::from_millis(10), Ok(named_page("new"))),
    ]);
    let handle = controller(transport.clone(), policy());

    handle.push("ab");
    sleep(Duration::from_millis(400)).await;
    assert!(handle.state().is_loading());

    handle.push("abc");
    sleep(Duration::from_millis(400)).await;
    assert_eq!(first_name(&handle.state()).as_deref(), Some("new"));

    sleep(Duration::from_secs(3)).await;
    assert_eq!(transport.queries(), vec!["ab", "abc"]);
    assert_eq!(first_name(&handle.state()).as_deref(), Some("new"));
}

#[tokio::test(start_paused = true)]
async fn timeouts_are_retried_while_loading() {
    let transport = ScriptedTransport::new(vec![
        (Duration::from_secs(60), Ok(named_page("never"))),
        (Duration::from_secs(60), Ok(named_page("never"))),
        (Duration::from_millis(50), Ok(named_page("Acme Holdings"))),
    ]);
    let handle = controller(transport.clone(), policy());

    handle.push("acme");
    sleep(Duration::from_millis(400)).await;
    assert!(handle.state().is_loading());

    // Issued at 0.3 s; attempts time out at 30.3 s and 61.3 s, each followed
    // by a 1 s pause.
    sleep(Duration::from_millis(61_600)).await;
    assert!(handle.state().is_loading());
    assert_eq!(transport.attempts(), 2);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.attempts(), 3);
    assert_eq!(first_name(&handle.state()).as_deref(), Some("Acme Holdings"));
}

#[tokio::test(start_paused = true)]
async fn exhausted_timeouts_surface_a_message() {
    let slow = || (Duration::from_secs(60), Ok(SearchPage::empty()));
    let transport = ScriptedTransport::new(vec![slow(), slow(), slow()]);
    let handle = controller(transport.clone(), policy());

    handle.push("acme");
    sleep(Duration::from_secs(120)).await;

    assert_eq!(transport.attempts(), 3);
    assert_eq!(
        handle.state(),
        SearchState::Error("The search request timed out. Please try again.".into())
    );
}

#[tokio::test(start_paused = true)]
async fn non_transient_failure_is_reported_once() {
    let transport = ScriptedTransport::new(vec![(Duration::ZERO, Err(TransportError::BadRequest))]);
    let handle = controller(transport.clone(), policy());

    handle.push("acme");
    sleep(Duration::from_secs(1)).await;

    assert_eq!(transport.attempts(), 1);
    assert_eq!(
        handle.state(),
        SearchState::Error("Invalid search request. Please check your search terms.".into())
    );
}

#[tokio::test(start_paused = true)]
async fn clearing_the_input_returns_to_idle() {
    let transport = ScriptedTransport::default();
    let handle = controller(transport.clone(), policy());

    handle.push("acme");
    sleep(Duration::from_secs(1)).await;
    assert!(matches!(handle.state(), SearchState::Results(_)));

    handle.push("");
    sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.state(), SearchState::Idle);
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_keystroke_is_announced() {
    let (handle, mut events) = spawn_controller(
        SearchClient::new(ScriptedTransport::default(), policy()),
        ControllerSettings::default(),
    );

    for text in ["a", "ab", "ab"] {
        handle.push(text);
    }
    sleep(Duration::from_millis(10)).await;

    let mut seen = Vec::new();
    while let Ok(ControllerEvent::SearchTextChanged(text)) = events.try_recv() {
        seen.push(text);
    }
    assert_eq!(seen, vec!["a", "ab", "ab"]);
}
