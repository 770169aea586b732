//! Incremental search controller.
//!
//! Turns a stream of raw input values into at most one outstanding search
//! and a published [`SearchState`]. Runs as a single tokio task:
//!
//! - every pushed value emits [`ControllerEvent::SearchTextChanged`];
//! - a trimmed value shorter than the minimum resets the state to
//!   [`SearchState::Idle`] at once and cancels any pending work;
//! - a qualifying value arms the debounce timer, and each new value re-arms
//!   it; when the timer fires, the search is issued unless the value equals
//!   the one last processed;
//! - every issued search and every reset takes a fresh sequence number, and a
//!   completion is applied only if its number is still the latest.
//!
//! State is observed through a `watch` channel, so a renderer always sees the
//! most recent value without queueing intermediate ones.

use crate::client::SearchClient;
use crate::transport::SearchTransport;
use crate::TransportError;
use custsearch_core::config::Config;
use custsearch_core::SearchPage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

/// What the results surface should show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    /// User-facing message for the most recent failed search.
    Error(String),
    Results(SearchPage),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }
}

/// Outward notifications for the hosting surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Raw input value, emitted for every push.
    SearchTextChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub min_characters: usize,
    /// Page size requested from the server.
    pub limit: Option<usize>,
}

impl ControllerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            debounce: cfg.client.debounce(),
            min_characters: cfg.search.min_characters,
            limit: Some(cfg.search.results_limit),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&Config::defaults())
    }
}

/// Cloneable handle to a running controller. The task stops once every
/// handle has been dropped.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    input: mpsc::UnboundedSender<String>,
    state: watch::Receiver<SearchState>,
}

impl ControllerHandle {
    /// Feed the current raw input value. Returns `false` if the controller
    /// task has stopped.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.input.send(text.into()).is_ok()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn watch(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }
}

/// Start a controller on the current tokio runtime.
pub fn spawn<T: SearchTransport>(
    client: SearchClient<T>,
    settings: ControllerSettings,
) -> (ControllerHandle, mpsc::UnboundedReceiver<ControllerEvent>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(SearchState::Idle);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (done_tx, done_rx) = mpsc::unbounded_channel();

    let task = Controller {
        client: Arc::new(client),
        settings,
        state: state_tx,
        events: events_tx,
        done: done_tx,
        pending: None,
        processed: None,
        latest_seq: 0,
    };
    tokio::spawn(task.run(input_rx, done_rx));

    (ControllerHandle { input: input_tx, state: state_rx }, events_rx)
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

struct Pending {
    query: String,
    deadline: Instant,
}

struct Completion {
    seq: u64,
    outcome: Result<SearchPage, TransportError>,
}

enum Step {
    Input(String),
    Done(Completion),
    Fire,
    Shutdown,
}

struct Controller<T> {
    client: Arc<SearchClient<T>>,
    settings: ControllerSettings,
    state: watch::Sender<SearchState>,
    events: mpsc::UnboundedSender<ControllerEvent>,
    done: mpsc::UnboundedSender<Completion>,
    /// Debounced value waiting for its timer.
    pending: Option<Pending>,
    /// Trimmed value of the last issue or reset.
    processed: Option<String>,
    latest_seq: u64,
}

impl<T: SearchTransport> Controller<T> {
    async fn run(
        mut self,
        mut input: mpsc::UnboundedReceiver<String>,
        mut done: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            let deadline = self.pending.as_ref().map(|p| p.deadline);
            let step = tokio::select! {
                text = input.recv() => match text {
                    Some(text) => Step::Input(text),
                    None => Step::Shutdown,
                },
                Some(completion) = done.recv() => Step::Done(completion),
                () = debounce_elapsed(deadline) => Step::Fire,
            };

            match step {
                Step::Input(text) => self.on_input(text),
                Step::Done(completion) => self.on_completion(completion),
                Step::Fire => self.issue(),
                Step::Shutdown => break,
            }
        }
        tracing::debug!("search controller stopped");
    }

    fn on_input(&mut self, text: String) {
        let _ = self.events.send(ControllerEvent::SearchTextChanged(text.clone()));

        let trimmed = text.trim();
        if trimmed.chars().count() < self.settings.min_characters {
            self.pending = None;
            self.latest_seq += 1;
            self.processed = Some(trimmed.to_string());
            self.publish(SearchState::Idle);
            return;
        }

        if self.processed.as_deref() == Some(trimmed) {
            // Back to the value already on screen (or in flight).
            self.pending = None;
            return;
        }

        self.pending = Some(Pending {
            query: trimmed.to_string(),
            deadline: Instant::now() + self.settings.debounce,
        });
    }

    fn issue(&mut self) {
        let Some(Pending { query, .. }) = self.pending.take() else {
            return;
        };

        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.processed = Some(query.clone());
        self.publish(SearchState::Loading);
        tracing::debug!(seq, query = %query, "issuing search");

        let client = Arc::clone(&self.client);
        let done = self.done.clone();
        let limit = self.settings.limit;
        tokio::spawn(async move {
            let outcome = client.call(&query, limit).await;
            let _ = done.send(Completion { seq, outcome });
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        if completion.seq != self.latest_seq {
            tracing::debug!(
                seq = completion.seq,
                latest = self.latest_seq,
                "discarding stale response"
            );
            return;
        }

        let state = match completion.outcome {
            Ok(page) => SearchState::Results(page),
            Err(err) => SearchState::Error(err.user_message()),
        };
        self.publish(state);
    }

    fn publish(&self, state: SearchState) {
        self.state.send_replace(state);
    }
}

async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
