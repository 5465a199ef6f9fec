//! Search notification channel and input debouncing.
//!
//! A [`SearchChannel`] decouples a search input from the catalog view. It is
//! owned by whichever scope composes the two and passed down explicitly;
//! there is no process-wide singleton. Discrete submissions travel over a
//! broadcast channel (in-order per subscriber), while the current term is
//! observable as state through a watch channel starting at the empty string.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::sleep;
use tracing::debug;

/// How long an input value must stay unchanged before it is forwarded.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Submissions shorter than this (after trimming) are ignored.
pub const MIN_SEARCH_TERM_LEN: usize = 2;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// One submitted or cleared search. An empty term is the clear signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEvent {
    pub term: String,
    pub timestamp: DateTime<Utc>,
}

impl SearchEvent {
    fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_clear(&self) -> bool {
        self.term.is_empty()
    }
}

/// Single-producer, multi-consumer notification hub for search terms.
#[derive(Debug)]
pub struct SearchChannel {
    events: broadcast::Sender<SearchEvent>,
    last: watch::Sender<String>,
}

impl Default for SearchChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchChannel {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (last, _) = watch::channel(String::new());
        Self { events, last }
    }

    /// Subscribe to discrete search events. Drop the receiver on teardown.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Observe the current search term as state.
    pub fn watch_last_search(&self) -> watch::Receiver<String> {
        self.last.subscribe()
    }

    /// Publish a search, then immediately clear it.
    ///
    /// The channel is a self-resetting trigger, not a persisted filter:
    /// subscribers see the trimmed term followed by the empty clear signal.
    pub fn perform_search(&self, term: &str) {
        let term = term.trim();
        debug!(term, "search submitted");
        self.publish(term);
        self.clear_search();
    }

    /// Publish the clear signal on both channels.
    pub fn clear_search(&self) {
        self.publish("");
    }

    pub fn last_search_term(&self) -> String {
        self.last.borrow().clone()
    }

    fn publish(&self, term: &str) {
        self.last.send_replace(term.to_string());
        // A send error just means nobody is subscribed right now.
        let _ = self.events.send(SearchEvent::new(term));
    }
}

/// Timer-reset-on-keystroke coalescer in front of a [`SearchChannel`].
///
/// Each input restarts the window; only the value still pending when the
/// window expires is forwarded, and only if it differs from the previously
/// forwarded value. The driving task ends when the debouncer is dropped.
#[derive(Debug)]
pub struct SearchDebouncer {
    tx: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    pub fn spawn(channel: Arc<SearchChannel>, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce_loop(channel, window, rx));
        Self { tx }
    }

    /// Feed one keystroke's worth of input.
    pub fn input(&self, term: impl Into<String>) {
        let _ = self.tx.send(term.into());
    }
}

async fn debounce_loop(
    channel: Arc<SearchChannel>,
    window: Duration,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let mut pending: Option<String> = None;
    let mut last_forwarded: Option<String> = None;
    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(term) => pending = Some(term),
                None => break,
            },
            // Re-created on every loop turn, so any input restarts the timer.
            _ = sleep(window), if pending.is_some() => {
                if let Some(term) = pending.take() {
                    forward(&channel, &term, &mut last_forwarded);
                }
            }
        }
    }
}

fn forward(channel: &SearchChannel, raw: &str, last_forwarded: &mut Option<String>) {
    let term = raw.trim();
    if term.is_empty() {
        channel.clear_search();
        *last_forwarded = None;
        return;
    }
    if term.len() < MIN_SEARCH_TERM_LEN {
        return;
    }
    if last_forwarded.as_deref() == Some(term) {
        return;
    }
    channel.perform_search(term);
    *last_forwarded = Some(term.to_string());
}
